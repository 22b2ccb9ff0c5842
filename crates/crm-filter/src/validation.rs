//! Whole-query validation against a field catalog.
//!
//! [`validate_query`] walks every predicate and reports what is wrong with it
//! instead of stopping at the first problem, so a form can mark each row.

use serde_json::Value;
use thiserror::Error;

use crate::catalog::FieldCatalog;
use crate::model::{BooleanQuery, FieldType, Filter, FilterOperator};
use crate::option_cache::FieldOptionCache;
use crate::rules;

/// A problem found with one predicate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterIssue {
    /// The predicate names a field the catalog does not know.
    #[error("unknown field '{field}'{}", suggestion_suffix(.suggestion))]
    UnknownField {
        /// The unknown field name.
        field: String,
        /// A close known field name, if any.
        suggestion: Option<String>,
    },

    /// The operator is not legal for the field's type.
    #[error("operator '{operator}' is not allowed for {field_type} field '{field}'")]
    OperatorNotAllowed {
        /// The field name.
        field: String,
        /// The field's declared type.
        field_type: FieldType,
        /// The rejected operator.
        operator: FilterOperator,
    },

    /// The value does not fit the operator and field type.
    #[error("invalid value for '{field}' {operator}")]
    InvalidValue {
        /// The field name.
        field: String,
        /// The operator the value was checked against.
        operator: FilterOperator,
    },

    /// A choice value is not among the field's cached options.
    #[error("'{value}' is not an option of '{field}'")]
    ValueNotInOptions {
        /// The field name.
        field: String,
        /// The rejected value.
        value: String,
    },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

/// An issue located within a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedIssue {
    /// Id of the group holding the predicate.
    pub group_id: String,
    /// Index of the predicate within its group.
    pub index: usize,
    /// What is wrong.
    pub issue: FilterIssue,
}

/// Checks one predicate against the catalog.
pub fn validate_filter(filter: &Filter, catalog: &FieldCatalog) -> Option<FilterIssue> {
    let Some(field_type) = catalog.field_type(&filter.field) else {
        return Some(FilterIssue::UnknownField {
            field: filter.field.clone(),
            suggestion: catalog.suggest(&filter.field),
        });
    };

    if !rules::is_operator_allowed(field_type, filter.operator) {
        return Some(FilterIssue::OperatorNotAllowed {
            field: filter.field.clone(),
            field_type: field_type.clone(),
            operator: filter.operator,
        });
    }

    if !rules::validate_filter_value(field_type, filter.operator, &filter.value) {
        return Some(FilterIssue::InvalidValue {
            field: filter.field.clone(),
            operator: filter.operator,
        });
    }

    None
}

/// Validates every predicate of a query. An empty result means the query is valid.
pub fn validate_query(query: &BooleanQuery, catalog: &FieldCatalog) -> Vec<LocatedIssue> {
    collect_issues(query, |filter| validate_filter(filter, catalog))
}

/// Like [`validate_query`], also checking choice values against cached options.
///
/// Fields without cached options are not checked against options.
pub fn validate_query_with_options(
    query: &BooleanQuery,
    catalog: &FieldCatalog,
    options: &FieldOptionCache,
) -> Vec<LocatedIssue> {
    collect_issues(query, |filter| {
        validate_filter(filter, catalog).or_else(|| check_options(filter, catalog, options))
    })
}

fn collect_issues<F>(query: &BooleanQuery, mut check: F) -> Vec<LocatedIssue>
where
    F: FnMut(&Filter) -> Option<FilterIssue>,
{
    let mut issues = Vec::new();
    for group in &query.groups {
        for (index, filter) in group.filters.iter().enumerate() {
            if let Some(issue) = check(filter) {
                issues.push(LocatedIssue {
                    group_id: group.id.clone(),
                    index,
                    issue,
                });
            }
        }
    }
    issues
}

fn check_options(
    filter: &Filter,
    catalog: &FieldCatalog,
    options: &FieldOptionCache,
) -> Option<FilterIssue> {
    if filter.operator.is_unary() {
        return None;
    }
    match catalog.field_type(&filter.field)? {
        FieldType::Select | FieldType::MultiSelect => {}
        _ => return None,
    }

    let values: Vec<&str> = match &filter.value {
        Value::String(s) => vec![s.as_str()],
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => return None,
    };

    values
        .into_iter()
        .find(|v| options.has_value(&filter.field, v) == Some(false))
        .map(|v| FilterIssue::ValueNotInOptions {
            field: filter.field.clone(),
            value: v.to_string(),
        })
}
