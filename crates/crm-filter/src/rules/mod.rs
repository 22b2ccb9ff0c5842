//! Field-type-aware filter rules.
//!
//! Pure functions that decide which operators a field type supports, whether
//! a predicate's value is acceptable, and how a predicate reads in the UI.
//! Nothing here holds state.
//!
//! # Example
//!
//! ```
//! use crm_filter_rs::rules::{operators_for_field_type, validate_filter_value};
//! use crm_filter_rs::{FieldType, FilterOperator};
//! use serde_json::json;
//!
//! let ops = operators_for_field_type(&FieldType::Number);
//! assert!(ops.contains(&FilterOperator::GreaterThan));
//!
//! assert!(validate_filter_value(&FieldType::Number, FilterOperator::GreaterThan, &json!(5)));
//! assert!(!validate_filter_value(&FieldType::Number, FilterOperator::GreaterThan, &json!("abc")));
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::model::{FieldType, Filter, FilterOperator};

use FilterOperator::*;

const TEXT_OPERATORS: &[FilterOperator] =
    &[Equals, Contains, StartsWith, EndsWith, IsEmpty, IsNotEmpty];

const ORDERED_OPERATORS: &[FilterOperator] = &[Equals, GreaterThan, LessThan, IsEmpty, IsNotEmpty];

const CHOICE_OPERATORS: &[FilterOperator] = &[Equals, IsEmpty, IsNotEmpty];

const MULTI_CHOICE_OPERATORS: &[FilterOperator] = &[Contains, IsEmpty, IsNotEmpty];

/// Operators offered for field types this crate does not recognize.
const DEFAULT_OPERATORS: &[FilterOperator] = &[Equals, IsEmpty, IsNotEmpty];

/// Returns the legal operators for a field type, in display order.
pub fn operators_for_field_type(field_type: &FieldType) -> &'static [FilterOperator] {
    match field_type {
        FieldType::Text | FieldType::Textarea | FieldType::Email | FieldType::Phone | FieldType::Url => {
            TEXT_OPERATORS
        }
        FieldType::Number | FieldType::Currency | FieldType::Date | FieldType::DateTime => {
            ORDERED_OPERATORS
        }
        FieldType::Boolean | FieldType::Select => CHOICE_OPERATORS,
        FieldType::MultiSelect => MULTI_CHOICE_OPERATORS,
        FieldType::Other(_) => DEFAULT_OPERATORS,
    }
}

/// Returns true if `operator` may be used on a field of `field_type`.
pub fn is_operator_allowed(field_type: &FieldType, operator: FilterOperator) -> bool {
    operators_for_field_type(field_type).contains(&operator)
}

/// Checks a predicate value against its operator and field type.
///
/// Unary operators (`is_empty`, `is_not_empty`) accept anything. An operator
/// that is not legal for the field type is rejected rather than coerced, so a
/// predicate left over from an earlier field-type change fails here.
pub fn validate_filter_value(field_type: &FieldType, operator: FilterOperator, value: &Value) -> bool {
    if operator.is_unary() {
        return true;
    }
    if !is_operator_allowed(field_type, operator) {
        return false;
    }

    if operator.is_ordering() {
        return is_ordered_value(field_type, value);
    }

    match field_type {
        FieldType::Number | FieldType::Currency => is_numeric_value(value),
        FieldType::Date | FieldType::DateTime => is_date_value(value),
        FieldType::Boolean => is_boolean_value(value),
        FieldType::MultiSelect => is_non_blank_string(value) || is_non_empty_string_list(value),
        _ => is_non_empty_scalar(value),
    }
}

/// Renders a predicate for display, e.g. `status contains open`.
///
/// The output is for people only and is not meant to be parsed back.
pub fn filter_display_text(filter: &Filter) -> String {
    render(&filter.field, filter)
}

/// Renders a predicate using a caller-supplied field label.
pub fn filter_display_text_with_label(filter: &Filter, label: &str) -> String {
    render(label, filter)
}

fn render(subject: &str, filter: &Filter) -> String {
    if filter.operator.is_unary() {
        return format!("{} {}", subject, filter.operator.label());
    }
    format!(
        "{} {} {}",
        subject,
        filter.operator.label(),
        display_value(&filter.value)
    )
}

/// Formats a JSON value the way it is shown next to a field name.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

fn is_ordered_value(field_type: &FieldType, value: &Value) -> bool {
    if field_type.is_numeric() {
        is_numeric_value(value)
    } else if field_type.is_temporal() {
        is_date_value(value)
    } else {
        false
    }
}

fn is_numeric_value(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
        _ => false,
    }
}

fn is_date_value(value: &Value) -> bool {
    let Value::String(s) = value else {
        return false;
    };
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok()
}

fn is_boolean_value(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::String(s) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false")
        }
        _ => false,
    }
}

fn is_non_blank_string(value: &Value) -> bool {
    matches!(value, Value::String(s) if !s.trim().is_empty())
}

fn is_non_empty_string_list(value: &Value) -> bool {
    match value {
        Value::Array(items) => !items.is_empty() && items.iter().all(is_non_blank_string),
        _ => false,
    }
}

fn is_non_empty_scalar(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.trim().is_empty(),
        Value::Number(_) | Value::Bool(_) => true,
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests;
