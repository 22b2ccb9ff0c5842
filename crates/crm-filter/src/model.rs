//! Data model for boolean record queries.
//!
//! A [`BooleanQuery`] is a fixed two-level tree: the query combines
//! [`FilterGroup`]s with `group_logic`, and each group combines its
//! [`Filter`] predicates with its own `logic`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Boolean combinator used by groups and by the query itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Logic {
    /// All operands must match.
    #[default]
    And,
    /// Any operand may match.
    Or,
}

impl Logic {
    /// Returns the wire name (`AND` or `OR`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Logic::And => "AND",
            Logic::Or => "OR",
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Logic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Logic::And),
            "OR" => Ok(Logic::Or),
            other => Err(format!("unknown logic '{other}' (expected AND or OR)")),
        }
    }
}

/// Comparison applied by a single predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    IsEmpty,
    IsNotEmpty,
}

impl FilterOperator {
    /// Every operator, in canonical order.
    pub const ALL: [FilterOperator; 8] = [
        FilterOperator::Equals,
        FilterOperator::Contains,
        FilterOperator::StartsWith,
        FilterOperator::EndsWith,
        FilterOperator::GreaterThan,
        FilterOperator::LessThan,
        FilterOperator::IsEmpty,
        FilterOperator::IsNotEmpty,
    ];

    /// Returns the wire name, e.g. `starts_with`.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Equals => "equals",
            FilterOperator::Contains => "contains",
            FilterOperator::StartsWith => "starts_with",
            FilterOperator::EndsWith => "ends_with",
            FilterOperator::GreaterThan => "greater_than",
            FilterOperator::LessThan => "less_than",
            FilterOperator::IsEmpty => "is_empty",
            FilterOperator::IsNotEmpty => "is_not_empty",
        }
    }

    /// Returns the human-readable label, e.g. `starts with`.
    pub fn label(&self) -> &'static str {
        match self {
            FilterOperator::Equals => "equals",
            FilterOperator::Contains => "contains",
            FilterOperator::StartsWith => "starts with",
            FilterOperator::EndsWith => "ends with",
            FilterOperator::GreaterThan => "greater than",
            FilterOperator::LessThan => "less than",
            FilterOperator::IsEmpty => "is empty",
            FilterOperator::IsNotEmpty => "is not empty",
        }
    }

    /// Returns true for operators that take no value.
    pub fn is_unary(&self) -> bool {
        matches!(self, FilterOperator::IsEmpty | FilterOperator::IsNotEmpty)
    }

    /// Returns true for ordering comparisons.
    pub fn is_ordering(&self) -> bool {
        matches!(self, FilterOperator::GreaterThan | FilterOperator::LessThan)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        FilterOperator::ALL
            .into_iter()
            .find(|op| op.as_str() == normalized)
            .ok_or_else(|| format!("unknown operator '{}'", s.trim()))
    }
}

/// Declared type of a record field.
///
/// Unknown type names are preserved in [`FieldType::Other`] so that a catalog
/// coming from a newer backend still deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Textarea,
    Email,
    Phone,
    Url,
    Number,
    Currency,
    Date,
    DateTime,
    Boolean,
    Select,
    MultiSelect,
    Other(String),
}

impl FieldType {
    /// Returns the type name as used by the field catalog.
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Url => "url",
            FieldType::Number => "number",
            FieldType::Currency => "currency",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Boolean => "boolean",
            FieldType::Select => "select",
            FieldType::MultiSelect => "multi_select",
            FieldType::Other(name) => name,
        }
    }

    /// Returns true for types ordered numerically.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Number | FieldType::Currency)
    }

    /// Returns true for types ordered chronologically.
    pub fn is_temporal(&self) -> bool {
        matches!(self, FieldType::Date | FieldType::DateTime)
    }
}

impl From<&str> for FieldType {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "text" => FieldType::Text,
            "textarea" => FieldType::Textarea,
            "email" => FieldType::Email,
            "phone" => FieldType::Phone,
            "url" => FieldType::Url,
            "number" => FieldType::Number,
            "currency" => FieldType::Currency,
            "date" => FieldType::Date,
            "datetime" | "date_time" => FieldType::DateTime,
            "boolean" | "bool" | "checkbox" => FieldType::Boolean,
            "select" => FieldType::Select,
            "multi_select" | "multiselect" => FieldType::MultiSelect,
            _ => FieldType::Other(name.to_string()),
        }
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        FieldType::from(name.as_str())
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field/operator/value predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Field identifier from the record schema.
    pub field: String,

    /// Comparison to apply.
    pub operator: FilterOperator,

    /// Operand; its required shape depends on `operator`.
    #[serde(default)]
    pub value: Value,
}

impl Filter {
    /// Creates a predicate.
    ///
    /// # Example
    ///
    /// ```
    /// use crm_filter_rs::{Filter, FilterOperator};
    ///
    /// let filter = Filter::new("priority", FilterOperator::GreaterThan, 3);
    /// assert_eq!(filter.value, serde_json::json!(3));
    /// ```
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Creates a predicate for an operator that takes no value.
    pub fn unary(field: impl Into<String>, operator: FilterOperator) -> Self {
        Self {
            field: field.into(),
            operator,
            value: Value::Null,
        }
    }
}

/// An ordered set of predicates combined by one combinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    /// Identifier, unique within the owning query.
    pub id: String,

    /// Combinator for the predicates in this group.
    #[serde(default)]
    pub logic: Logic,

    /// Predicates in insertion order.
    #[serde(default)]
    pub filters: Vec<Filter>,
}

impl FilterGroup {
    /// Creates an empty group.
    pub fn new(id: impl Into<String>, logic: Logic) -> Self {
        Self {
            id: id.into(),
            logic,
            filters: Vec::new(),
        }
    }

    /// Returns true if the group holds no predicates.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// The full two-level query: groups combined by `group_logic`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanQuery {
    /// Groups in display order. Never empty when produced by the store.
    #[serde(default)]
    pub groups: Vec<FilterGroup>,

    /// Combinator across groups.
    #[serde(default, rename = "groupLogic", alias = "group_logic")]
    pub group_logic: Logic,
}

impl BooleanQuery {
    /// Creates the canonical default: one empty `AND` group, `AND` across groups.
    pub fn with_default_group(group_id: impl Into<String>) -> Self {
        Self {
            groups: vec![FilterGroup::new(group_id, Logic::And)],
            group_logic: Logic::And,
        }
    }

    /// Finds a group by id.
    pub fn group(&self, group_id: &str) -> Option<&FilterGroup> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    /// Returns true if a group with this id exists.
    pub fn contains_group(&self, group_id: &str) -> bool {
        self.group(group_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_logic_parse_case_insensitive() {
        assert_eq!("and".parse::<Logic>().unwrap(), Logic::And);
        assert_eq!(" Or ".parse::<Logic>().unwrap(), Logic::Or);
        assert!("xor".parse::<Logic>().is_err());
    }

    #[test]
    fn test_operator_parse_accepts_labels() {
        assert_eq!(
            "starts with".parse::<FilterOperator>().unwrap(),
            FilterOperator::StartsWith
        );
        assert_eq!(
            "IS_NOT_EMPTY".parse::<FilterOperator>().unwrap(),
            FilterOperator::IsNotEmpty
        );
        assert!("between".parse::<FilterOperator>().is_err());
    }

    #[test]
    fn test_field_type_unknown_preserved() {
        let field_type = FieldType::from("geo_point");
        assert_eq!(field_type, FieldType::Other("geo_point".to_string()));
        assert_eq!(field_type.as_str(), "geo_point");
    }

    #[test]
    fn test_field_type_serde_uses_names() {
        let json = serde_json::to_string(&FieldType::MultiSelect).unwrap();
        assert_eq!(json, "\"multi_select\"");
        let parsed: FieldType = serde_json::from_str("\"datetime\"").unwrap();
        assert_eq!(parsed, FieldType::DateTime);
    }

    #[test]
    fn test_query_deserialize_plain_json() {
        let query: BooleanQuery = serde_json::from_value(json!({
            "groups": [
                {
                    "id": "g1",
                    "logic": "OR",
                    "filters": [
                        {"field": "status", "operator": "equals", "value": "open"},
                        {"field": "email", "operator": "is_empty"}
                    ]
                }
            ],
            "groupLogic": "AND"
        }))
        .unwrap();

        assert_eq!(query.groups.len(), 1);
        assert_eq!(query.groups[0].logic, Logic::Or);
        assert_eq!(query.groups[0].filters[1].value, Value::Null);
        assert_eq!(query.group_logic, Logic::And);
    }

    #[test]
    fn test_query_serialize_uses_group_logic_key() {
        let query = BooleanQuery::with_default_group("g1");
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["groupLogic"], "AND");
        assert_eq!(json["groups"][0]["logic"], "AND");
    }

    #[test]
    fn test_query_accepts_snake_case_group_logic() {
        let query: BooleanQuery =
            serde_json::from_str(r#"{"groups": [], "group_logic": "OR"}"#).unwrap();
        assert!(query.groups.is_empty());
        assert_eq!(query.group_logic, Logic::Or);
    }
}
