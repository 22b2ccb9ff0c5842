//! Tests for the filter rules.

use super::*;
use serde_json::json;

fn all_field_types() -> Vec<FieldType> {
    vec![
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Email,
        FieldType::Phone,
        FieldType::Url,
        FieldType::Number,
        FieldType::Currency,
        FieldType::Date,
        FieldType::DateTime,
        FieldType::Boolean,
        FieldType::Select,
        FieldType::MultiSelect,
        FieldType::Other("geo_point".to_string()),
    ]
}

// ==================== Operator Table Tests ====================

#[test]
fn test_text_operators() {
    assert_eq!(
        operators_for_field_type(&FieldType::Text),
        &[Equals, Contains, StartsWith, EndsWith, IsEmpty, IsNotEmpty]
    );
    assert_eq!(
        operators_for_field_type(&FieldType::Email),
        operators_for_field_type(&FieldType::Text)
    );
}

#[test]
fn test_number_and_date_operators_support_ordering() {
    for field_type in [FieldType::Number, FieldType::Currency, FieldType::Date, FieldType::DateTime] {
        let ops = operators_for_field_type(&field_type);
        assert!(ops.contains(&GreaterThan), "{field_type} should allow greater_than");
        assert!(ops.contains(&LessThan), "{field_type} should allow less_than");
        assert!(!ops.contains(&Contains), "{field_type} should not allow contains");
    }
}

#[test]
fn test_unknown_type_gets_conservative_default() {
    let ops = operators_for_field_type(&FieldType::from("signature"));
    assert_eq!(ops, &[Equals, IsEmpty, IsNotEmpty]);
}

#[test]
fn test_every_type_supports_empty_checks() {
    for field_type in all_field_types() {
        assert!(is_operator_allowed(&field_type, IsEmpty), "{field_type}");
        assert!(is_operator_allowed(&field_type, IsNotEmpty), "{field_type}");
    }
}

#[test]
fn test_multi_select_only_contains() {
    assert!(is_operator_allowed(&FieldType::MultiSelect, Contains));
    assert!(!is_operator_allowed(&FieldType::MultiSelect, Equals));
}

// ==================== Validation Tests ====================

#[test]
fn test_is_empty_always_valid() {
    let values = [
        Value::Null,
        json!(""),
        json!("abc"),
        json!(0),
        json!([]),
        json!({"nested": true}),
    ];
    for field_type in all_field_types() {
        for value in &values {
            assert!(validate_filter_value(&field_type, IsEmpty, value));
            assert!(validate_filter_value(&field_type, IsNotEmpty, value));
        }
    }
}

#[test]
fn test_number_greater_than() {
    assert!(!validate_filter_value(&FieldType::Number, GreaterThan, &json!("abc")));
    assert!(validate_filter_value(&FieldType::Number, GreaterThan, &json!(5)));
    assert!(validate_filter_value(&FieldType::Number, LessThan, &json!(2.5)));
    assert!(validate_filter_value(&FieldType::Currency, LessThan, &json!(" 100.50 ")));
    assert!(!validate_filter_value(&FieldType::Number, GreaterThan, &Value::Null));
    assert!(!validate_filter_value(&FieldType::Number, GreaterThan, &json!("NaN")));
}

#[test]
fn test_date_ordering() {
    assert!(validate_filter_value(&FieldType::Date, GreaterThan, &json!("2026-01-25")));
    assert!(validate_filter_value(
        &FieldType::DateTime,
        LessThan,
        &json!("2026-01-25T15:00:00Z")
    ));
    assert!(validate_filter_value(
        &FieldType::DateTime,
        LessThan,
        &json!("2026-01-25T15:00:00")
    ));
    assert!(!validate_filter_value(&FieldType::Date, GreaterThan, &json!("next week")));
    assert!(!validate_filter_value(&FieldType::Date, GreaterThan, &json!(20260125)));
}

#[test]
fn test_ordering_rejected_for_text() {
    // Not legal for text, so invalid even with a numeric operand.
    assert!(!validate_filter_value(&FieldType::Text, GreaterThan, &json!(5)));
}

#[test]
fn test_stale_operator_fails_validation() {
    // A "contains" predicate kept after the field became a number.
    assert!(!validate_filter_value(&FieldType::Number, Contains, &json!("12")));
}

#[test]
fn test_text_requires_non_blank_value() {
    assert!(validate_filter_value(&FieldType::Text, Contains, &json!("acme")));
    assert!(validate_filter_value(&FieldType::Text, Equals, &json!(42)));
    assert!(!validate_filter_value(&FieldType::Text, Contains, &json!("   ")));
    assert!(!validate_filter_value(&FieldType::Text, StartsWith, &Value::Null));
    assert!(!validate_filter_value(&FieldType::Text, EndsWith, &json!([])));
    assert!(!validate_filter_value(&FieldType::Text, Equals, &json!({})));
}

#[test]
fn test_number_equals_requires_number() {
    assert!(validate_filter_value(&FieldType::Number, Equals, &json!(7)));
    assert!(validate_filter_value(&FieldType::Number, Equals, &json!("7")));
    assert!(!validate_filter_value(&FieldType::Number, Equals, &json!("seven")));
}

#[test]
fn test_boolean_values() {
    assert!(validate_filter_value(&FieldType::Boolean, Equals, &json!(true)));
    assert!(validate_filter_value(&FieldType::Boolean, Equals, &json!("False")));
    assert!(!validate_filter_value(&FieldType::Boolean, Equals, &json!("yes")));
    assert!(!validate_filter_value(&FieldType::Boolean, Equals, &json!(1)));
}

#[test]
fn test_multi_select_values() {
    assert!(validate_filter_value(&FieldType::MultiSelect, Contains, &json!("vip")));
    assert!(validate_filter_value(
        &FieldType::MultiSelect,
        Contains,
        &json!(["vip", "partner"])
    ));
    assert!(!validate_filter_value(&FieldType::MultiSelect, Contains, &json!([])));
    assert!(!validate_filter_value(&FieldType::MultiSelect, Contains, &json!(["vip", ""])));
}

#[test]
fn test_unknown_type_equals() {
    let field_type = FieldType::from("geo_point");
    assert!(validate_filter_value(&field_type, Equals, &json!("52.5,13.4")));
    assert!(!validate_filter_value(&field_type, Contains, &json!("52.5")));
}

// ==================== Display Tests ====================

#[test]
fn test_display_text_binary() {
    let filter = Filter::new("status", Contains, "open");
    assert_eq!(filter_display_text(&filter), "status contains open");

    let filter = Filter::new("priority", GreaterThan, 3);
    assert_eq!(filter_display_text(&filter), "priority greater than 3");
}

#[test]
fn test_display_text_unary_ignores_value() {
    let filter = Filter::new("email", IsNotEmpty, "ignored");
    assert_eq!(filter_display_text(&filter), "email is not empty");
}

#[test]
fn test_display_text_array_value() {
    let filter = Filter::new("tags", Contains, json!(["vip", "partner"]));
    assert_eq!(filter_display_text(&filter), "tags contains vip, partner");
}

#[test]
fn test_display_text_with_label() {
    let filter = Filter::new("close_date", LessThan, "2026-03-01");
    assert_eq!(
        filter_display_text_with_label(&filter, "Close Date"),
        "Close Date less than 2026-03-01"
    );
}

#[test]
fn test_display_text_is_deterministic() {
    let filter = Filter::new("name", StartsWith, "Ac");
    assert_eq!(filter_display_text(&filter), filter_display_text(&filter.clone()));
}
