//! Operator and validation output formatting.

use crm_filter_rs::{FieldType, FilterOperator};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;

/// JSON output structure for the operators command.
#[derive(Serialize)]
pub struct OperatorsOutput<'a> {
    pub field_type: &'a str,
    pub operators: Vec<OperatorOutput>,
}

/// JSON output structure for a single operator.
#[derive(Serialize)]
pub struct OperatorOutput {
    pub operator: &'static str,
    pub label: &'static str,
    pub takes_value: bool,
}

/// Formats the operators for a field type as JSON.
pub fn format_operators_json(
    field_type: &FieldType,
    operators: &[FilterOperator],
) -> Result<String, serde_json::Error> {
    let output = OperatorsOutput {
        field_type: field_type.as_str(),
        operators: operators
            .iter()
            .map(|op| OperatorOutput {
                operator: op.as_str(),
                label: op.label(),
                takes_value: !op.is_unary(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&output)
}

/// Formats the operators for a field type as a table.
pub fn format_operators_table(
    field_type: &FieldType,
    operators: &[FilterOperator],
    use_colors: bool,
) -> String {
    let mut output = String::new();

    let title = format!("Operators for {field_type}");
    if use_colors {
        output.push_str(&format!("{}\n", title.green().bold()));
    } else {
        output.push_str(&title);
        output.push('\n');
    }

    for op in operators {
        let suffix = if op.is_unary() { "  (no value)" } else { "" };
        output.push_str(&format!("  {:<14} {}{}\n", op.as_str(), op.label(), suffix));
    }

    output
}

/// JSON output structure for the validate command.
#[derive(Serialize)]
pub struct ValidationOutput<'a> {
    pub field_type: &'a str,
    pub operator: &'static str,
    pub value: &'a Value,
    pub valid: bool,
}

/// Formats a validation result as JSON.
pub fn format_validation_result(
    field_type: &FieldType,
    operator: FilterOperator,
    value: &Value,
    valid: bool,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ValidationOutput {
        field_type: field_type.as_str(),
        operator: operator.as_str(),
        value,
        valid,
    })
}
