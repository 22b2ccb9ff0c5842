//! Validate command implementation.
//!
//! Checks a single value against a field type and operator.

use crm_filter_rs::rules::validate_filter_value;
use crm_filter_rs::{FieldType, FilterOperator};
use serde_json::Value;

use super::{CommandContext, CommandError, Result};
use crate::output::format_validation_result;

/// Options for the validate command.
#[derive(Debug)]
pub struct ValidateOptions {
    /// Field type name.
    pub field_type: String,
    /// Operator name.
    pub operator: String,
    /// Raw value argument.
    pub value: Option<String>,
}

/// Executes the validate command.
///
/// # Errors
///
/// Returns `CommandError::Usage` for an unknown operator and
/// `CommandError::InvalidValue` when the value does not validate.
pub fn execute(ctx: &CommandContext, opts: &ValidateOptions) -> Result<()> {
    let field_type = FieldType::from(opts.field_type.as_str());
    let operator: FilterOperator = opts.operator.parse().map_err(CommandError::Usage)?;
    let value = parse_value_arg(opts.value.as_deref());

    let valid = validate_filter_value(&field_type, operator, &value);

    if ctx.json_output {
        println!(
            "{}",
            format_validation_result(&field_type, operator, &value, valid)?
        );
    } else if valid && !ctx.quiet {
        println!("valid");
    }

    if valid {
        Ok(())
    } else {
        Err(CommandError::InvalidValue {
            field_type: field_type.to_string(),
            operator: operator.to_string(),
        })
    }
}

/// Parses a value argument as JSON, falling back to a plain string.
///
/// A missing argument is JSON `null`.
pub fn parse_value_arg(raw: Option<&str>) -> Value {
    match raw {
        None => Value::Null,
        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())),
    }
}
