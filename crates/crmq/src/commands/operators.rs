//! Operators command implementation.
//!
//! Lists the operators a field type supports.

use crm_filter_rs::rules::operators_for_field_type;
use crm_filter_rs::FieldType;

use super::{CommandContext, Result};
use crate::output::{format_operators_json, format_operators_table};

/// Executes the operators command.
pub fn execute(ctx: &CommandContext, field_type: &str) -> Result<()> {
    let field_type = FieldType::from(field_type);
    let operators = operators_for_field_type(&field_type);

    if ctx.json_output {
        println!("{}", format_operators_json(&field_type, operators)?);
    } else if !ctx.quiet {
        print!("{}", format_operators_table(&field_type, operators, ctx.use_colors));
    }

    Ok(())
}
