//! Output formatting utilities for the crmq CLI.
//!
//! This module provides functions for formatting data as tables or JSON:
//!
//! - [`presets`] - Preset, applied-filter and expression output
//! - [`rules`] - Operator list and validation output
//! - [`helpers`] - Common formatting utilities (truncation, logic, timestamps)

pub mod helpers;
mod presets;
mod rules;

pub use presets::{
    format_applied_filters_json, format_applied_filters_table, format_expression_json,
    format_expression_table,
    format_preset_details_json, format_preset_details_table, format_presets_json,
    format_presets_table,
};

pub use rules::{format_operators_json, format_operators_table, format_validation_result};
