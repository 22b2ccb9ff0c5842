//! Preset and applied-filter output formatting.

use crm_filter_rs::rules::{display_value, filter_display_text};
use crm_filter_rs::{count_active_filters, Filter, FilterPreset, Logic, QueryExpression};
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::{format_logic, format_saved_at, truncate_str};

/// JSON output structure for presets list command.
#[derive(Serialize)]
pub struct PresetsListOutput<'a> {
    pub presets: Vec<PresetOutput<'a>>,
}

/// JSON output structure for a single preset summary.
#[derive(Serialize)]
pub struct PresetOutput<'a> {
    pub name: &'a str,
    pub groups: usize,
    pub filters: usize,
    pub saved_at: String,
}

/// Formats presets as JSON.
pub fn format_presets_json(presets: &[FilterPreset]) -> Result<String, serde_json::Error> {
    let output = PresetsListOutput {
        presets: presets
            .iter()
            .map(|p| PresetOutput {
                name: &p.name,
                groups: p.query.groups.len(),
                filters: count_active_filters(&p.query),
                saved_at: p.saved_at.to_rfc3339(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&output)
}

/// Formats presets as a table.
pub fn format_presets_table(presets: &[FilterPreset], use_colors: bool) -> String {
    if presets.is_empty() {
        return "No presets found.\n".to_string();
    }

    let mut output = String::new();

    let header = format!("{:<30} {:>6} {:>7}  {}", "Name", "Groups", "Filters", "Saved");
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for preset in presets {
        let line = format!(
            "{:<30} {:>6} {:>7}  {}",
            truncate_str(&preset.name, 30),
            preset.query.groups.len(),
            count_active_filters(&preset.query),
            format_saved_at(&preset.saved_at)
        );
        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Formats a preset in full as JSON.
pub fn format_preset_details_json(preset: &FilterPreset) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(preset)
}

/// Formats a preset's groups and predicates for reading.
pub fn format_preset_details_table(preset: &FilterPreset, use_colors: bool) -> String {
    let mut output = String::new();

    if use_colors {
        output.push_str(&format!("{}\n", preset.name.green().bold()));
    } else {
        output.push_str(&format!("{}\n", preset.name));
    }
    output.push_str(&format!(
        "Groups combined with {}\n",
        format_logic(preset.query.group_logic, use_colors)
    ));

    for (n, group) in preset.query.groups.iter().enumerate() {
        output.push_str(&format!(
            "\nGroup {} ({})  [{}]\n",
            n + 1,
            format_logic(group.logic, use_colors),
            group.id
        ));
        if group.filters.is_empty() {
            output.push_str("  (empty)\n");
        }
        for filter in &group.filters {
            output.push_str(&format!("  - {}\n", filter_display_text(filter)));
        }
    }

    output
}

/// JSON output structure for an applied filter list.
#[derive(Serialize)]
pub struct AppliedFiltersOutput<'a> {
    pub count: usize,
    pub filters: &'a [Filter],
}

/// Formats the applied flat filter list as JSON.
pub fn format_applied_filters_json(filters: &[Filter]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&AppliedFiltersOutput {
        count: filters.len(),
        filters,
    })
}

/// Formats the applied flat filter list as a table.
pub fn format_applied_filters_table(filters: &[Filter], use_colors: bool) -> String {
    if filters.is_empty() {
        return "No active filters.\n".to_string();
    }

    let mut output = String::new();
    let header = format!("{:<20} {:<14} {}", "Field", "Operator", "Value");
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for filter in filters {
        output.push_str(&format!(
            "{:<20} {:<14} {}\n",
            truncate_str(&filter.field, 20),
            filter.operator.as_str(),
            truncate_str(&display_value(&filter.value), 40)
        ));
    }

    output
}

/// Formats a nested expression as JSON; `null` when there are no predicates.
pub fn format_expression_json(
    expression: Option<&QueryExpression>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&expression)
}

/// Formats a nested expression as an indented tree.
pub fn format_expression_table(expression: Option<&QueryExpression>, use_colors: bool) -> String {
    let Some(expression) = expression else {
        return "No active filters.\n".to_string();
    };
    let mut output = String::new();
    write_expression(&mut output, expression, 0, use_colors);
    output
}

fn write_expression(
    output: &mut String,
    expression: &QueryExpression,
    depth: usize,
    use_colors: bool,
) {
    let indent = "  ".repeat(depth);
    let (logic, children) = match expression {
        QueryExpression::Predicate(filter) => {
            output.push_str(&format!("{indent}{}\n", filter_display_text(filter)));
            return;
        }
        QueryExpression::And(children) => (Logic::And, children),
        QueryExpression::Or(children) => (Logic::Or, children),
    };
    output.push_str(&format!("{indent}{}\n", format_logic(logic, use_colors)));
    for child in children {
        write_expression(output, child, depth + 1, use_colors);
    }
}
