//! Common helper functions for output formatting.

use chrono::{DateTime, Local, Utc};
use crm_filter_rs::Logic;
use owo_colors::OwoColorize;

/// Truncates a string to at most `max_len` characters, ending in `...` when cut.
///
/// Widths too narrow for the ellipsis get a plain cut.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len < 3 {
        return s.chars().take(max_len).collect();
    }
    let kept: String = s.chars().take(max_len - 3).collect();
    format!("{kept}...")
}

/// Formats a combinator for display.
pub fn format_logic(logic: Logic, use_colors: bool) -> String {
    let label = logic.as_str();
    if !use_colors {
        return label.to_string();
    }
    match logic {
        Logic::And => label.cyan().to_string(),
        Logic::Or => label.magenta().to_string(),
    }
}

/// Formats a save timestamp in local time.
pub fn format_saved_at(saved_at: &DateTime<Utc>) -> String {
    saved_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}
