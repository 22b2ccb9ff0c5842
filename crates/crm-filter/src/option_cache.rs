//! Per-field option cache.
//!
//! Choice fields (`select`, `multi_select`) load their options from the
//! backend. The cache keeps them keyed by field name until explicitly
//! invalidated with [`FieldOptionCache::clear_cache`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One selectable option of a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Stored value.
    pub value: String,

    /// Display label.
    pub label: String,
}

impl FieldOption {
    /// Creates an option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Key/value store of options per field name.
#[derive(Debug, Clone, Default)]
pub struct FieldOptionCache {
    entries: HashMap<String, Vec<FieldOption>>,
}

impl FieldOptionCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached options for a field.
    pub fn get(&self, field: &str) -> Option<&[FieldOption]> {
        self.entries.get(field).map(Vec::as_slice)
    }

    /// Stores options for a field, replacing any previous entry.
    pub fn insert(&mut self, field: impl Into<String>, options: Vec<FieldOption>) {
        self.entries.insert(field.into(), options);
    }

    /// Returns true if options are cached for `field`.
    pub fn contains(&self, field: &str) -> bool {
        self.entries.contains_key(field)
    }

    /// Returns true if `value` is one of the cached option values for `field`.
    ///
    /// Returns `None` when nothing is cached for the field.
    pub fn has_value(&self, field: &str, value: &str) -> Option<bool> {
        self.get(field)
            .map(|options| options.iter().any(|o| o.value == value))
    }

    /// Invalidates one field's entry, or every entry when `field` is `None`.
    pub fn clear_cache(&mut self, field: Option<&str>) {
        match field {
            Some(field) => {
                self.entries.remove(field);
                debug!(field, "field option cache entry cleared");
            }
            None => {
                self.entries.clear();
                debug!("field option cache cleared");
            }
        }
    }

    /// Returns the number of cached fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage_options() -> Vec<FieldOption> {
        vec![
            FieldOption::new("lead", "Lead"),
            FieldOption::new("won", "Won"),
        ]
    }

    #[test]
    fn test_insert_and_get() {
        let mut cache = FieldOptionCache::new();
        cache.insert("stage", stage_options());

        assert_eq!(cache.get("stage").unwrap().len(), 2);
        assert!(cache.get("owner").is_none());
        assert_eq!(cache.has_value("stage", "won"), Some(true));
        assert_eq!(cache.has_value("stage", "lost"), Some(false));
        assert_eq!(cache.has_value("owner", "x"), None);
    }

    #[test]
    fn test_clear_single_key() {
        let mut cache = FieldOptionCache::new();
        cache.insert("stage", stage_options());
        cache.insert("source", vec![FieldOption::new("web", "Web")]);

        cache.clear_cache(Some("stage"));

        assert!(!cache.contains("stage"));
        assert!(cache.contains("source"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_all() {
        let mut cache = FieldOptionCache::new();
        cache.insert("stage", stage_options());
        cache.insert("source", vec![]);

        cache.clear_cache(None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear_missing_key_is_noop() {
        let mut cache = FieldOptionCache::new();
        cache.insert("stage", stage_options());
        cache.clear_cache(Some("nope"));
        assert_eq!(cache.len(), 1);
    }
}
