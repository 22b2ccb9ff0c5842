//! Field catalog supplied by the owning page.
//!
//! The rules only ever need a field's declared type; the catalog also keeps a
//! display label and offers "did you mean" suggestions for unknown names.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strsim::levenshtein;

use crate::model::{FieldType, Filter};
use crate::rules;

/// Maximum Levenshtein distance to consider a name as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Declaration of one record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field identifier used in predicates.
    pub name: String,

    /// Human-readable label. Falls back to `name` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Declared type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldDefinition {
    /// Creates a definition without a label.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: None,
            field_type,
        }
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns the label, or the name if no label is set.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// Mapping from field name to definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<FieldDefinition>", into = "Vec<FieldDefinition>")]
pub struct FieldCatalog {
    fields: BTreeMap<String, FieldDefinition>,
}

impl FieldCatalog {
    /// Builds a catalog. Later definitions replace earlier ones with the same name.
    pub fn new(definitions: impl IntoIterator<Item = FieldDefinition>) -> Self {
        let fields = definitions
            .into_iter()
            .map(|def| (def.name.clone(), def))
            .collect();
        Self { fields }
    }

    /// Finds a field by exact name.
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    /// Returns the declared type of a field.
    pub fn field_type(&self, name: &str) -> Option<&FieldType> {
        self.fields.get(name).map(|def| &def.field_type)
    }

    /// Returns all field names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the catalog has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Suggests a known field name close to `name`.
    pub fn suggest(&self, name: &str) -> Option<String> {
        find_similar_name(name, self.names())
    }
}

/// Finds the best matching name from a list of candidates using Levenshtein distance.
///
/// Returns `None` for exact matches (case-insensitive) and when nothing is
/// within edit distance 3.
pub fn find_similar_name<'a>(query: &str, candidates: impl Iterator<Item = &'a str>) -> Option<String> {
    let query_lower = query.to_lowercase();

    let (best_match, best_distance) = candidates
        .filter(|name| !name.is_empty())
        .map(|name| {
            let distance = levenshtein(&query_lower, &name.to_lowercase());
            (name.to_string(), distance)
        })
        .min_by_key(|(_, d)| *d)?;

    if best_distance > 0 && best_distance <= MAX_SUGGESTION_DISTANCE {
        Some(best_match)
    } else {
        None
    }
}

impl From<Vec<FieldDefinition>> for FieldCatalog {
    fn from(definitions: Vec<FieldDefinition>) -> Self {
        Self::new(definitions)
    }
}

impl From<FieldCatalog> for Vec<FieldDefinition> {
    fn from(catalog: FieldCatalog) -> Self {
        catalog.fields.into_values().collect()
    }
}

/// Renders a predicate using the field's catalog label when known.
pub fn display_text_with_catalog(filter: &Filter, catalog: &FieldCatalog) -> String {
    match catalog.field(&filter.field) {
        Some(def) => rules::filter_display_text_with_label(filter, def.display_label()),
        None => rules::filter_display_text(filter),
    }
}
