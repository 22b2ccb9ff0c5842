//! Boolean filter model for CRM record search.
//!
//! This crate holds the advanced-search query a user builds in the dashboard:
//! groups of field predicates, each group and the whole query combined with
//! AND/OR. It provides:
//!
//! - [`FilterTreeStore`] - the per-session holder of the current query
//! - [`rules`] - operator tables, value validation and display text per field type
//! - [`transform`] - pure tree edits and the reduction to a flat filter list
//! - [`FieldCatalog`] and [`validate_query`] - whole-query checks with suggestions
//! - [`FieldOptionCache`] - per-field choice options with explicit invalidation
//! - [`PresetStore`] - named query presets persisted as JSON
//!
//! # Example
//!
//! ```
//! use crm_filter_rs::{Filter, FilterOperator, FilterTreeStore, Logic};
//!
//! let mut store = FilterTreeStore::new();
//! let first = store.groups()[0].id.clone();
//! store.add_filter(&first, Filter::new("status", FilterOperator::Equals, "open"));
//! store.update_query_logic(Logic::Or);
//!
//! let applied = store.apply_filters();
//! assert_eq!(applied[0].field, "status");
//! ```

pub mod catalog;
pub mod model;
pub mod option_cache;
pub mod preset_store;
pub mod rules;
pub mod transform;
pub mod tree_store;
pub mod validation;

pub use catalog::{display_text_with_catalog, find_similar_name, FieldCatalog, FieldDefinition};
pub use model::{BooleanQuery, FieldType, Filter, FilterGroup, FilterOperator, Logic};
pub use option_cache::{FieldOption, FieldOptionCache};
pub use preset_store::{FilterPreset, PresetBook, PresetStore, PresetStoreError};
pub use transform::{
    count_active_filters, has_active_filters, transform_boolean_query_to_expression,
    transform_boolean_query_to_filters, QueryExpression,
};
pub use tree_store::{FilterTreeStore, GroupIdGenerator, SequentialGroupIds, UuidGroupIds};
pub use validation::{
    validate_filter, validate_query, validate_query_with_options, FilterIssue, LocatedIssue,
};
