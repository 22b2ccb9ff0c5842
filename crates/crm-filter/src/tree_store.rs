//! Session-scoped holder of the current boolean query.
//!
//! [`FilterTreeStore`] owns one [`BooleanQuery`] and the last applied flat
//! filter list. Structural edits go through the pure functions in
//! [`crate::transform`]; the store only swaps in the returned value.
//!
//! Edits that reference a missing group or index are ignored. The UI can race
//! a group removal against an edit to the same group, and the late edit is
//! simply dropped.
//!
//! # Example
//!
//! ```
//! use crm_filter_rs::{Filter, FilterOperator, FilterTreeStore, Logic, SequentialGroupIds};
//!
//! let mut store = FilterTreeStore::with_id_generator(SequentialGroupIds::new("g"));
//! store.add_filter("g1", Filter::new("status", FilterOperator::Equals, "open"));
//!
//! let second = store.add_group(Logic::Or);
//! store.add_filter(&second, Filter::new("priority", FilterOperator::GreaterThan, 3));
//!
//! let applied = store.apply_filters();
//! assert_eq!(applied.len(), 2);
//! assert_eq!(store.count_active_filters(), 2);
//! ```

use std::collections::HashSet;

use tracing::debug;
use uuid::Uuid;

use crate::model::{BooleanQuery, Filter, FilterGroup, Logic};
use crate::transform;

/// Source of group identifiers.
pub trait GroupIdGenerator {
    /// Returns a new candidate id. Must not repeat a previously returned id.
    fn next_id(&mut self) -> String;
}

/// Generates random UUID v4 group ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGroupIds;

impl GroupIdGenerator for UuidGroupIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Generates `<prefix>1`, `<prefix>2`, ... in order.
#[derive(Debug, Clone)]
pub struct SequentialGroupIds {
    prefix: String,
    next: u64,
}

impl SequentialGroupIds {
    /// Creates a generator starting at `<prefix>1`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl GroupIdGenerator for SequentialGroupIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

impl<G: GroupIdGenerator + ?Sized> GroupIdGenerator for Box<G> {
    fn next_id(&mut self) -> String {
        (**self).next_id()
    }
}

/// Holds the current query and the last applied filter list for one session.
#[derive(Debug, Clone)]
pub struct FilterTreeStore<G = UuidGroupIds> {
    query: BooleanQuery,
    applied: Vec<Filter>,
    ids: G,
    /// Every group id this store has issued or been handed.
    seen_ids: HashSet<String>,
}

impl Default for FilterTreeStore<UuidGroupIds> {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterTreeStore<UuidGroupIds> {
    /// Creates a store with one empty default group and UUID group ids.
    pub fn new() -> Self {
        Self::with_id_generator(UuidGroupIds)
    }
}

impl<G: GroupIdGenerator> FilterTreeStore<G> {
    /// Creates a store with one empty default group, drawing ids from `ids`.
    pub fn with_id_generator(mut ids: G) -> Self {
        let first = ids.next_id();
        let query = transform::default_query(first.clone());
        Self {
            query,
            applied: Vec::new(),
            ids,
            seen_ids: HashSet::from([first]),
        }
    }

    // ==================== Reads ====================

    /// Returns the current query.
    pub fn boolean_query(&self) -> &BooleanQuery {
        &self.query
    }

    /// Returns the current groups.
    pub fn groups(&self) -> &[FilterGroup] {
        &self.query.groups
    }

    /// Returns the logic combining groups.
    pub fn group_logic(&self) -> Logic {
        self.query.group_logic
    }

    /// Finds a group by id.
    pub fn group(&self, group_id: &str) -> Option<&FilterGroup> {
        self.query.group(group_id)
    }

    /// Returns the list produced by the last [`apply_filters`](Self::apply_filters).
    pub fn applied_filters(&self) -> &[Filter] {
        &self.applied
    }

    /// Returns true if the current query has any predicate.
    pub fn has_active_filters(&self) -> bool {
        transform::has_active_filters(&self.query)
    }

    /// Returns the number of predicates in the current query.
    pub fn count_active_filters(&self) -> usize {
        transform::count_active_filters(&self.query)
    }

    // ==================== Mutations ====================

    /// Appends a predicate to a group. Unknown group ids are ignored.
    pub fn add_filter(&mut self, group_id: &str, filter: Filter) {
        if !self.query.contains_group(group_id) {
            debug!(group_id, "add_filter ignored: unknown group");
            return;
        }
        self.query = transform::add_filter_to_group(&self.query, group_id, filter);
    }

    /// Removes the predicate at `index` from a group.
    ///
    /// Unknown groups and out-of-range indexes are ignored.
    pub fn remove_filter(&mut self, group_id: &str, index: usize) {
        let in_range = self
            .query
            .group(group_id)
            .is_some_and(|g| index < g.filters.len());
        if !in_range {
            debug!(group_id, index, "remove_filter ignored: no such predicate");
            return;
        }
        self.query = transform::remove_filter_from_group(&self.query, group_id, index);
    }

    /// Appends an empty group and returns its id.
    pub fn add_group(&mut self, logic: Logic) -> String {
        let id = self.fresh_group_id();
        self.query = transform::add_filter_group(&self.query, id.clone(), logic);
        id
    }

    /// Appends an empty `AND` group and returns its id.
    pub fn add_default_group(&mut self) -> String {
        self.add_group(Logic::And)
    }

    /// Removes a group.
    ///
    /// Removing the last group resets the query to one empty group with a new
    /// id. Unknown group ids are ignored.
    pub fn remove_group(&mut self, group_id: &str) {
        if !self.query.contains_group(group_id) {
            debug!(group_id, "remove_group ignored: unknown group");
            return;
        }
        let new_id = if self.query.groups.len() == 1 {
            Some(self.fresh_group_id())
        } else {
            None
        };
        self.query = transform::remove_filter_group(&self.query, group_id, || {
            new_id.unwrap_or_default()
        });
    }

    /// Sets the logic of one group. Unknown group ids are ignored.
    pub fn update_group_logic(&mut self, group_id: &str, logic: Logic) {
        if !self.query.contains_group(group_id) {
            debug!(group_id, "update_group_logic ignored: unknown group");
            return;
        }
        self.query = transform::update_group_logic(&self.query, group_id, logic);
    }

    /// Sets the logic combining groups.
    pub fn update_query_logic(&mut self, logic: Logic) {
        self.query = transform::update_query_logic(&self.query, logic);
    }

    /// Replaces the whole query, e.g. when restoring a saved preset.
    ///
    /// The value is taken as-is; an empty `groups` list is not repaired.
    pub fn update_boolean_query(&mut self, query: BooleanQuery) {
        if query.groups.is_empty() {
            debug!("restored query has no groups");
        }
        self.seen_ids
            .extend(query.groups.iter().map(|group| group.id.clone()));
        self.query = query;
    }

    /// Resets to one empty group with a new id and clears the applied list.
    pub fn clear_filters(&mut self) {
        let id = self.fresh_group_id();
        self.query = transform::default_query(id);
        self.applied.clear();
    }

    /// Reduces the current query and stores the result as the applied list.
    pub fn apply_filters(&mut self) -> &[Filter] {
        self.applied = transform::transform_boolean_query_to_filters(&self.query);
        debug!(count = self.applied.len(), "filters applied");
        &self.applied
    }

    /// Draws ids until one has never been issued or restored in this session.
    ///
    /// Removed ids stay reserved, including across `clear_filters`.
    fn fresh_group_id(&mut self) -> String {
        loop {
            let id = self.ids.next_id();
            if !self.seen_ids.contains(&id) && !self.query.contains_group(&id) {
                self.seen_ids.insert(id.clone());
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FilterOperator;
    use serde_json::json;

    fn sequential_store() -> FilterTreeStore<SequentialGroupIds> {
        FilterTreeStore::with_id_generator(SequentialGroupIds::new("g"))
    }

    fn status_open() -> Filter {
        Filter::new("status", FilterOperator::Equals, "open")
    }

    #[test]
    fn test_new_store_has_default_group() {
        let store = sequential_store();
        assert_eq!(store.groups().len(), 1);
        assert_eq!(store.groups()[0].id, "g1");
        assert_eq!(store.group_logic(), Logic::And);
        assert!(store.applied_filters().is_empty());
        assert!(!store.has_active_filters());
    }

    #[test]
    fn test_uuid_store_ids_are_unique() {
        let mut store = FilterTreeStore::new();
        let a = store.add_default_group();
        let b = store.add_default_group();
        assert_ne!(a, b);
        assert_ne!(store.groups()[0].id, a);
    }

    #[test]
    fn test_status_priority_scenario() {
        let mut store = sequential_store();
        store.add_filter("g1", status_open());
        let second = store.add_group(Logic::Or);
        store.add_filter(&second, Filter::new("priority", FilterOperator::GreaterThan, 3));

        let applied = store.apply_filters().to_vec();
        assert_eq!(
            serde_json::to_value(&applied).unwrap(),
            json!([
                {"field": "status", "operator": "equals", "value": "open"},
                {"field": "priority", "operator": "greater_than", "value": 3}
            ])
        );
        assert_eq!(store.count_active_filters(), 2);
        assert_eq!(store.group(&second).unwrap().logic, Logic::Or);
    }

    #[test]
    fn test_add_then_remove_round_trip() {
        let mut store = sequential_store();
        store.add_filter("g1", Filter::new("name", FilterOperator::Contains, "acme"));
        let before = store.group("g1").unwrap().filters.clone();

        store.add_filter("g1", status_open());
        store.remove_filter("g1", 1);
        assert_eq!(store.group("g1").unwrap().filters, before);

        let mut empty = sequential_store();
        empty.add_filter("g1", status_open());
        empty.remove_filter("g1", 0);
        assert!(empty.group("g1").unwrap().filters.is_empty());
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut store = sequential_store();
        store.add_filter("g1", status_open());
        let before = store.boolean_query().clone();

        store.add_filter("missing", status_open());
        store.remove_filter("missing", 0);
        store.remove_filter("g1", 5);
        store.remove_group("missing");
        store.update_group_logic("missing", Logic::Or);

        assert_eq!(store.boolean_query(), &before);
    }

    #[test]
    fn test_remove_only_group_resets_with_new_id() {
        let mut store = sequential_store();
        store.add_filter("g1", status_open());
        store.update_group_logic("g1", Logic::Or);
        store.update_query_logic(Logic::Or);

        store.remove_group("g1");

        assert_eq!(store.groups().len(), 1);
        let group = &store.groups()[0];
        assert_ne!(group.id, "g1");
        assert!(group.filters.is_empty());
        assert_eq!(group.logic, Logic::And);
        assert_eq!(store.group_logic(), Logic::And);
    }

    #[test]
    fn test_remove_group_keeps_remaining() {
        let mut store = sequential_store();
        let second = store.add_group(Logic::Or);
        store.remove_group("g1");
        assert_eq!(store.groups().len(), 1);
        assert_eq!(store.groups()[0].id, second);
    }

    #[test]
    fn test_removed_ids_not_reused() {
        let mut store = sequential_store();
        let second = store.add_default_group();
        store.remove_group(&second);
        let third = store.add_default_group();
        assert_ne!(second, third);
    }

    #[test]
    fn test_generated_ids_skip_restored_ids() {
        let mut store = sequential_store();
        store.update_boolean_query(BooleanQuery {
            groups: vec![
                FilterGroup::new("g2", Logic::And),
                FilterGroup::new("g3", Logic::Or),
            ],
            group_logic: Logic::Or,
        });

        let id = store.add_default_group();
        assert_eq!(id, "g4");
    }

    #[test]
    fn test_removed_restored_id_is_not_reissued() {
        let mut store = sequential_store();
        store.update_boolean_query(BooleanQuery {
            groups: vec![
                FilterGroup::new("g3", Logic::And),
                FilterGroup::new("g9", Logic::Or),
            ],
            group_logic: Logic::And,
        });
        store.remove_group("g3");

        let a = store.add_default_group();
        let b = store.add_default_group();
        assert_eq!(a, "g2");
        assert_eq!(b, "g4");
    }

    #[test]
    fn test_removed_ids_stay_reserved_after_clear() {
        let mut store = sequential_store();
        store.update_boolean_query(BooleanQuery {
            groups: vec![FilterGroup::new("g5", Logic::And)],
            group_logic: Logic::And,
        });
        store.clear_filters();
        assert_eq!(store.groups()[0].id, "g2");

        let ids: Vec<String> = (0..4).map(|_| store.add_default_group()).collect();
        assert_eq!(ids, vec!["g3", "g4", "g6", "g7"]);
    }

    #[test]
    fn test_clear_filters_resets_everything() {
        let mut store = sequential_store();
        store.add_filter("g1", status_open());
        store.add_group(Logic::Or);
        store.add_group(Logic::And);
        store.update_query_logic(Logic::Or);
        store.apply_filters();
        assert!(!store.applied_filters().is_empty());

        store.clear_filters();

        assert_eq!(store.groups().len(), 1);
        assert_ne!(store.groups()[0].id, "g1");
        assert!(store.groups()[0].filters.is_empty());
        assert_eq!(store.groups()[0].logic, Logic::And);
        assert_eq!(store.group_logic(), Logic::And);
        assert!(store.applied_filters().is_empty());
    }

    #[test]
    fn test_reads_do_not_depend_on_apply() {
        let mut store = sequential_store();
        store.add_filter("g1", status_open());
        assert_eq!(store.count_active_filters(), 1);
        assert!(store.applied_filters().is_empty());

        store.apply_filters();
        store.remove_filter("g1", 0);
        assert_eq!(store.count_active_filters(), 0);
        assert_eq!(store.applied_filters().len(), 1);
    }

    #[test]
    fn test_restored_empty_query_is_tolerated() {
        let mut store = sequential_store();
        store.update_boolean_query(BooleanQuery {
            groups: vec![],
            group_logic: Logic::And,
        });
        assert!(store.apply_filters().is_empty());
        assert!(!store.has_active_filters());
    }

    #[test]
    fn test_boxed_generator() {
        let ids: Box<dyn GroupIdGenerator> = Box::new(SequentialGroupIds::new("grp-"));
        let store = FilterTreeStore::with_id_generator(ids);
        assert_eq!(store.groups()[0].id, "grp-1");
    }

    #[test]
    fn test_groups_never_empty_after_operations() {
        let mut store = sequential_store();
        for _ in 0..3 {
            let id = store.add_group(Logic::Or);
            store.add_filter(&id, status_open());
        }
        let ids: Vec<String> = store.groups().iter().map(|g| g.id.clone()).collect();
        for id in ids {
            store.remove_group(&id);
            assert!(!store.groups().is_empty());
        }
        let last = store.groups()[0].id.clone();
        store.remove_group(&last);
        assert_eq!(store.groups().len(), 1);
    }
}
