//! Pure transforms over [`BooleanQuery`] values.
//!
//! Every edit helper takes the current query by reference and returns a new
//! one; the input is never modified. [`FilterTreeStore`](crate::FilterTreeStore)
//! routes all of its structural edits through these functions.
//!
//! The reduction [`transform_boolean_query_to_filters`] is lossy: it drops
//! both group logic and query logic and yields the predicates in group order.
//! The current search backend only accepts that flat form.
//! [`transform_boolean_query_to_expression`] keeps the grouping for callers
//! that can consume a nested expression.

use serde::{Deserialize, Serialize};

use crate::model::{BooleanQuery, Filter, FilterGroup, Logic};

/// Creates the canonical default query with the given group id.
pub fn default_query(group_id: impl Into<String>) -> BooleanQuery {
    BooleanQuery::with_default_group(group_id)
}

/// Appends `filter` to the group `group_id`.
///
/// Returns an unchanged copy if no such group exists.
pub fn add_filter_to_group(query: &BooleanQuery, group_id: &str, filter: Filter) -> BooleanQuery {
    let mut next = query.clone();
    if let Some(group) = next.groups.iter_mut().find(|g| g.id == group_id) {
        group.filters.push(filter);
    }
    next
}

/// Removes the predicate at `index` from the group `group_id`.
///
/// Returns an unchanged copy if the group does not exist or the index is out
/// of range.
pub fn remove_filter_from_group(query: &BooleanQuery, group_id: &str, index: usize) -> BooleanQuery {
    let mut next = query.clone();
    if let Some(group) = next.groups.iter_mut().find(|g| g.id == group_id) {
        if index < group.filters.len() {
            group.filters.remove(index);
        }
    }
    next
}

/// Appends a new empty group with the given id and logic.
pub fn add_filter_group(query: &BooleanQuery, group_id: impl Into<String>, logic: Logic) -> BooleanQuery {
    let mut next = query.clone();
    next.groups.push(FilterGroup::new(group_id, logic));
    next
}

/// Removes the group `group_id`.
///
/// If that group is the only one left, the result is the canonical default
/// query built around `new_group_id()`, so `groups` never becomes empty.
/// `new_group_id` is only called in that case. An unknown id returns an
/// unchanged copy.
pub fn remove_filter_group<F>(query: &BooleanQuery, group_id: &str, new_group_id: F) -> BooleanQuery
where
    F: FnOnce() -> String,
{
    if !query.contains_group(group_id) {
        return query.clone();
    }

    let remaining: Vec<FilterGroup> = query
        .groups
        .iter()
        .filter(|g| g.id != group_id)
        .cloned()
        .collect();

    if remaining.is_empty() {
        return default_query(new_group_id());
    }

    BooleanQuery {
        groups: remaining,
        group_logic: query.group_logic,
    }
}

/// Replaces the logic of group `group_id`.
pub fn update_group_logic(query: &BooleanQuery, group_id: &str, logic: Logic) -> BooleanQuery {
    let mut next = query.clone();
    if let Some(group) = next.groups.iter_mut().find(|g| g.id == group_id) {
        group.logic = logic;
    }
    next
}

/// Replaces the logic combining groups.
pub fn update_query_logic(query: &BooleanQuery, logic: Logic) -> BooleanQuery {
    BooleanQuery {
        groups: query.groups.clone(),
        group_logic: logic,
    }
}

/// Flattens the query into the predicate list the search API consumes.
///
/// Group order then predicate order is preserved. AND/OR combinators are
/// discarded, so `(a OR b) AND c` and `a AND b AND c` reduce to the same list.
pub fn transform_boolean_query_to_filters(query: &BooleanQuery) -> Vec<Filter> {
    query
        .groups
        .iter()
        .flat_map(|group| group.filters.iter().cloned())
        .collect()
}

/// Returns true if any group holds at least one predicate.
pub fn has_active_filters(query: &BooleanQuery) -> bool {
    query.groups.iter().any(|g| !g.filters.is_empty())
}

/// Returns the total number of predicates across all groups.
pub fn count_active_filters(query: &BooleanQuery) -> usize {
    query.groups.iter().map(|g| g.filters.len()).sum()
}

/// Nested boolean expression that keeps the query's grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryExpression {
    /// A single predicate.
    Predicate(Filter),
    /// All children must match.
    And(Vec<QueryExpression>),
    /// Any child may match.
    Or(Vec<QueryExpression>),
}

impl QueryExpression {
    fn combine(logic: Logic, mut children: Vec<QueryExpression>) -> Self {
        if children.len() == 1 {
            return children.remove(0);
        }
        match logic {
            Logic::And => QueryExpression::And(children),
            Logic::Or => QueryExpression::Or(children),
        }
    }

    /// Returns the number of predicates in the expression.
    pub fn predicate_count(&self) -> usize {
        match self {
            QueryExpression::Predicate(_) => 1,
            QueryExpression::And(children) | QueryExpression::Or(children) => {
                children.iter().map(QueryExpression::predicate_count).sum()
            }
        }
    }
}

/// Reduces the query to a nested expression, keeping all combinators.
///
/// Empty groups are skipped and single-child nodes collapse into their child.
/// Returns `None` when the query has no predicates.
pub fn transform_boolean_query_to_expression(query: &BooleanQuery) -> Option<QueryExpression> {
    let groups: Vec<QueryExpression> = query
        .groups
        .iter()
        .filter(|g| !g.filters.is_empty())
        .map(|g| {
            let predicates = g
                .filters
                .iter()
                .cloned()
                .map(QueryExpression::Predicate)
                .collect();
            QueryExpression::combine(g.logic, predicates)
        })
        .collect();

    if groups.is_empty() {
        return None;
    }
    Some(QueryExpression::combine(query.group_logic, groups))
}
