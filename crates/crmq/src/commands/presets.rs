//! Presets command implementation.
//!
//! Lists, shows, applies, imports and deletes saved filter presets.
//! Applying a preset restores it into a [`FilterTreeStore`] and prints the
//! flat filter list that the record search API consumes.

use std::fs;
use std::path::Path;

use crm_filter_rs::{
    transform_boolean_query_to_expression, validate_query, BooleanQuery, FieldCatalog, Filter,
    FilterPreset, FilterTreeStore, GroupIdGenerator, PresetBook, PresetStore,
};
use serde_json::Value;
use tracing::{debug, info};

use super::config::Config;
use super::{CommandContext, CommandError, Result};
use crate::output::{
    format_applied_filters_json, format_applied_filters_table, format_expression_json,
    format_expression_table, format_preset_details_json, format_preset_details_table, format_presets_json,
    format_presets_table,
};

/// Loads the preset book for `config`.
async fn load_book(config: &Config) -> Result<(PresetStore, PresetBook)> {
    let store = config.preset_store()?;
    debug!(path = %store.path().display(), "loading presets");
    let book = store.load_or_default_async().await?;
    Ok((store, book))
}

/// Finds a preset or returns a not-found error with a suggestion.
fn find_preset<'a>(book: &'a PresetBook, name: &str) -> Result<&'a FilterPreset> {
    book.get(name).ok_or_else(|| CommandError::PresetNotFound {
        name: name.to_string(),
        suggestion: book.suggest(name),
    })
}

/// Executes the presets list command.
pub async fn execute_list(ctx: &CommandContext, config: &Config) -> Result<()> {
    let (store, book) = load_book(config).await?;

    if ctx.json_output {
        println!("{}", format_presets_json(book.presets())?);
    } else if !ctx.quiet {
        if ctx.verbose {
            println!("Presets file: {}\n", store.path().display());
        }
        print!("{}", format_presets_table(book.presets(), ctx.use_colors));
    }

    Ok(())
}

/// Executes the presets show command.
pub async fn execute_show(ctx: &CommandContext, config: &Config, name: &str) -> Result<()> {
    let (_, book) = load_book(config).await?;
    let preset = find_preset(&book, name)?;

    if ctx.json_output {
        println!("{}", format_preset_details_json(preset)?);
    } else if !ctx.quiet {
        print!("{}", format_preset_details_table(preset, ctx.use_colors));
    }

    Ok(())
}

/// Options for the presets apply command.
#[derive(Debug)]
pub struct PresetApplyOptions {
    /// Preset name.
    pub name: String,
    /// Print the nested expression instead of the flat list.
    pub nested: bool,
}

/// Executes the presets apply command.
pub async fn execute_apply(
    ctx: &CommandContext,
    config: &Config,
    opts: &PresetApplyOptions,
) -> Result<()> {
    let (_, book) = load_book(config).await?;
    let preset = find_preset(&book, &opts.name)?;

    if opts.nested {
        let expression = transform_boolean_query_to_expression(&preset.query);
        if ctx.json_output {
            println!("{}", format_expression_json(expression.as_ref())?);
        } else if !ctx.quiet {
            print!(
                "{}",
                format_expression_table(expression.as_ref(), ctx.use_colors)
            );
        }
        return Ok(());
    }

    let applied = apply_preset(preset, config.id_generator());
    debug!(preset = %preset.name, count = applied.len(), "preset applied");

    if ctx.json_output {
        println!("{}", format_applied_filters_json(&applied)?);
    } else if !ctx.quiet {
        print!("{}", format_applied_filters_table(&applied, ctx.use_colors));
    }

    Ok(())
}

/// Restores a preset into a fresh session store and applies it.
pub fn apply_preset<G: GroupIdGenerator>(preset: &FilterPreset, ids: G) -> Vec<Filter> {
    let mut session = FilterTreeStore::with_id_generator(ids);
    session.update_boolean_query(preset.query.clone());
    session.apply_filters().to_vec()
}

/// Options for the presets import command.
#[derive(Debug)]
pub struct PresetImportOptions<'a> {
    /// Preset name.
    pub name: &'a str,
    /// Query file.
    pub file: &'a Path,
    /// Optional field catalog file.
    pub catalog: Option<&'a Path>,
}

/// Executes the presets import command.
///
/// # Errors
///
/// Returns `CommandError::InvalidQuery` when a catalog is given and the query
/// does not validate against it. Nothing is saved in that case.
pub async fn execute_import(
    ctx: &CommandContext,
    config: &Config,
    opts: &PresetImportOptions<'_>,
) -> Result<()> {
    let contents = fs::read_to_string(opts.file)?;
    let query = read_query(&contents, config.id_generator())?;

    if let Some(catalog_path) = opts.catalog {
        let catalog: FieldCatalog = serde_json::from_str(&fs::read_to_string(catalog_path)?)?;
        check_query(&query, &catalog)?;
    }

    let (store, mut book) = load_book(config).await?;
    let replaced = book
        .upsert(FilterPreset::new(opts.name, query))
        .is_some();
    store.save_async(&book).await?;
    info!(preset = opts.name, replaced, "preset saved");

    if ctx.json_output {
        let output = serde_json::json!({
            "name": opts.name,
            "replaced": replaced,
            "path": store.path().display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        let verb = if replaced { "Updated" } else { "Saved" };
        println!("{verb} preset '{}'", opts.name);
    }

    Ok(())
}

/// Parses an imported query file.
///
/// A JSON array is a flat predicate list, rebuilt through a
/// [`FilterTreeStore`] as one `AND` group with an id from `ids`. Anything
/// else must be a full boolean query with at least one group.
pub fn read_query<G: GroupIdGenerator>(contents: &str, ids: G) -> Result<BooleanQuery> {
    match serde_json::from_str::<Value>(contents)? {
        Value::Array(items) => {
            let filters: Vec<Filter> = serde_json::from_value(Value::Array(items))?;
            let mut session = FilterTreeStore::with_id_generator(ids);
            let group_id = session.groups()[0].id.clone();
            for filter in filters {
                session.add_filter(&group_id, filter);
            }
            Ok(session.boolean_query().clone())
        }
        other => {
            let query: BooleanQuery = serde_json::from_value(other)?;
            if query.groups.is_empty() {
                return Err(CommandError::InvalidQuery(
                    "  query has no groups".to_string(),
                ));
            }
            Ok(query)
        }
    }
}

/// Validates a query against a catalog, collecting every issue.
pub fn check_query(query: &BooleanQuery, catalog: &FieldCatalog) -> Result<()> {
    let issues = validate_query(query, catalog);
    if issues.is_empty() {
        return Ok(());
    }

    let lines: Vec<String> = issues
        .iter()
        .map(|located| {
            format!(
                "  group {} #{}: {}",
                located.group_id,
                located.index + 1,
                located.issue
            )
        })
        .collect();
    Err(CommandError::InvalidQuery(lines.join("\n")))
}

/// Options for the presets delete command.
#[derive(Debug)]
pub struct PresetDeleteOptions {
    /// Preset name.
    pub name: String,
    /// Skip confirmation.
    pub force: bool,
}

/// Executes the presets delete command.
///
/// Asks for confirmation unless `--force` is given or output is JSON.
pub async fn execute_delete(
    ctx: &CommandContext,
    config: &Config,
    opts: &PresetDeleteOptions,
) -> Result<()> {
    let (store, mut book) = load_book(config).await?;
    find_preset(&book, &opts.name)?;

    if !opts.force && !ctx.json_output {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!("Delete preset '{}'?", opts.name))
            .default(false)
            .interact()
            .map_err(|e| CommandError::Io(std::io::Error::other(e)))?;
        if !confirmed {
            if !ctx.quiet {
                println!("Cancelled.");
            }
            return Ok(());
        }
    }

    book.remove(&opts.name);
    store.save_async(&book).await?;
    info!(preset = %opts.name, "preset deleted");

    if ctx.json_output {
        let output = serde_json::json!({ "name": opts.name, "deleted": true });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Deleted preset '{}'", opts.name);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_filter_rs::{FieldDefinition, FieldType, FilterOperator, Logic, SequentialGroupIds};
    use serde_json::json;

    #[test]
    fn test_read_query_full() {
        let contents = json!({
            "groups": [
                {"id": "a", "logic": "OR", "filters": [
                    {"field": "status", "operator": "equals", "value": "open"}
                ]}
            ],
            "groupLogic": "AND"
        })
        .to_string();

        let query = read_query(&contents, SequentialGroupIds::new("g")).unwrap();
        assert_eq!(query.groups[0].id, "a");
        assert_eq!(query.groups[0].logic, Logic::Or);
    }

    #[test]
    fn test_read_query_flat_list_builds_single_group() {
        let contents = json!([
            {"field": "status", "operator": "equals", "value": "open"},
            {"field": "owner", "operator": "is_empty"}
        ])
        .to_string();

        let query = read_query(&contents, SequentialGroupIds::new("g")).unwrap();
        assert_eq!(query.groups.len(), 1);
        assert_eq!(query.groups[0].id, "g1");
        assert_eq!(query.groups[0].filters.len(), 2);
        assert_eq!(query.group_logic, Logic::And);
    }

    #[test]
    fn test_read_query_empty_list_is_one_empty_group() {
        let query = read_query("[]", SequentialGroupIds::new("g")).unwrap();
        assert_eq!(query.groups.len(), 1);
        assert_eq!(query.groups[0].id, "g1");
        assert_eq!(query.groups[0].logic, Logic::And);
        assert!(query.groups[0].filters.is_empty());
    }

    #[test]
    fn test_read_query_bad_predicate_in_list() {
        let err = read_query(
            r#"[{"field": "status", "operator": "between"}]"#,
            SequentialGroupIds::new("g"),
        )
        .unwrap_err();
        assert!(matches!(err, CommandError::Json(_)));
    }

    #[test]
    fn test_read_query_rejects_groupless_query() {
        let err = read_query(r#"{"groups": [], "groupLogic": "AND"}"#, SequentialGroupIds::new("g"))
            .unwrap_err();
        assert!(matches!(err, CommandError::InvalidQuery(_)));
    }

    #[test]
    fn test_read_query_bad_json() {
        let err = read_query("{", SequentialGroupIds::new("g")).unwrap_err();
        assert!(matches!(err, CommandError::Json(_)));
    }

    #[test]
    fn test_check_query_lists_all_issues() {
        let catalog = FieldCatalog::new([
            FieldDefinition::new("status", FieldType::Select),
            FieldDefinition::new("amount", FieldType::Currency),
        ]);
        let query = read_query(
            &json!([
                {"field": "statis", "operator": "equals", "value": "open"},
                {"field": "amount", "operator": "greater_than", "value": "lots"}
            ])
            .to_string(),
            SequentialGroupIds::new("g"),
        )
        .unwrap();

        let err = check_query(&query, &catalog).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("group g1 #1: unknown field 'statis' (did you mean 'status'?)"));
        assert!(message.contains("group g1 #2: invalid value for 'amount' greater_than"));
    }

    #[test]
    fn test_apply_preset_flattens() {
        let query = read_query(
            &json!({
                "groups": [
                    {"id": "g1", "logic": "AND", "filters": [
                        {"field": "status", "operator": "equals", "value": "open"}
                    ]},
                    {"id": "g2", "logic": "OR", "filters": [
                        {"field": "priority", "operator": "greater_than", "value": 3}
                    ]}
                ],
                "groupLogic": "OR"
            })
            .to_string(),
            SequentialGroupIds::new("g"),
        )
        .unwrap();
        let preset = FilterPreset::new("mixed", query);

        let applied = apply_preset(&preset, SequentialGroupIds::new("s"));
        assert_eq!(
            applied,
            vec![
                Filter::new("status", FilterOperator::Equals, "open"),
                Filter::new("priority", FilterOperator::GreaterThan, 3),
            ]
        );
    }

    #[test]
    fn test_find_preset_suggests() {
        let mut book = PresetBook::new();
        book.upsert(FilterPreset::new(
            "open deals",
            BooleanQuery::with_default_group("g1"),
        ));

        let err = find_preset(&book, "open deal").unwrap_err();
        assert_eq!(
            err.to_string(),
            "preset 'open deal' not found. Did you mean 'open deals'?"
        );
    }
}
