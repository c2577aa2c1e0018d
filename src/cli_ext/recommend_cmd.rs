//! CLI handler for `lrec recommend`.
//!
//! Loads the catalog, resolves the optional category filter, runs the
//! recommender and prints the result as text, a table or JSON.

use anyhow::Result;
use owo_colors::OwoColorize;
use serde_json::json;
use tabled::{Table, Tabled};
use tracing::{info, instrument};

use crate::{
    cli::{AppContext, OutputFormat, RecommendArgs},
    core::{
        error::{ArgumentError, RecommendError},
        model::{Candidate, Category},
        recommend::Recommender,
    },
    infra::{catalog::Catalog, config::Config},
};

/// Settings for one run after merging CLI flags over configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved
{
    pub min_rating: f64,
    pub min_rating_count: u32,
    pub format: OutputFormat,
}

impl Resolved
{
    pub fn merge(
        args: &RecommendArgs,
        cfg: &Config,
    ) -> Self
    {
        Self {
            min_rating: args
                .min_rating
                .unwrap_or(cfg.recommend.min_rating),
            min_rating_count: args
                .min_rating_count
                .unwrap_or(cfg.recommend.min_rating_count),
            format: args
                .format
                .unwrap_or(cfg.output.format),
        }
    }
}

#[instrument(skip_all, fields(user_id = %args.user_id))]
pub fn run(
    args: RecommendArgs,
    cfg: &Config,
    ctx: &AppContext,
) -> Result<()>
{
    let settings = Resolved::merge(&args, cfg);
    let catalog_path = args
        .catalog
        .clone()
        .unwrap_or_else(|| cfg.catalog.clone());
    let catalog = Catalog::load(&catalog_path)?;

    let items = recommend(&catalog, &args, &settings)?;
    info!(count = items.len(), "recommend finished");

    match settings.format
    {
        OutputFormat::Json => print_json(&args.user_id, &items)?,
        OutputFormat::Table => print_table(&items),
        OutputFormat::Text => print_text(&items, ctx),
    }

    Ok(())
}

/// Dispatch to the filtered or unfiltered operation.
pub fn recommend(
    catalog: &Catalog,
    args: &RecommendArgs,
    settings: &Resolved,
) -> Result<Vec<Candidate>, RecommendError>
{
    let recommender = Recommender::new(catalog, catalog);

    if args
        .categories
        .is_empty()
    {
        return recommender.recommend_for_user(
            &args.user_id,
            settings.min_rating,
            settings.min_rating_count,
        );
    }

    let categories = resolve_categories(catalog, &args.categories)?;
    recommender.recommend_for_user_in_categories(
        &args.user_id,
        &categories,
        settings.min_rating,
        settings.min_rating_count,
    )
}

fn resolve_categories(
    catalog: &Catalog,
    ids: &[i64],
) -> Result<Vec<Category>, ArgumentError>
{
    ids.iter()
        .map(|&id| {
            if id <= 0
            {
                return Err(ArgumentError::NonPositiveCategoryId(id));
            }
            catalog
                .category(id)
                .cloned()
                .ok_or(ArgumentError::UnknownCategory(id))
        })
        .collect()
}

fn print_json(
    user_id: &str,
    items: &[Candidate],
) -> Result<()>
{
    let output = json!({
        "user_id": user_id,
        "count": items.len(),
        "items": items,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_table(items: &[Candidate])
{
    #[derive(Tabled)]
    struct Row
    {
        rank: usize,
        category: String,
        resource: String,
        difficulty: u8,
        interest: u8,
        rating: String,
        link: String,
    }

    let rows: Vec<_> = items
        .iter()
        .enumerate()
        .map(|(i, c)| Row {
            rank: i + 1,
            category: c
                .category
                .name
                .clone(),
            resource: c
                .resource
                .name
                .clone(),
            difficulty: c
                .difficulty_level
                .get(),
            interest: c
                .interest_level
                .get(),
            rating: c
                .rating
                .map(|r| format!("{:.2} ({})", r.average, r.count))
                .unwrap_or_else(|| "-".to_string()),
            link: c
                .resource
                .link
                .clone(),
        })
        .collect();

    println!("{}", Table::new(rows));
}

fn print_text(
    items: &[Candidate],
    ctx: &AppContext,
)
{
    if items.is_empty()
    {
        if !ctx.quiet
        {
            println!("No recommendations");
        }
        return;
    }

    for (i, c) in items
        .iter()
        .enumerate()
    {
        let category = format!("[{}]", c.category.name);
        let (category, name) = if ctx.no_color
        {
            (category, c.resource.name.clone())
        }
        else
        {
            (
                category
                    .cyan()
                    .to_string(),
                c.resource
                    .name
                    .bold()
                    .to_string(),
            )
        };

        println!(
            "{}. {} {} (difficulty {}, interest {}) {}",
            i + 1,
            category,
            name,
            c.difficulty_level,
            c.interest_level,
            c.resource.link
        );
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn args(min_rating: Option<f64>) -> RecommendArgs
    {
        RecommendArgs {
            user_id: "u".into(),
            catalog: None,
            categories: vec![],
            min_rating,
            min_rating_count: None,
            format: Some(OutputFormat::Json),
        }
    }

    #[test]
    fn flags_override_config()
    {
        let cfg = Config::default();
        let r = Resolved::merge(&args(Some(3.5)), &cfg);

        assert_eq!(r.min_rating, 3.5);
        assert_eq!(r.min_rating_count, 0);
        assert_eq!(r.format, OutputFormat::Json);
    }

    #[test]
    fn config_fills_missing_flags()
    {
        let r = Resolved::merge(&args(None), &Config::default());
        assert_eq!(r.min_rating, 2.0);
    }

    #[test]
    fn unknown_category_id_is_an_argument_error()
    {
        let catalog = Catalog::default();
        assert_eq!(
            resolve_categories(&catalog, &[5]),
            Err(ArgumentError::UnknownCategory(5))
        );
        assert_eq!(
            resolve_categories(&catalog, &[0]),
            Err(ArgumentError::NonPositiveCategoryId(0))
        );
    }
}
