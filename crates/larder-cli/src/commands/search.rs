//! Search command

use clap::Args;

use crate::output::{print_json, print_table};
use crate::AppContext;
use larder_core::{EntityKind, SearchMode, SearchQuery};
use larder_search::{documents_from, engine_for, FuzzySearchEngine, SearchEngine};

#[derive(Args)]
pub struct SearchArgs {
    /// Text to look for in names (omit to list everything)
    pub query: Option<String>,

    /// Enable fuzzy search
    #[arg(long)]
    pub fuzzy: bool,

    /// Fuzzy threshold (0.0-1.0, relative to the best hit)
    #[arg(long, default_value = "0.0")]
    pub threshold: f32,

    /// Only these kinds: ingredient, category, recipe (repeatable)
    #[arg(short, long)]
    pub kind: Vec<EntityKind>,

    /// Page number (0-based)
    #[arg(long, default_value = "0")]
    pub page: usize,

    /// Limit results
    #[arg(short, long, default_value = "100")]
    pub limit: usize,
}

pub async fn run(args: &SearchArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let mode = if args.fuzzy {
        SearchMode::Fuzzy
    } else {
        SearchMode::Exact
    };

    let mut query = match &args.query {
        Some(text) => SearchQuery::new(text.as_str()),
        None => SearchQuery::empty(),
    }
    .with_mode(mode)
    .with_pagination(args.page, args.limit);
    for kind in &args.kind {
        if *kind == EntityKind::RecipeIngredient {
            anyhow::bail!("Recipe ingredient lines have no names to search");
        }
        query = query.with_kind(*kind);
    }

    let documents = documents_from(&ctx.graph.snapshot());
    let engine: Box<dyn SearchEngine> = match mode {
        SearchMode::Fuzzy => Box::new(FuzzySearchEngine::new().with_threshold(args.threshold)),
        SearchMode::Exact => engine_for(mode),
    };
    let hits = engine.search(&query, &documents).await?;
    tracing::info!("Search matched {} of {} names", hits.len(), documents.len());

    if ctx.json() {
        print_json(&hits)?;
    } else if hits.is_empty() {
        println!("No matches");
    } else {
        let rows: Vec<Vec<String>> = hits
            .iter()
            .map(|hit| {
                let mut row = vec![hit.document.name.clone(), hit.document.kind().to_string()];
                if args.fuzzy {
                    row.push(format!("{:.2}", hit.score));
                }
                row
            })
            .collect();
        if args.fuzzy {
            print_table(&["NAME", "KIND", "SCORE"], &rows);
        } else {
            print_table(&["NAME", "KIND"], &rows);
        }
    }

    Ok(())
}
