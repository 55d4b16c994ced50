//! Category commands

use clap::{Args, Subcommand};

use super::resolve;
use crate::output::{print_json, print_table};
use crate::AppContext;
use larder_core::NameFilter;

#[derive(Args)]
pub struct CategoryArgs {
    #[command(subcommand)]
    pub command: CategoryCommands,
}

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Add a new category
    Add {
        /// Category name
        name: String,
    },
    /// Rename a category
    Rename {
        /// Category name or id
        category: String,
        /// New name
        name: String,
    },
    /// Remove a category; its recipes are kept without a category
    Remove {
        /// Category name or id
        category: String,
    },
    /// List categories
    List {
        /// Only names containing this text
        #[arg(short, long)]
        contains: Option<String>,
        /// Limit results
        #[arg(short, long, default_value = "100")]
        limit: usize,
    },
    /// Show a category and its recipes
    Show {
        /// Category name or id
        category: String,
    },
}

pub async fn run(args: &CategoryArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let graph = &ctx.graph;

    match &args.command {
        CategoryCommands::Add { name } => {
            let category = graph.add_category(name).await?;
            if ctx.json() {
                print_json(&*category)?;
            } else {
                println!("Added category: {} ({})", category.name, category.id);
            }
        }
        CategoryCommands::Rename { category, name } => {
            let current = resolve(graph.snapshot().categories(), category)?;
            let renamed = graph.rename_category(current.id, name).await?;
            if ctx.json() {
                print_json(&*renamed)?;
            } else {
                println!("Renamed category: {} -> {}", current.name, renamed.name);
            }
        }
        CategoryCommands::Remove { category } => {
            let current = resolve(graph.snapshot().categories(), category)?;
            let detached = graph.recipes_in_category(current.id)?.len();
            let removed = graph.remove_category(current.id).await?;

            if ctx.json() {
                print_json(&*removed)?;
            } else {
                println!("Removed category: {}", removed.name);
                if detached > 0 {
                    println!("  {} recipe(s) no longer have a category", detached);
                }
            }
        }
        CategoryCommands::List { contains, limit } => {
            let filter = NameFilter {
                contains: contains.clone(),
            };
            let state = graph.snapshot();
            let categories: Vec<_> = graph.categories(&filter).iter().take(*limit).collect();

            if ctx.json() {
                print_json(&categories)?;
            } else if categories.is_empty() {
                println!("No categories found");
            } else {
                let rows: Vec<Vec<String>> = categories
                    .iter()
                    .map(|c| {
                        vec![
                            c.name.clone(),
                            state.index().recipe_count(c.id).to_string(),
                            c.id.to_string(),
                        ]
                    })
                    .collect();
                print_table(&["NAME", "RECIPES", "ID"], &rows);
            }
        }
        CategoryCommands::Show { category } => {
            let current = resolve(graph.snapshot().categories(), category)?;
            let recipes = graph.recipes_in_category(current.id)?.to_vec();

            if ctx.json() {
                print_json(&serde_json::json!({
                    "category": &*current,
                    "recipes": recipes,
                }))?;
            } else {
                println!("Category: {}", current.name);
                println!("  Id: {}", current.id);
                println!("  Created: {}", current.created_at);
                if recipes.is_empty() {
                    println!("  No recipes");
                } else {
                    println!("  Recipes ({}):", recipes.len());
                    for recipe in &recipes {
                        println!("    - {}", recipe.name);
                    }
                }
            }
        }
    }

    Ok(())
}
