//! Ingredient commands

use clap::{Args, Subcommand};

use super::resolve;
use crate::output::{print_json, print_table};
use crate::AppContext;
use larder_core::NameFilter;

#[derive(Args)]
pub struct IngredientArgs {
    #[command(subcommand)]
    pub command: IngredientCommands,
}

#[derive(Subcommand)]
pub enum IngredientCommands {
    /// Add a new ingredient
    Add {
        /// Ingredient name
        name: String,
    },
    /// Rename an ingredient
    Rename {
        /// Ingredient name or id
        ingredient: String,
        /// New name
        name: String,
    },
    /// Remove an ingredient (and its lines in every recipe)
    Remove {
        /// Ingredient name or id
        ingredient: String,
        /// Remove even when recipes use it
        #[arg(long)]
        force: bool,
    },
    /// List ingredients
    List {
        /// Only names containing this text
        #[arg(short, long)]
        contains: Option<String>,
        /// Limit results
        #[arg(short, long, default_value = "100")]
        limit: usize,
    },
    /// Show an ingredient and the recipes using it
    Show {
        /// Ingredient name or id
        ingredient: String,
    },
}

pub async fn run(args: &IngredientArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let graph = &ctx.graph;

    match &args.command {
        IngredientCommands::Add { name } => {
            let ingredient = graph.add_ingredient(name).await?;
            if ctx.json() {
                print_json(&*ingredient)?;
            } else {
                println!("Added ingredient: {} ({})", ingredient.name, ingredient.id);
            }
        }
        IngredientCommands::Rename { ingredient, name } => {
            let current = resolve(graph.snapshot().ingredients(), ingredient)?;
            let renamed = graph.rename_ingredient(current.id, name).await?;
            if ctx.json() {
                print_json(&*renamed)?;
            } else {
                println!("Renamed ingredient: {} -> {}", current.name, renamed.name);
            }
        }
        IngredientCommands::Remove { ingredient, force } => {
            let current = resolve(graph.snapshot().ingredients(), ingredient)?;
            let usage = graph.ingredient_usage(current.id)?;
            if !usage.is_unused() && !force {
                anyhow::bail!(
                    "'{}' is used by {} recipe(s); use --force to remove it along with those lines",
                    current.name,
                    usage.recipe_count()
                );
            }

            let removed = graph.remove_ingredient(current.id).await?;
            if ctx.json() {
                print_json(&*removed)?;
            } else {
                println!("Removed ingredient: {}", removed.name);
            }
        }
        IngredientCommands::List { contains, limit } => {
            let filter = NameFilter {
                contains: contains.clone(),
            };
            let listing = graph.ingredients(&filter);
            let state = graph.snapshot();
            let ingredients: Vec<_> = listing.iter().take(*limit).collect();

            if ctx.json() {
                print_json(&ingredients)?;
            } else if ingredients.is_empty() {
                println!("No ingredients found");
            } else {
                let rows: Vec<Vec<String>> = ingredients
                    .iter()
                    .map(|i| {
                        vec![
                            i.name.clone(),
                            state.index().usage_count(i.id).to_string(),
                            i.id.to_string(),
                        ]
                    })
                    .collect();
                print_table(&["NAME", "LINES", "ID"], &rows);
            }
        }
        IngredientCommands::Show { ingredient } => {
            let current = resolve(graph.snapshot().ingredients(), ingredient)?;
            let usage = graph.ingredient_usage(current.id)?;

            if ctx.json() {
                print_json(&usage)?;
            } else {
                println!("Ingredient: {}", usage.ingredient.name);
                println!("  Id: {}", usage.ingredient.id);
                println!("  Created: {}", usage.ingredient.created_at);
                println!("  Updated: {}", usage.ingredient.updated_at);
                if usage.is_unused() {
                    println!("  Not used by any recipe");
                } else {
                    println!("  Used in:");
                    for (recipe, line) in &usage.uses {
                        if line.quantity.is_empty() {
                            println!("    - {}", recipe.name);
                        } else {
                            println!("    - {} ({})", recipe.name, line.quantity);
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
