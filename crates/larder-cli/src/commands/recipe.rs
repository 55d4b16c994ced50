//! Recipe commands

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Subcommand};

use super::{resolve, split_line_arg};
use crate::output::{print_json, print_table};
use crate::AppContext;
use larder_core::{GraphState, NameFilter, NewRecipe, Recipe, RecipeIngredient, RecipeUpdate};
use larder_graph::RecipeDetails;

#[derive(Args)]
pub struct RecipeArgs {
    #[command(subcommand)]
    pub command: RecipeCommands,
}

#[derive(Subcommand)]
pub enum RecipeCommands {
    /// Add a new recipe
    Add {
        /// Recipe name
        name: String,
        /// Short description
        #[arg(short, long, default_value = "")]
        summary: String,
        /// Number of servings
        #[arg(long, default_value = "1")]
        serving: u32,
        /// Time estimate in minutes
        #[arg(short, long, default_value = "1")]
        time: u32,
        /// Preparation steps
        #[arg(short, long, default_value = "")]
        instructions: String,
        /// Category name or id
        #[arg(short, long)]
        category: Option<String>,
        /// Ingredient line as NAME=QUANTITY (repeatable)
        #[arg(short = 'g', long = "ingredient")]
        ingredients: Vec<String>,
        /// Picture of the dish
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Change recipe attributes
    Update {
        /// Recipe name or id
        recipe: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New description
        #[arg(short, long)]
        summary: Option<String>,
        /// Number of servings
        #[arg(long)]
        serving: Option<u32>,
        /// Time estimate in minutes
        #[arg(short, long)]
        time: Option<u32>,
        /// Preparation steps
        #[arg(short, long)]
        instructions: Option<String>,
        /// Replace the picture
        #[arg(long, conflicts_with = "clear_image")]
        image: Option<PathBuf>,
        /// Drop the picture
        #[arg(long)]
        clear_image: bool,
    },
    /// Remove a recipe and its ingredient lines
    Remove {
        /// Recipe name or id
        recipe: String,
    },
    /// List recipes
    List {
        /// Only names containing this text
        #[arg(long)]
        contains: Option<String>,
        /// Only recipes in this category (name or id)
        #[arg(short, long)]
        category: Option<String>,
        /// Limit results
        #[arg(short, long, default_value = "100")]
        limit: usize,
    },
    /// Show a recipe with its category and ingredients
    Show {
        /// Recipe name or id
        recipe: String,
    },
    /// Add an ingredient line to a recipe
    Attach {
        /// Recipe name or id
        recipe: String,
        /// Ingredient name or id
        ingredient: String,
        /// Quantity text, e.g. "250 g"
        #[arg(default_value = "")]
        quantity: String,
    },
    /// Remove an ingredient line from a recipe
    Detach {
        /// Recipe name or id
        recipe: String,
        /// Ingredient name or id
        ingredient: String,
    },
    /// Change the quantity on an ingredient line
    Quantity {
        /// Recipe name or id
        recipe: String,
        /// Ingredient name or id
        ingredient: String,
        /// New quantity text
        quantity: String,
    },
    /// File a recipe under a category, or under none when omitted
    SetCategory {
        /// Recipe name or id
        recipe: String,
        /// Category name or id
        category: Option<String>,
    },
}

fn read_image(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading image {}", path.display()))
}

/// The recipe's line for `ingredient`, oldest first when there are several
fn find_line(
    state: &GraphState,
    recipe: &str,
    ingredient: &str,
) -> anyhow::Result<(Arc<Recipe>, Arc<RecipeIngredient>)> {
    let recipe = resolve(state.recipes(), recipe)?;
    let ingredient = resolve(state.ingredients(), ingredient)?;
    let line = state
        .lines_of(recipe.id)
        .into_iter()
        .find(|line| line.ingredient == ingredient.id)
        .ok_or_else(|| anyhow::anyhow!("'{}' is not in '{}'", ingredient.name, recipe.name))?;
    Ok((recipe, line))
}

fn print_details(details: &RecipeDetails) {
    let recipe = &details.recipe;
    println!("Recipe: {}", recipe.name);
    println!("  Id: {}", recipe.id);
    if let Some(category) = &details.category {
        println!("  Category: {}", category.name);
    }
    if !recipe.summary.is_empty() {
        println!("  Summary: {}", recipe.summary);
    }
    println!("  Serves: {}", recipe.serving);
    println!("  Time: {} min", recipe.time);
    if let Some(image) = &recipe.image {
        println!("  Image: {} bytes", image.len());
    }
    if !details.lines.is_empty() {
        println!("  Ingredients:");
        for entry in &details.lines {
            if entry.line.quantity.is_empty() {
                println!("    - {}", entry.ingredient.name);
            } else {
                println!("    - {} {}", entry.line.quantity, entry.ingredient.name);
            }
        }
    }
    if !recipe.instructions.is_empty() {
        println!("  Instructions:");
        for step in recipe.instructions.lines() {
            println!("    {}", step);
        }
    }
}

pub async fn run(args: &RecipeArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let graph = &ctx.graph;

    match &args.command {
        RecipeCommands::Add {
            name,
            summary,
            serving,
            time,
            instructions,
            category,
            ingredients,
            image,
        } => {
            let state = graph.snapshot();
            let mut draft = NewRecipe::new(name.as_str())
                .with_summary(summary.as_str())
                .with_serving(*serving)
                .with_time(*time)
                .with_instructions(instructions.as_str());
            if let Some(category) = category {
                draft = draft.in_category(resolve(state.categories(), category)?.id);
            }
            for line in ingredients {
                let (ingredient, quantity) = split_line_arg(line);
                draft = draft.with_ingredient(resolve(state.ingredients(), ingredient)?.id, quantity);
            }
            if let Some(path) = image {
                draft = draft.with_image(read_image(path)?);
            }

            let recipe = graph.add_recipe(draft).await?;
            if ctx.json() {
                print_json(&graph.recipe_details(recipe.id)?)?;
            } else {
                println!("Added recipe: {} ({})", recipe.name, recipe.id);
            }
        }
        RecipeCommands::Update {
            recipe,
            name,
            summary,
            serving,
            time,
            instructions,
            image,
            clear_image,
        } => {
            let current = resolve(graph.snapshot().recipes(), recipe)?;

            let mut update = RecipeUpdate {
                name: name.clone(),
                summary: summary.clone(),
                serving: *serving,
                time: *time,
                instructions: instructions.clone(),
                image: None,
            };
            if let Some(path) = image {
                update.image = Some(Some(read_image(path)?));
            } else if *clear_image {
                update.image = Some(None);
            }
            if update.is_empty() {
                println!("No changes specified");
                return Ok(());
            }

            let updated = graph.update_recipe(current.id, update).await?;
            if ctx.json() {
                print_json(&*updated)?;
            } else {
                println!("Updated recipe: {}", updated.name);
            }
        }
        RecipeCommands::Remove { recipe } => {
            let current = resolve(graph.snapshot().recipes(), recipe)?;
            let removed = graph.remove_recipe(current.id).await?;
            if ctx.json() {
                print_json(&*removed)?;
            } else {
                println!("Removed recipe: {}", removed.name);
            }
        }
        RecipeCommands::List {
            contains,
            category,
            limit,
        } => {
            let state = graph.snapshot();
            let filter = NameFilter {
                contains: contains.clone(),
            };
            let listing = match category {
                Some(category) => {
                    let category = resolve(state.categories(), category)?;
                    graph.recipes_in_category(category.id)?
                }
                None => graph.recipes(&NameFilter::all()),
            };
            let recipes: Vec<_> = listing
                .iter()
                .filter(|r| filter.matches(&r.name))
                .take(*limit)
                .collect();

            if ctx.json() {
                print_json(&recipes)?;
            } else if recipes.is_empty() {
                println!("No recipes found");
            } else {
                let rows: Vec<Vec<String>> = recipes
                    .iter()
                    .map(|r| {
                        let category = r
                            .category
                            .and_then(|c| state.categories().find(c).map(|c| c.name.clone()))
                            .unwrap_or_default();
                        vec![
                            r.name.clone(),
                            category,
                            state.index().line_count(r.id).to_string(),
                            format!("{} min", r.time),
                        ]
                    })
                    .collect();
                print_table(&["NAME", "CATEGORY", "INGREDIENTS", "TIME"], &rows);
            }
        }
        RecipeCommands::Show { recipe } => {
            let current = resolve(graph.snapshot().recipes(), recipe)?;
            let details = graph.recipe_details(current.id)?;
            if ctx.json() {
                print_json(&details)?;
            } else {
                print_details(&details);
            }
        }
        RecipeCommands::Attach {
            recipe,
            ingredient,
            quantity,
        } => {
            let state = graph.snapshot();
            let recipe = resolve(state.recipes(), recipe)?;
            let ingredient = resolve(state.ingredients(), ingredient)?;
            let line = graph
                .attach_ingredient(recipe.id, ingredient.id, quantity)
                .await?;
            if ctx.json() {
                print_json(&*line)?;
            } else {
                println!("Added {} to {}", ingredient.name, recipe.name);
            }
        }
        RecipeCommands::Detach { recipe, ingredient } => {
            let (recipe, line) = find_line(&graph.snapshot(), recipe, ingredient)?;
            let removed = graph.detach_ingredient(line.id).await?;
            if ctx.json() {
                print_json(&*removed)?;
            } else {
                println!("Removed {} from {}", ingredient, recipe.name);
            }
        }
        RecipeCommands::Quantity {
            recipe,
            ingredient,
            quantity,
        } => {
            let (recipe, line) = find_line(&graph.snapshot(), recipe, ingredient)?;
            let updated = graph.set_quantity(line.id, quantity).await?;
            if ctx.json() {
                print_json(&*updated)?;
            } else {
                println!("Set {} in {} to '{}'", ingredient, recipe.name, updated.quantity);
            }
        }
        RecipeCommands::SetCategory { recipe, category } => {
            let state = graph.snapshot();
            let recipe = resolve(state.recipes(), recipe)?;
            let category = match category {
                Some(category) => Some(resolve(state.categories(), category)?),
                None => None,
            };
            let updated = graph
                .set_recipe_category(recipe.id, category.as_ref().map(|c| c.id))
                .await?;
            if ctx.json() {
                print_json(&*updated)?;
            } else {
                match category {
                    Some(category) => println!("Filed {} under {}", updated.name, category.name),
                    None => println!("{} no longer has a category", updated.name),
                }
            }
        }
    }

    Ok(())
}
