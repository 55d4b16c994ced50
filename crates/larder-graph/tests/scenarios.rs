//! End-to-end behaviour of the recipe graph

use larder_core::{
    DomainError, EntityKind, EntityRef, NameFilter, NewRecipe, RecipeUpdate, ReferenceError,
    ValidationError,
};
use larder_graph::RecipeGraph;
use larder_storage::{MemoryStorage, RedbStorage, StorageBackend};
use std::sync::Arc;
use tempfile::tempdir;

#[tokio::test]
async fn deleting_a_category_detaches_its_recipes() {
    let graph = RecipeGraph::in_memory().await.unwrap();

    let dessert = graph.add_category("Dessert").await.unwrap();
    let tiramisu = graph
        .add_recipe(NewRecipe::new("Tiramisu").in_category(dessert.id))
        .await
        .unwrap();
    let mascarpone = graph.add_ingredient("Mascarpone").await.unwrap();
    let line = graph
        .attach_ingredient(tiramisu.id, mascarpone.id, "250g")
        .await
        .unwrap();

    graph.remove_category(dessert.id).await.unwrap();

    let recipe = graph.recipe(tiramisu.id).unwrap();
    assert!(recipe.category.is_none());
    assert!(matches!(
        graph.category(dessert.id),
        Err(DomainError::NotFound {
            kind: EntityKind::Category,
            ..
        })
    ));

    let lines = graph.recipe_lines(tiramisu.id).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].id, line.id);
    assert_eq!(lines[0].quantity, "250g");
    assert!(graph.snapshot().is_consistent());
}

#[tokio::test]
async fn deleting_a_recipe_cascades_to_its_lines_only() {
    let graph = RecipeGraph::in_memory().await.unwrap();

    let baking = graph.add_category("Baking").await.unwrap();
    let flour = graph.add_ingredient("Flour").await.unwrap();
    let pie = graph
        .add_recipe(
            NewRecipe::new("Pie")
                .in_category(baking.id)
                .with_ingredient(flour.id, "300g"),
        )
        .await
        .unwrap();
    let bread = graph
        .add_recipe(
            NewRecipe::new("Bread")
                .in_category(baking.id)
                .with_ingredient(flour.id, "500g"),
        )
        .await
        .unwrap();
    assert_eq!(graph.recipes_in_category(baking.id).unwrap().len(), 2);

    graph.remove_recipe(pie.id).await.unwrap();

    let state = graph.snapshot();
    assert!(graph.ingredient(flour.id).is_ok());
    assert_eq!(state.index().line_count(pie.id), 0);
    assert_eq!(state.recipe_ingredients().len(), 1);
    assert_eq!(graph.recipe_lines(bread.id).unwrap().len(), 1);
    assert_eq!(graph.recipes_in_category(baking.id).unwrap().len(), 1);
    assert!(graph.category(baking.id).is_ok());
    assert!(state.is_consistent());
}

#[tokio::test]
async fn duplicate_ingredient_is_rejected() {
    let graph = RecipeGraph::in_memory().await.unwrap();

    graph.add_ingredient("Salt").await.unwrap();
    let err = graph.add_ingredient("Salt").await.unwrap_err();

    assert_eq!(
        err,
        DomainError::Validation(ValidationError::DuplicateName {
            kind: EntityKind::Ingredient,
            value: "Salt".into()
        })
    );
    assert!(err.is_rejection());
    assert_eq!(graph.ingredients(&NameFilter::containing("salt")).len(), 1);
}

#[tokio::test]
async fn uniqueness_ignores_case_and_diacritics() {
    let graph = RecipeGraph::in_memory().await.unwrap();

    graph.add_recipe(NewRecipe::new("Crème Brûlée")).await.unwrap();
    assert!(graph.add_recipe(NewRecipe::new("creme brulee")).await.is_err());

    let other = graph.add_recipe(NewRecipe::new("Flan")).await.unwrap();
    let err = graph
        .update_recipe(other.id, RecipeUpdate::new().name("CRÈME BRÛLÉE"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationError::DuplicateName { .. })
    ));
    assert_eq!(graph.recipe(other.id).unwrap().name, "Flan");
}

#[tokio::test]
async fn decomposed_names_are_the_same_name() {
    let graph = RecipeGraph::in_memory().await.unwrap();

    graph.add_ingredient("Crème fraîche").await.unwrap();
    let err = graph
        .add_ingredient("Cre\u{300}me frai\u{302}che")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationError::DuplicateName { .. })
    ));

    graph.add_category("Cre\u{300}pes").await.unwrap();
    assert_eq!(graph.ingredients(&NameFilter::containing("creme")).len(), 1);
    assert_eq!(graph.categories(&NameFilter::containing("crepes")).len(), 1);
}

#[tokio::test]
async fn attach_then_detach_restores_the_recipe() {
    let graph = RecipeGraph::in_memory().await.unwrap();

    let basil = graph.add_ingredient("Basil").await.unwrap();
    let pesto = graph
        .add_recipe(NewRecipe::new("Pesto").with_serving(4).with_time(10))
        .await
        .unwrap();
    let before = graph.recipe(pesto.id).unwrap();

    let line = graph.attach_ingredient(pesto.id, basil.id, "1 bunch").await.unwrap();
    assert_eq!(graph.recipe_lines(pesto.id).unwrap().len(), 1);

    graph.detach_ingredient(line.id).await.unwrap();

    assert_eq!(graph.recipe_lines(pesto.id).unwrap().len(), 0);
    assert_eq!(*graph.recipe(pesto.id).unwrap(), *before);
    assert!(graph.ingredient(basil.id).is_ok());
}

#[tokio::test]
async fn attach_requires_an_existing_ingredient() {
    let graph = RecipeGraph::in_memory().await.unwrap();

    let soup = graph.add_recipe(NewRecipe::new("Soup")).await.unwrap();
    let ghost = larder_core::IngredientId::new();

    let err = graph.attach_ingredient(soup.id, ghost, "1").await.unwrap_err();
    assert_eq!(
        err,
        DomainError::Reference(ReferenceError::DanglingIngredient(ghost.to_string()))
    );

    let err = graph
        .add_recipe(NewRecipe::new("Stew").with_ingredient(ghost, "2"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Reference(_)));
    assert!(graph.recipes(&NameFilter::containing("stew")).is_empty());
}

#[tokio::test]
async fn removing_an_ingredient_removes_its_lines() {
    let graph = RecipeGraph::in_memory().await.unwrap();

    let egg = graph.add_ingredient("Egg").await.unwrap();
    let milk = graph.add_ingredient("Milk").await.unwrap();
    let crepes = graph
        .add_recipe(
            NewRecipe::new("Crêpes")
                .with_ingredient(egg.id, "2")
                .with_ingredient(milk.id, "250ml"),
        )
        .await
        .unwrap();
    assert_eq!(graph.ingredient_usage(egg.id).unwrap().recipe_count(), 1);

    graph.remove_ingredient(egg.id).await.unwrap();

    let details = graph.recipe_details(crepes.id).unwrap();
    assert_eq!(details.ingredient_count(), 1);
    assert_eq!(details.lines[0].ingredient.name, "Milk");
    assert!(graph.snapshot().is_consistent());
}

#[tokio::test]
async fn reassigning_a_category_moves_the_recipe() {
    let graph = RecipeGraph::in_memory().await.unwrap();

    let lunch = graph.add_category("Lunch").await.unwrap();
    let dinner = graph.add_category("Dinner").await.unwrap();
    let quiche = graph
        .add_recipe(NewRecipe::new("Quiche").in_category(lunch.id))
        .await
        .unwrap();

    let mut rx = graph.subscribe();
    let moved = graph
        .set_recipe_category(quiche.id, Some(dinner.id))
        .await
        .unwrap();
    assert_eq!(moved.category, Some(dinner.id));
    assert!(graph.recipes_in_category(lunch.id).unwrap().is_empty());
    assert_eq!(graph.recipes_in_category(dinner.id).unwrap().names(), vec!["Quiche"]);

    let changes = rx.recv().await.unwrap();
    assert!(changes.updated.contains(&EntityRef::Recipe(quiche.id)));
    assert!(changes.updated.contains(&EntityRef::Category(lunch.id)));
    assert!(changes.updated.contains(&EntityRef::Category(dinner.id)));

    let err = graph
        .set_recipe_category(quiche.id, Some(larder_core::CategoryId::new()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound {
            kind: EntityKind::Category,
            ..
        }
    ));
    assert_eq!(graph.recipe(quiche.id).unwrap().category, Some(dinner.id));
}

#[tokio::test]
async fn notifications_cover_propagated_changes() {
    let graph = RecipeGraph::in_memory().await.unwrap();

    let flour = graph.add_ingredient("Flour").await.unwrap();
    let pie = graph
        .add_recipe(NewRecipe::new("Pie").with_ingredient(flour.id, "300g"))
        .await
        .unwrap();
    let line = graph.recipe_lines(pie.id).unwrap()[0].id;

    let mut rx = graph.subscribe();
    graph.remove_recipe(pie.id).await.unwrap();

    let changes = rx.recv().await.unwrap();
    assert!(changes.removed.contains(&EntityRef::Recipe(pie.id)));
    assert!(changes.removed.contains(&EntityRef::RecipeIngredient(line)));
    assert!(changes.updated.contains(&EntityRef::Ingredient(flour.id)));
    assert!(changes.created.is_empty());
    assert!(changes.kinds().contains(&EntityKind::RecipeIngredient));
}

#[tokio::test]
async fn failed_commit_leaves_everything_untouched() {
    let storage = Arc::new(MemoryStorage::new());
    let graph = RecipeGraph::open(storage.clone()).await.unwrap();

    let dessert = graph.add_category("Dessert").await.unwrap();
    let cake = graph
        .add_recipe(NewRecipe::new("Cake").in_category(dessert.id))
        .await
        .unwrap();
    let before = graph.snapshot();
    let mut rx = graph.subscribe();

    storage.fail_commits(true);
    let err = graph.remove_category(dessert.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Storage(_)));
    assert!(!err.is_rejection());

    assert!(graph.category(dessert.id).is_ok());
    assert_eq!(graph.recipe(cake.id).unwrap().category, Some(dessert.id));
    assert_eq!(graph.snapshot().to_records(), before.to_records());
    assert!(rx.try_recv().is_err());

    let persisted = storage.load_records().await.unwrap();
    assert_eq!(persisted, before.to_records());

    storage.fail_commits(false);
    graph.remove_category(dessert.id).await.unwrap();
    assert!(graph.recipe(cake.id).unwrap().category.is_none());
}

#[tokio::test]
async fn rejected_updates_change_nothing() {
    let graph = RecipeGraph::in_memory().await.unwrap();
    let pie = graph.add_recipe(NewRecipe::new("Pie").with_serving(4)).await.unwrap();

    let err = graph
        .update_recipe(pie.id, RecipeUpdate::new().serving(0).summary("changed"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationError::BelowMinimum { field: "serving", .. })
    ));

    let stored = graph.recipe(pie.id).unwrap();
    assert_eq!(stored.serving, 4);
    assert_eq!(stored.summary, "");

    let err = graph.add_recipe(NewRecipe::new("Quick").with_time(0)).await.unwrap_err();
    assert!(err.is_rejection());
}

#[tokio::test]
async fn graph_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("larder.redb");

    let (pie_id, flour_id) = {
        let graph = RecipeGraph::open(Arc::new(RedbStorage::open(&path).unwrap()))
            .await
            .unwrap();
        let desserts = graph.add_category("Desserts").await.unwrap();
        let flour = graph.add_ingredient("Flour").await.unwrap();
        let pie = graph
            .add_recipe(
                NewRecipe::new("Pie")
                    .in_category(desserts.id)
                    .with_ingredient(flour.id, "300g"),
            )
            .await
            .unwrap();
        graph.close().await.unwrap();
        (pie.id, flour.id)
    };

    let graph = RecipeGraph::open(Arc::new(RedbStorage::open(&path).unwrap()))
        .await
        .unwrap();
    let details = graph.recipe_details(pie_id).unwrap();
    assert_eq!(details.recipe.name, "Pie");
    assert_eq!(details.category.as_ref().unwrap().name, "Desserts");
    assert_eq!(details.lines[0].ingredient.id, flour_id);
    assert_eq!(details.lines[0].line.quantity, "300g");
}

#[tokio::test]
async fn inconsistent_storage_is_refused() {
    use larder_core::{Recipe, Write, WriteBatch};

    let storage = Arc::new(MemoryStorage::new());
    let mut orphan = Recipe::new("Orphan");
    orphan.category = Some(larder_core::CategoryId::new());
    storage
        .commit(&WriteBatch::new().with(Write::PutRecipe(orphan)))
        .await
        .unwrap();

    let result = RecipeGraph::open(storage).await;
    assert!(matches!(result, Err(DomainError::Internal(_))));
}

#[tokio::test]
async fn listings_filter_and_sort_naturally() {
    let graph = RecipeGraph::in_memory().await.unwrap();
    for name in ["zucchini", "Apple", "éclair cream", "Eggplant", "apricot"] {
        graph.add_ingredient(name).await.unwrap();
    }

    let all = graph.ingredients(&NameFilter::all());
    assert_eq!(
        all.names(),
        vec!["Apple", "apricot", "éclair cream", "Eggplant", "zucchini"]
    );

    let filtered = graph.ingredients(&NameFilter::containing("ECLA"));
    assert_eq!(filtered.names(), vec!["éclair cream"]);

    let empty_filter = graph.ingredients(&NameFilter::containing(""));
    assert_eq!(empty_filter.len(), 5);
}

#[tokio::test]
async fn quantity_can_be_changed() {
    let graph = RecipeGraph::in_memory().await.unwrap();
    let sugar = graph.add_ingredient("Sugar").await.unwrap();
    let jam = graph
        .add_recipe(NewRecipe::new("Jam").with_ingredient(sugar.id, "1kg"))
        .await
        .unwrap();
    let line = graph.recipe_lines(jam.id).unwrap()[0].id;

    let updated = graph.set_quantity(line, " 800g ").await.unwrap();
    assert_eq!(updated.quantity, "800g");
    assert_eq!(graph.recipe_details(jam.id).unwrap().lines[0].line.quantity, "800g");
}
