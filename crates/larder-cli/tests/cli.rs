//! Smoke tests for the `larder` binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn larder(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("larder").unwrap();
    cmd.env("LARDER_CONFIG", dir.path().join("config.toml"))
        .env_remove("LARDER_DATA_DIR")
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(dir.path().join("data"));
    cmd
}

#[test]
fn duplicate_ingredient_is_refused() {
    let dir = TempDir::new().unwrap();

    larder(&dir)
        .args(["ingredient", "add", "Salt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added ingredient: Salt"));

    larder(&dir)
        .args(["ingredient", "add", "SALT"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    larder(&dir)
        .args(["ingredient", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Salt"))
        .stdout(predicate::str::contains("SALT").not());
}

#[test]
fn removing_a_category_keeps_its_recipes() {
    let dir = TempDir::new().unwrap();

    larder(&dir).args(["category", "add", "Dessert"]).assert().success();
    larder(&dir)
        .args(["ingredient", "add", "Mascarpone"])
        .assert()
        .success();
    larder(&dir)
        .args([
            "recipe",
            "add",
            "Tiramisu",
            "--category",
            "dessert",
            "--ingredient",
            "Mascarpone=250g",
        ])
        .assert()
        .success();

    larder(&dir)
        .args(["category", "remove", "Dessert"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 recipe(s) no longer have a category"));

    larder(&dir)
        .args(["recipe", "show", "tiramisu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("250g Mascarpone"))
        .stdout(predicate::str::contains("Category:").not());
}

#[test]
fn recipe_lines_can_be_edited() {
    let dir = TempDir::new().unwrap();

    larder(&dir).args(["ingredient", "add", "Flour"]).assert().success();
    larder(&dir).args(["recipe", "add", "Pie"]).assert().success();
    larder(&dir)
        .args(["recipe", "attach", "Pie", "Flour", "300g"])
        .assert()
        .success();
    larder(&dir)
        .args(["recipe", "quantity", "Pie", "Flour", "350g"])
        .assert()
        .success();

    larder(&dir)
        .args(["--format", "json", "recipe", "show", "Pie"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"quantity\": \"350g\""));

    larder(&dir)
        .args(["recipe", "detach", "Pie", "Flour"])
        .assert()
        .success();
    larder(&dir)
        .args(["recipe", "remove", "Pie"])
        .assert()
        .success();

    larder(&dir)
        .args(["ingredient", "show", "Flour"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not used by any recipe"));
}

#[test]
fn used_ingredient_needs_force() {
    let dir = TempDir::new().unwrap();

    larder(&dir).args(["ingredient", "add", "Egg"]).assert().success();
    larder(&dir)
        .args(["recipe", "add", "Omelette", "-g", "Egg=3"])
        .assert()
        .success();

    larder(&dir)
        .args(["ingredient", "remove", "Egg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    larder(&dir)
        .args(["ingredient", "remove", "Egg", "--force"])
        .assert()
        .success();

    larder(&dir)
        .args(["recipe", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Omelette"));
}

#[test]
fn search_finds_names_across_kinds() {
    let dir = TempDir::new().unwrap();

    larder(&dir).args(["category", "add", "Crêpes & co"]).assert().success();
    larder(&dir).args(["recipe", "add", "Crêpes Suzette"]).assert().success();
    larder(&dir).args(["ingredient", "add", "Butter"]).assert().success();

    larder(&dir)
        .args(["search", "crepes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Crêpes & co"))
        .stdout(predicate::str::contains("Crêpes Suzette"))
        .stdout(predicate::str::contains("Butter").not());

    larder(&dir)
        .args(["search", "crepes", "--kind", "recipe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Crêpes & co").not());
}

#[test]
fn config_round_trip() {
    let dir = TempDir::new().unwrap();

    larder(&dir)
        .args(["config", "set", "output", "json"])
        .assert()
        .success();

    larder(&dir)
        .args(["config", "get", "output"])
        .assert()
        .success()
        .stdout(predicate::str::diff("json\n"));

    larder(&dir)
        .args(["config", "set", "backend", "mongodb"])
        .assert()
        .failure();

    larder(&dir)
        .args(["config", "get", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn completions_are_generated() {
    let dir = TempDir::new().unwrap();

    larder(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("larder"));
}
