use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::menu::{Complexity, DishRecommendation, ShoppingItem};
use crate::recipes::classify::{cooking_method, cuisine_type};
use crate::recipes::query::SimplifiedRecipe;
use crate::recipes::Recipe;
use crate::tools::ToolDescriptor;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn difficulty_cell(difficulty: u8, label: &str) -> Cell {
    let cell = Cell::new(format!("{difficulty} ({label})"));
    match difficulty {
        4.. => cell.fg(Color::Red),
        3 => cell.fg(Color::Yellow),
        _ => cell.fg(Color::Green),
    }
}

fn minutes(value: Option<u32>) -> String {
    value
        .filter(|m| *m > 0)
        .map(|m| format!("{m} min"))
        .unwrap_or_else(|| "-".to_string())
}

/// Classification helpers work on full recipes; rebuild the fields they read.
fn as_recipe(dish: &SimplifiedRecipe) -> Recipe {
    Recipe {
        id: dish.id.clone(),
        name: dish.name.clone(),
        description: dish.description.clone(),
        category: dish.category.clone(),
        difficulty: dish.difficulty,
        tags: dish.tags.clone(),
        ingredients: dish.ingredients.clone(),
        ..Recipe::default()
    }
}

pub fn render_dishes_table(menu: &DishRecommendation) -> String {
    let mut table = new_table();
    table.set_header(vec!["#", "Dish", "Category", "Difficulty", "Cuisine", "Method", "Cook"]);

    for (position, dish) in menu.dishes.iter().enumerate() {
        let recipe = as_recipe(dish);
        table.add_row(Row::from(vec![
            Cell::new(position + 1),
            Cell::new(&dish.name),
            Cell::new(&dish.category),
            difficulty_cell(dish.difficulty, dish.difficulty_text),
            Cell::new(cuisine_type(&recipe)),
            Cell::new(cooking_method(&recipe)),
            Cell::new(minutes(dish.cook_time_minutes)),
        ]));
    }
    table.to_string()
}

pub fn render_shopping_table(items: &[ShoppingItem]) -> String {
    let mut table = new_table();
    table.set_header(vec!["Ingredient", "Quantity", "Unit", "Dishes"]);
    for item in items {
        table.add_row(vec![
            item.name.clone(),
            item.quantity.clone(),
            item.unit.clone().unwrap_or_else(|| "-".to_string()),
            item.count.to_string(),
        ]);
    }
    table.to_string()
}

pub fn render_summary_table(menu: &DishRecommendation) -> String {
    let stats = &menu.cooking_time_stats;
    let analysis = &menu.difficulty_analysis;
    let complexity = match stats.complexity {
        Complexity::Simple => Cell::new(stats.complexity.as_str()).fg(Color::Green),
        Complexity::Medium => Cell::new(stats.complexity.as_str()).fg(Color::Yellow),
        Complexity::Complex => Cell::new(stats.complexity.as_str()).fg(Color::Red),
    };

    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![
        Cell::new("People"),
        Cell::new(menu.people_count),
    ]);
    table.add_row(vec![
        Cell::new("Meat / vegetable / extra"),
        Cell::new(format!(
            "{} / {} / {}",
            menu.meat_dish_count, menu.vegetable_dish_count, menu.extra_dish_count
        )),
    ]);
    table.add_row(vec![
        Cell::new("Prep + cook"),
        Cell::new(format!("{} + {} min", stats.total_prep_time, stats.total_cook_time)),
    ]);
    table.add_row(vec![
        Cell::new("Estimated total"),
        Cell::new(format!("{} min", stats.estimated_total_time)),
    ]);
    table.add_row(vec![Cell::new("Complexity"), complexity]);
    table.add_row(vec![
        Cell::new("Average difficulty"),
        Cell::new(format!(
            "{:.1} ({} simple, {} medium, {} hard)",
            analysis.average_difficulty,
            analysis.simple_count,
            analysis.medium_count,
            analysis.hard_count
        )),
    ]);
    table.add_row(vec![
        Cell::new("Cuisines"),
        Cell::new(menu.cuisine_variety.join("、")),
    ]);
    table.add_row(vec![
        Cell::new("Methods"),
        Cell::new(menu.cooking_methods.join("、")),
    ]);
    table.to_string()
}

pub fn render_tools_table(tools: &[ToolDescriptor]) -> String {
    let mut table = new_table();
    table.set_header(vec!["Tool", "Description", "Default args"]);
    for tool in tools {
        table.add_row(vec![
            tool.name.to_string(),
            tool.description.to_string(),
            tool.default_args.to_string(),
        ]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use crate::menu::engine::recommend;
    use crate::menu::WhatToEatParams;
    use crate::output::table::{render_dishes_table, render_shopping_table, render_summary_table};
    use crate::recipes::fixtures::kitchen;

    #[test]
    fn menu_tables_mention_every_dish_and_ingredient() {
        let outcome = recommend(&WhatToEatParams::new(5, 2024.0), &kitchen());
        let menu = outcome.menu().expect("menu");

        let dishes = render_dishes_table(menu);
        for dish in &menu.dishes {
            assert!(dishes.contains(&dish.name), "missing {}", dish.name);
        }

        let shopping = render_shopping_table(&menu.shopping_list);
        for item in &menu.shopping_list {
            assert!(shopping.contains(&item.name), "missing {}", item.name);
        }

        let summary = render_summary_table(menu);
        assert!(summary.contains("Estimated total"));
        assert!(summary.contains(&format!("{} min", menu.cooking_time_stats.estimated_total_time)));
    }
}
