use std::collections::{HashMap, HashSet};

use crate::menu::{Complexity, CookingTimeStats, DifficultyAnalysis, ShoppingItem};
use crate::recipes::{Ingredient, Recipe};

const PREP_MINUTES_PER_DIFFICULTY: u32 = 10;
const COOK_MINUTES_PER_DIFFICULTY: u32 = 15;
/// Share of cooking time that cannot overlap with prep.
const COOK_OVERLAP_FACTOR: f64 = 0.7;
const COMPLEX_THRESHOLD_MINUTES: f64 = 90.0;
const MEDIUM_THRESHOLD_MINUTES: f64 = 45.0;
const AS_NEEDED: &str = "适量";

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

fn non_empty(value: Option<&String>) -> Option<&String> {
    value.filter(|v| !v.is_empty())
}

fn quantity_text(ingredient: &Ingredient) -> Option<String> {
    if !ingredient.text_quantity.is_empty() {
        return Some(ingredient.text_quantity.clone());
    }
    present(ingredient.quantity).map(|quantity| {
        format!(
            "{quantity}{}",
            ingredient.unit.as_deref().unwrap_or_default()
        )
    })
}

/// Merges ingredients across dishes by exact name, in first-seen order.
pub fn shopping_list(dishes: &[&Recipe]) -> Vec<ShoppingItem> {
    let mut items: Vec<ShoppingItem> = Vec::new();
    let mut index_by_name: HashMap<&str, usize> = HashMap::new();

    for dish in dishes {
        let mut seen_in_dish = HashSet::new();
        for ingredient in &dish.ingredients {
            if !seen_in_dish.insert(ingredient.name.as_str()) {
                continue;
            }
            match index_by_name.get(ingredient.name.as_str()) {
                Some(&index) => {
                    let item = &mut items[index];
                    item.count += 1;
                    let measured = present(ingredient.quantity).is_some()
                        && non_empty(ingredient.unit.as_ref()).is_some();
                    if measured {
                        if let Some(text) = quantity_text(ingredient) {
                            item.quantity.push_str(" + ");
                            item.quantity.push_str(&text);
                        }
                    }
                }
                None => {
                    index_by_name.insert(ingredient.name.as_str(), items.len());
                    items.push(ShoppingItem {
                        name: ingredient.name.clone(),
                        quantity: quantity_text(ingredient)
                            .unwrap_or_else(|| AS_NEEDED.to_string()),
                        unit: non_empty(ingredient.unit.as_ref()).cloned(),
                        count: 1,
                    });
                }
            }
        }
    }

    items
}

pub fn cooking_time_stats(dishes: &[&Recipe]) -> CookingTimeStats {
    let prep_times = dishes
        .iter()
        .filter_map(|dish| dish.prep_time_minutes.filter(|m| *m > 0))
        .collect::<Vec<_>>();
    let cook_times = dishes
        .iter()
        .filter_map(|dish| dish.cook_time_minutes.filter(|m| *m > 0))
        .collect::<Vec<_>>();

    let total_prep_time = if prep_times.is_empty() {
        difficulty_estimate(dishes, PREP_MINUTES_PER_DIFFICULTY)
    } else {
        prep_times.iter().sum()
    };
    let total_cook_time = if cook_times.is_empty() {
        difficulty_estimate(dishes, COOK_MINUTES_PER_DIFFICULTY)
    } else {
        cook_times.iter().sum()
    };

    let estimated = (f64::from(total_prep_time) + f64::from(total_cook_time) * COOK_OVERLAP_FACTOR)
        .max(f64::from(total_cook_time));
    let complexity = if estimated > COMPLEX_THRESHOLD_MINUTES {
        Complexity::Complex
    } else if estimated > MEDIUM_THRESHOLD_MINUTES {
        Complexity::Medium
    } else {
        Complexity::Simple
    };

    CookingTimeStats {
        total_prep_time,
        total_cook_time,
        estimated_total_time: estimated.round() as u32,
        complexity,
    }
}

fn difficulty_estimate(dishes: &[&Recipe], minutes_per_level: u32) -> u32 {
    dishes
        .iter()
        .map(|dish| u32::from(dish.difficulty) * minutes_per_level)
        .sum()
}

pub fn analyze_difficulty(dishes: &[&Recipe]) -> DifficultyAnalysis {
    let simple_count = dishes.iter().filter(|d| d.difficulty <= 2).count();
    let medium_count = dishes.iter().filter(|d| d.difficulty == 3).count();
    let hard_count = dishes.iter().filter(|d| d.difficulty >= 4).count();
    let average = if dishes.is_empty() {
        0.0
    } else {
        dishes.iter().map(|d| f64::from(d.difficulty)).sum::<f64>() / dishes.len() as f64
    };

    DifficultyAnalysis {
        average_difficulty: (average * 10.0).round() / 10.0,
        has_complex_dishes: hard_count > 0,
        simple_count,
        medium_count,
        hard_count,
    }
}
