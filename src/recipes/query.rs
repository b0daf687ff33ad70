use serde::Serialize;

use crate::recipes::{Ingredient, Recipe};

pub fn difficulty_text(difficulty: u8) -> &'static str {
    match difficulty {
        1 => "非常简单",
        2 => "简单",
        3 => "中等",
        4 => "较难",
        5 => "困难",
        _ => "未知",
    }
}

pub fn recipe_matches_query(recipe: &Recipe, query: &str) -> bool {
    recipe.name.contains(query)
        || recipe.description.contains(query)
        || recipe.tags.iter().any(|tag| tag.contains(query))
        || recipe.has_ingredient_containing(query)
}

/// Which of the requested ingredients a recipe uses, in request order.
pub fn matched_ingredients(recipe: &Recipe, wanted: &[String]) -> Vec<String> {
    wanted
        .iter()
        .filter(|ingredient| recipe.has_ingredient_containing(ingredient))
        .cloned()
        .collect()
}

/// Full recipe plus its difficulty label.
#[derive(Debug, Clone, Serialize)]
pub struct LabeledRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    #[serde(rename = "difficultyText")]
    pub difficulty_text: &'static str,
}

impl From<&Recipe> for LabeledRecipe {
    fn from(recipe: &Recipe) -> Self {
        Self {
            recipe: recipe.clone(),
            difficulty_text: difficulty_text(recipe.difficulty),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IngredientMatch {
    #[serde(flatten)]
    pub recipe: LabeledRecipe,
    #[serde(rename = "matchedIngredients")]
    pub matched_ingredients: Vec<String>,
    #[serde(rename = "matchCount")]
    pub match_count: usize,
}

/// The trimmed recipe view embedded in menu recommendations.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SimplifiedRecipe {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub difficulty: u8,
    #[serde(rename = "difficultyText")]
    pub difficulty_text: &'static str,
    pub tags: Vec<String>,
    pub servings: u32,
    pub ingredients: Vec<Ingredient>,
    pub prep_time_minutes: Option<u32>,
    pub cook_time_minutes: Option<u32>,
    pub total_time_minutes: Option<u32>,
}

impl From<&Recipe> for SimplifiedRecipe {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id.clone(),
            name: recipe.name.clone(),
            description: recipe.description.clone(),
            category: recipe.category.clone(),
            difficulty: recipe.difficulty,
            difficulty_text: difficulty_text(recipe.difficulty),
            tags: recipe.tags.clone(),
            servings: recipe.servings,
            ingredients: recipe.ingredients.clone(),
            prep_time_minutes: recipe.prep_time_minutes,
            cook_time_minutes: recipe.cook_time_minutes,
            total_time_minutes: recipe.total_time_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::recipes::fixtures::recipe;
    use crate::recipes::query::{
        difficulty_text, matched_ingredients, recipe_matches_query, LabeledRecipe,
    };

    #[test]
    fn difficulty_labels_fall_back_to_unknown() {
        assert_eq!(difficulty_text(1), "非常简单");
        assert_eq!(difficulty_text(5), "困难");
        assert_eq!(difficulty_text(0), "未知");
        assert_eq!(difficulty_text(9), "未知");
    }

    #[test]
    fn query_matches_any_text_field() {
        let mut dish = recipe("a", "西红柿炒鸡蛋", "素菜", 1, &["西红柿", "鸡蛋"]);
        dish.tags = vec!["快手菜".to_string()];
        assert!(recipe_matches_query(&dish, "西红柿"));
        assert!(recipe_matches_query(&dish, "快手"));
        assert!(recipe_matches_query(&dish, "鸡"));
        assert!(!recipe_matches_query(&dish, "牛肉"));
    }

    #[test]
    fn ingredient_matches_keep_request_order() {
        let dish = recipe("a", "西红柿炒鸡蛋", "素菜", 1, &["西红柿", "鸡蛋"]);
        let wanted = vec!["鸡蛋".to_string(), "土豆".to_string(), "西红柿".to_string()];
        assert_eq!(matched_ingredients(&dish, &wanted), vec!["鸡蛋", "西红柿"]);
    }

    #[test]
    fn labeled_recipe_flattens_fields() {
        let dish = recipe("a", "地三鲜", "素菜", 3, &["茄子"]);
        let value = serde_json::to_value(LabeledRecipe::from(&dish)).expect("serializable");
        assert_eq!(value["name"], "地三鲜");
        assert_eq!(value["difficultyText"], "中等");
    }
}
