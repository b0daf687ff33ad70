pub mod analysis;
pub mod diversity;
pub mod engine;

use serde::Serialize;
use thiserror::Error;

use crate::recipes::query::SimplifiedRecipe;

pub const MIN_PEOPLE: i64 = 1;
pub const MAX_PEOPLE: i64 = 10;

/// Validated `whatToEat` parameters. Loosely typed request arguments are
/// turned into this at the tool boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct WhatToEatParams {
    pub people_count: i64,
    pub prefer_fish: bool,
    pub vegetarian: bool,
    pub avoid_ingredients: Vec<String>,
    pub dish_count: Option<u32>,
    pub seed: f64,
}

impl WhatToEatParams {
    pub fn new(people_count: i64, seed: f64) -> Self {
        Self {
            people_count,
            prefer_fish: false,
            vegetarian: false,
            avoid_ingredients: Vec::new(),
            dish_count: None,
            seed,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ShoppingItem {
    pub name: String,
    pub quantity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Medium => "medium",
            Self::Complex => "complex",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CookingTimeStats {
    pub total_prep_time: u32,
    pub total_cook_time: u32,
    pub estimated_total_time: u32,
    pub complexity: Complexity,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyAnalysis {
    pub average_difficulty: f64,
    pub has_complex_dishes: bool,
    pub simple_count: usize,
    pub medium_count: usize,
    pub hard_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DishRecommendation {
    pub people_count: u32,
    pub meat_dish_count: usize,
    pub vegetable_dish_count: usize,
    pub extra_dish_count: usize,
    pub dishes: Vec<SimplifiedRecipe>,
    pub shopping_list: Vec<ShoppingItem>,
    pub cooking_time_stats: CookingTimeStats,
    pub difficulty_analysis: DifficultyAnalysis,
    pub cuisine_variety: Vec<String>,
    pub cooking_methods: Vec<String>,
    pub message: String,
}

/// Expected business failures. These are reported as `{ "error": ... }`
/// results, never raised to the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MenuError {
    #[error("用餐人数必须在1-10之间")]
    InvalidPeopleCount(i64),
    #[error("排除指定食材后没有可用菜谱")]
    AllRecipesExcluded,
    #[error("没有符合条件的素食菜谱")]
    NoVegetarianRecipes,
    #[error("无法生成纯素菜单，请减少规避食材")]
    EmptyVegetarianMenu,
    #[error("无法生成菜单，请调整筛选条件")]
    EmptyMenu,
}

pub const NO_DATA_MESSAGE: &str = "暂无可用菜谱数据";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RecommendationOutcome {
    Menu(Box<DishRecommendation>),
    NoData { message: String },
    Error { error: String },
}

impl RecommendationOutcome {
    pub fn no_data() -> Self {
        Self::NoData {
            message: NO_DATA_MESSAGE.to_string(),
        }
    }

    pub fn menu(&self) -> Option<&DishRecommendation> {
        match self {
            Self::Menu(menu) => Some(menu),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error { error } => Some(error),
            _ => None,
        }
    }
}

impl From<MenuError> for RecommendationOutcome {
    fn from(error: MenuError) -> Self {
        Self::Error {
            error: error.to_string(),
        }
    }
}
