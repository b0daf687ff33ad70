use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::menu::engine::recommend;
use crate::menu::WhatToEatParams;
use crate::recipes::query::{
    difficulty_text, matched_ingredients, recipe_matches_query, IngredientMatch, LabeledRecipe,
};
use crate::recipes::store::{self, RecipeSource};
use crate::tools::args::{parse_number_param, parse_string_array_param, parse_string_param};
use crate::tools::Tool;

#[derive(Debug, Serialize)]
struct CategoryStats {
    name: String,
    count: usize,
}

#[derive(Debug, Serialize)]
struct DifficultyStats {
    level: u8,
    #[serde(rename = "levelText")]
    level_text: &'static str,
    count: usize,
}

pub struct SearchRecipesTool {
    source: Arc<dyn RecipeSource>,
}

impl SearchRecipesTool {
    pub fn new(source: Arc<dyn RecipeSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for SearchRecipesTool {
    fn name(&self) -> &'static str {
        "searchRecipes"
    }

    fn description(&self) -> &'static str {
        "根据菜名搜索菜谱，返回完整菜谱信息"
    }

    fn default_args(&self) -> Value {
        json!({ "query": "西红柿" })
    }

    async fn execute(&self, args: Option<&Value>) -> Result<Value> {
        let query = parse_string_param(args, "query", "");
        if query.trim().is_empty() {
            return Ok(json!({ "recipes": [], "message": "请输入搜索关键词" }));
        }

        let recipes = self.source.all_recipes().await;
        let results = recipes
            .iter()
            .filter(|recipe| recipe_matches_query(recipe, &query))
            .map(LabeledRecipe::from)
            .collect::<Vec<_>>();

        Ok(json!({
            "message": format!("找到 {} 个包含\"{query}\"的菜谱", results.len()),
            "total": results.len(),
            "recipes": results,
            "query": query,
        }))
    }
}

pub struct RandomRecipeTool {
    source: Arc<dyn RecipeSource>,
}

impl RandomRecipeTool {
    pub fn new(source: Arc<dyn RecipeSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for RandomRecipeTool {
    fn name(&self) -> &'static str {
        "randomRecipe"
    }

    fn description(&self) -> &'static str {
        "随机推荐一个菜谱，解决'今天吃什么'的难题，返回完整菜谱信息"
    }

    fn default_args(&self) -> Value {
        json!({})
    }

    async fn execute(&self, args: Option<&Value>) -> Result<Value> {
        let difficulty = parse_number_param(args, "difficulty").filter(|level| *level != 0.0);
        let recipes = self.source.all_recipes().await;
        let candidates = recipes
            .iter()
            .filter(|recipe| difficulty.map_or(true, |level| f64::from(recipe.difficulty) == level))
            .collect::<Vec<_>>();

        if candidates.is_empty() {
            return Ok(json!({ "message": "没有找到符合条件的菜谱" }));
        }

        let recipe = candidates[rand::thread_rng().gen_range(0..candidates.len())];
        Ok(json!({
            "recipe": LabeledRecipe::from(recipe),
            "message": format!(
                "为您推荐: {} (难度: {})",
                recipe.name,
                difficulty_text(recipe.difficulty)
            ),
        }))
    }
}

pub struct WhatToEatTool {
    source: Arc<dyn RecipeSource>,
}

impl WhatToEatTool {
    pub fn new(source: Arc<dyn RecipeSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for WhatToEatTool {
    fn name(&self) -> &'static str {
        "whatToEat"
    }

    fn description(&self) -> &'static str {
        "智能菜单推荐助手，根据人数和偏好推荐适合的菜品组合。支持多样化配置：鱼类偏好、素食模式、食材规避、固定菜数等。自动分析烹饪时间、难度分布、风味搭配，并生成购物清单。"
    }

    fn default_args(&self) -> Value {
        json!({
            "peopleCount": 4,
            "preferFish": false,
            "vegetarian": false,
            "avoidIngredients": [],
            "dishCount": null,
        })
    }

    async fn execute(&self, args: Option<&Value>) -> Result<Value> {
        let params = WhatToEatParams::from_args(args);
        debug!("whatToEat with {params:?}");
        let recipes = self.source.all_recipes().await;
        let outcome = recommend(&params, &recipes);
        Ok(serde_json::to_value(outcome)?)
    }
}

pub struct FindRecipesByIngredientsTool {
    source: Arc<dyn RecipeSource>,
}

impl FindRecipesByIngredientsTool {
    pub fn new(source: Arc<dyn RecipeSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for FindRecipesByIngredientsTool {
    fn name(&self) -> &'static str {
        "findRecipesByIngredients"
    }

    fn description(&self) -> &'static str {
        "根据现有食材查找可以制作的菜谱，返回完整菜谱信息"
    }

    fn default_args(&self) -> Value {
        json!({ "ingredients": ["鸡蛋", "西红柿"] })
    }

    async fn execute(&self, args: Option<&Value>) -> Result<Value> {
        let wanted = parse_string_array_param(args, "ingredients");
        if wanted.is_empty() {
            return Ok(json!({ "recipes": [], "message": "请提供至少一个食材" }));
        }

        let recipes = self.source.all_recipes().await;
        let mut results = recipes
            .iter()
            .filter_map(|recipe| {
                let matched = matched_ingredients(recipe, &wanted);
                (!matched.is_empty()).then(|| IngredientMatch {
                    recipe: LabeledRecipe::from(recipe),
                    match_count: matched.len(),
                    matched_ingredients: matched,
                })
            })
            .collect::<Vec<_>>();
        results.sort_by(|a, b| b.match_count.cmp(&a.match_count));

        Ok(json!({
            "message": format!(
                "根据食材 [{}] 找到 {} 个菜谱",
                wanted.join(", "),
                results.len()
            ),
            "total": results.len(),
            "recipes": results,
            "searchIngredients": wanted,
        }))
    }
}

pub struct GetRecipeDetailTool {
    source: Arc<dyn RecipeSource>,
}

impl GetRecipeDetailTool {
    pub fn new(source: Arc<dyn RecipeSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for GetRecipeDetailTool {
    fn name(&self) -> &'static str {
        "getRecipeDetail"
    }

    fn description(&self) -> &'static str {
        "获取菜谱的详细制作步骤和完整信息"
    }

    fn default_args(&self) -> Value {
        json!({ "recipeId": "dishes-aquatic-咖喱炒蟹" })
    }

    async fn execute(&self, args: Option<&Value>) -> Result<Value> {
        let recipe_id = parse_string_param(args, "recipeId", "");
        if recipe_id.is_empty() {
            return Ok(json!({ "error": "请提供菜谱ID" }));
        }

        let recipes = self.source.all_recipes().await;
        let Some(recipe) = store::find_by_id(&recipes, &recipe_id) else {
            return Ok(json!({ "error": "菜谱不存在" }));
        };
        Ok(json!({
            "recipe": LabeledRecipe::from(recipe),
            "message": format!("获取到菜谱详情: {}", recipe.name),
        }))
    }
}

pub struct GetRecipeCategoriesTool {
    source: Arc<dyn RecipeSource>,
}

impl GetRecipeCategoriesTool {
    pub fn new(source: Arc<dyn RecipeSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for GetRecipeCategoriesTool {
    fn name(&self) -> &'static str {
        "getRecipeCategories"
    }

    fn description(&self) -> &'static str {
        "获取所有菜谱分类和统计信息"
    }

    fn default_args(&self) -> Value {
        json!({})
    }

    async fn execute(&self, _args: Option<&Value>) -> Result<Value> {
        let recipes = self.source.all_recipes().await;
        let categories = store::categories(&recipes)
            .into_iter()
            .map(|name| CategoryStats {
                count: recipes.iter().filter(|r| r.category == name).count(),
                name,
            })
            .collect::<Vec<_>>();
        let difficulties = store::difficulties(&recipes)
            .into_iter()
            .map(|level| DifficultyStats {
                level,
                level_text: difficulty_text(level),
                count: recipes.iter().filter(|r| r.difficulty == level).count(),
            })
            .collect::<Vec<_>>();

        Ok(json!({
            "message": format!("共有 {} 个菜谱，{} 个分类", recipes.len(), categories.len()),
            "total": recipes.len(),
            "categories": categories,
            "difficulties": difficulties,
            "tags": store::tags(&recipes),
        }))
    }
}
