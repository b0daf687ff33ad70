pub mod classify;
pub mod query;
pub mod store;

use serde::{Deserialize, Deserializer, Serialize};

pub const CATEGORY_MEAT: &str = "荤菜";
/// Misspelling of the meat label that appears in older dataset revisions.
pub const CATEGORY_MEAT_ALIAS: &str = "荒菜";
pub const CATEGORY_AQUATIC: &str = "水产";
pub const CATEGORY_SOUP: &str = "汤类";
pub const CATEGORY_STAPLE: &str = "主食";
pub const CATEGORY_BREAKFAST: &str = "早餐";

/// Category labels the classifiers know about. Anything else is still usable,
/// but gets flagged when a dataset is loaded.
pub const KNOWN_CATEGORIES: [&str; 13] = [
    CATEGORY_MEAT,
    CATEGORY_MEAT_ALIAS,
    CATEGORY_AQUATIC,
    CATEGORY_SOUP,
    CATEGORY_STAPLE,
    CATEGORY_BREAKFAST,
    "素菜",
    "汤与粥",
    "甜品",
    "饮品",
    "调料",
    "调味料",
    "半成品加工",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Ingredient {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text_quantity: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    pub step: u32,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_path: String,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub difficulty: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default = "default_servings")]
    pub servings: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients: Vec<Ingredient>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub prep_time_minutes: Option<u32>,
    #[serde(default)]
    pub cook_time_minutes: Option<u32>,
    #[serde(default)]
    pub total_time_minutes: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub additional_notes: Vec<String>,
}

impl Recipe {
    pub fn ingredient_names(&self) -> impl Iterator<Item = &str> {
        self.ingredients.iter().map(|ing| ing.name.as_str())
    }

    pub fn has_ingredient_containing(&self, needle: &str) -> bool {
        self.ingredient_names().any(|name| name.contains(needle))
    }

    pub fn is_category(&self, label: &str) -> bool {
        self.category == label
    }
}

fn default_servings() -> u32 {
    1
}

/// Reads an explicit `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::{Ingredient, Recipe};

    pub fn ingredient(name: &str, quantity: Option<f64>, unit: Option<&str>, text: &str) -> Ingredient {
        Ingredient {
            name: name.to_string(),
            quantity,
            unit: unit.map(str::to_string),
            text_quantity: text.to_string(),
            notes: String::new(),
        }
    }

    pub fn recipe(id: &str, name: &str, category: &str, difficulty: u8, ingredients: &[&str]) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            category: category.to_string(),
            difficulty,
            servings: 2,
            ingredients: ingredients
                .iter()
                .map(|name| ingredient(name, Some(100.0), Some("g"), "100g"))
                .collect(),
            ..Recipe::default()
        }
    }

    /// A small dataset covering every category the engine cares about.
    pub fn kitchen() -> Vec<Recipe> {
        vec![
            recipe("meat-1", "红烧肉", "荤菜", 4, &["五花肉", "冰糖", "生抽"]),
            recipe("meat-2", "麻辣香锅", "荤菜", 3, &["牛肉", "辣椒", "花椒"]),
            recipe("meat-3", "宫保鸡丁", "荤菜", 3, &["鸡胸肉", "花生", "辣椒"]),
            recipe("meat-4", "京酱肉丝", "荤菜", 3, &["猪里脊", "甜面酱", "大葱"]),
            recipe("meat-5", "蒸排骨", "荤菜", 2, &["猪排骨", "豆豉", "大蒜"]),
            recipe("fish-1", "清蒸鲈鱼", "水产", 3, &["鲈鱼", "葱", "姜"]),
            recipe("fish-2", "白灼虾", "水产", 2, &["基围虾", "姜", "生抽"]),
            recipe("veg-1", "清炒时蔬", "素菜", 1, &["油麦菜", "大蒜", "盐"]),
            recipe("veg-2", "凉拌黄瓜", "素菜", 1, &["黄瓜", "大蒜", "醋"]),
            recipe("veg-3", "地三鲜", "素菜", 3, &["茄子", "土豆", "青椒"]),
            recipe("veg-4", "麻婆豆腐", "素菜", 2, &["豆腐", "豆瓣酱", "花椒"]),
            recipe("veg-5", "西红柿炒鸡蛋", "素菜", 1, &["西红柿", "鸡蛋", "盐"]),
            recipe("soup-1", "紫菜汤", "汤类", 1, &["紫菜", "葱", "盐"]),
            recipe("soup-2", "番茄蛋花汤", "汤类", 1, &["西红柿", "鸡蛋", "盐"]),
            recipe("staple-1", "蛋炒饭", "主食", 2, &["米饭", "鸡蛋", "葱"]),
            recipe("staple-2", "葱油拌面", "主食", 2, &["面条", "葱", "生抽"]),
        ]
    }
}
