//! Keyword heuristics over a single recipe.
//!
//! All lists are matched as plain substrings and checked in the order given;
//! for the single-valued classifiers the first hit wins.

use crate::recipes::{
    Recipe, CATEGORY_AQUATIC, CATEGORY_BREAKFAST, CATEGORY_MEAT, CATEGORY_MEAT_ALIAS,
    CATEGORY_STAPLE,
};

const ANIMAL_PROTEINS: [&str; 35] = [
    // livestock and poultry
    "猪", "牛", "鸡", "鸭", "羊", "兔", "鹅",
    // aquatic
    "鱼", "虾", "蟹", "蛤", "蚝", "蚌", "贝", "鳗", "鲳", "鲤", "鲫", "带鱼", "黄鱼", "鲑鱼",
    "三文鱼",
    // generic animal products
    "肉", "蛋", "奶", "奶酪", "黄油", "奶油", "酸奶",
    // processed meat
    "火腿", "腊肉", "香肠", "培根", "肉松", "肉丸",
];

const AQUATIC_KEYWORDS: [&str; 15] = [
    "鱼", "虾", "蟹", "蛤", "蚝", "蚌", "贝", "鳗", "鲳", "鲤", "鲫", "带鱼", "黄鱼", "鲑鱼",
    "三文鱼",
];

const COOKING_METHODS: [(&[&str], &str); 8] = [
    (&["炒"], "炒"),
    (&["煮", "汤"], "煮"),
    (&["蒸"], "蒸"),
    (&["炖", "煲"], "炖"),
    (&["烤", "焗"], "烤"),
    (&["炸"], "炸"),
    (&["凉拌", "拌"], "凉拌"),
    (&["红烧", "烧"], "红烧"),
];
pub const DEFAULT_COOKING_METHOD: &str = "其他";

const CUISINES: [(&[&str], &str); 11] = [
    (&["川", "麻辣", "辣"], "川菜"),
    (&["粤", "广", "港"], "粤菜"),
    (&["湘", "湖南"], "湘菜"),
    (&["鲁", "山东"], "鲁菜"),
    (&["苏", "江苏"], "苏菜"),
    (&["浙", "杭州"], "浙菜"),
    (&["闽", "福建"], "闽菜"),
    (&["徽", "安徽"], "徽菜"),
    (&["京", "北京"], "京菜"),
    (&["东北"], "东北菜"),
    (&["西北", "新疆"], "西北菜"),
];
pub const DEFAULT_CUISINE: &str = "家常菜";

const FLAVORS: [(&[&str], &str); 6] = [
    (&["辣", "麻"], "辣"),
    (&["甜", "糖"], "甜"),
    (&["酸", "醋"], "酸"),
    (&["咸", "盐"], "咸"),
    (&["鲜", "嫩"], "鲜"),
    (&["香", "蒜", "葱"], "香"),
];
pub const MILD_FLAVOR: &str = "清淡";

fn is_meat_category(recipe: &Recipe) -> bool {
    recipe.is_category(CATEGORY_MEAT)
        || recipe.is_category(CATEGORY_MEAT_ALIAS)
        || recipe.is_category(CATEGORY_AQUATIC)
}

fn any_ingredient_matches(recipe: &Recipe, keywords: &[&str]) -> bool {
    recipe.ingredient_names().any(|name| {
        let name = name.to_lowercase();
        keywords.iter().any(|keyword| name.contains(keyword))
    })
}

fn first_match(text: &str, table: &[(&[&str], &'static str)]) -> Option<&'static str> {
    table
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| text.contains(keyword)))
        .map(|(_, label)| *label)
}

pub fn contains_animal_protein(recipe: &Recipe) -> bool {
    any_ingredient_matches(recipe, &ANIMAL_PROTEINS)
}

pub fn is_meat_dish(recipe: &Recipe) -> bool {
    is_meat_category(recipe) || contains_animal_protein(recipe)
}

pub fn is_vegetable_dish(recipe: &Recipe) -> bool {
    if is_meat_category(recipe) {
        return false;
    }
    // Breakfast and staples often hide eggs or dairy; they fall through to the
    // same ingredient test as everything else.
    if recipe.is_category(CATEGORY_BREAKFAST) || recipe.is_category(CATEGORY_STAPLE) {
        return !contains_animal_protein(recipe);
    }
    !contains_animal_protein(recipe)
}

pub fn is_aquatic_dish(recipe: &Recipe) -> bool {
    recipe.is_category(CATEGORY_AQUATIC) || any_ingredient_matches(recipe, &AQUATIC_KEYWORDS)
}

pub fn contains_meat_type(recipe: &Recipe, meat_type: &str) -> bool {
    let needle = meat_type.to_lowercase();
    recipe
        .ingredient_names()
        .any(|name| name.to_lowercase().contains(&needle))
}

pub fn cooking_method(recipe: &Recipe) -> &'static str {
    first_match(&recipe.name, &COOKING_METHODS).unwrap_or(DEFAULT_COOKING_METHOD)
}

pub fn cuisine_type(recipe: &Recipe) -> &'static str {
    let text = format!("{} {}", recipe.name, recipe.tags.join(" "));
    first_match(&text, &CUISINES).unwrap_or(DEFAULT_CUISINE)
}

pub fn flavor_profile(recipe: &Recipe) -> Vec<&'static str> {
    let text = format!("{} {}", recipe.name, recipe.description).to_lowercase();
    let flavors = FLAVORS
        .iter()
        .filter(|(keywords, _)| keywords.iter().any(|keyword| text.contains(keyword)))
        .map(|(_, label)| *label)
        .collect::<Vec<_>>();
    if flavors.is_empty() {
        vec![MILD_FLAVOR]
    } else {
        flavors
    }
}

#[cfg(test)]
mod tests {
    use crate::recipes::classify::{
        contains_meat_type, cooking_method, cuisine_type, flavor_profile, is_aquatic_dish,
        is_meat_dish, is_vegetable_dish,
    };
    use crate::recipes::fixtures::{kitchen, recipe};

    #[test]
    fn meat_and_vegetable_never_overlap() {
        for dish in kitchen() {
            assert!(
                !(is_meat_dish(&dish) && is_vegetable_dish(&dish)),
                "{} classified as both",
                dish.name
            );
        }
    }

    #[test]
    fn category_and_ingredients_both_mark_meat() {
        let by_category = recipe("a", "素炒", "荤菜", 1, &["白菜"]);
        let by_alias = recipe("b", "素炒", "荒菜", 1, &["白菜"]);
        let by_ingredient = recipe("c", "炒饭", "主食", 1, &["米饭", "火腿"]);
        assert!(is_meat_dish(&by_category));
        assert!(is_meat_dish(&by_alias));
        assert!(is_meat_dish(&by_ingredient));
        assert!(!is_vegetable_dish(&by_ingredient));

        let plain_staple = recipe("d", "葱油拌面", "主食", 1, &["面条", "葱"]);
        assert!(is_vegetable_dish(&plain_staple));
        assert!(!is_meat_dish(&plain_staple));
    }

    #[test]
    fn aquatic_matches_category_or_ingredient() {
        assert!(is_aquatic_dish(&recipe("a", "白灼", "水产", 1, &["姜"])));
        assert!(is_aquatic_dish(&recipe("b", "虾仁炒蛋", "荤菜", 1, &["虾仁", "鸡蛋"])));
        assert!(!is_aquatic_dish(&recipe("c", "红烧肉", "荤菜", 1, &["五花肉"])));
    }

    #[test]
    fn meat_type_lookup_is_case_insensitive() {
        let dish = recipe("a", "Bacon Roll", "早餐", 1, &["Bacon", "Bread"]);
        assert!(contains_meat_type(&dish, "bacon"));
        assert!(!contains_meat_type(&dish, "ham"));
    }

    #[test]
    fn cooking_method_priority_is_fixed() {
        assert_eq!(cooking_method(&recipe("a", "番茄炒蛋汤", "汤类", 1, &[])), "炒");
        assert_eq!(cooking_method(&recipe("b", "紫菜汤", "汤类", 1, &[])), "煮");
        assert_eq!(cooking_method(&recipe("c", "红烧茄子", "素菜", 1, &[])), "红烧");
        assert_eq!(cooking_method(&recipe("d", "凉拌木耳", "素菜", 1, &[])), "凉拌");
        assert_eq!(cooking_method(&recipe("e", "地三鲜", "素菜", 1, &[])), "其他");
    }

    #[test]
    fn cuisine_reads_name_and_tags() {
        let mut dish = recipe("a", "白切鸡", "荤菜", 1, &[]);
        assert_eq!(cuisine_type(&dish), "家常菜");
        dish.tags = vec!["广东".to_string()];
        assert_eq!(cuisine_type(&dish), "粤菜");
        assert_eq!(cuisine_type(&recipe("b", "麻辣香锅", "荤菜", 1, &[])), "川菜");
        assert_eq!(cuisine_type(&recipe("c", "京酱肉丝", "荤菜", 1, &[])), "京菜");
    }

    #[test]
    fn flavor_profile_collects_every_match() {
        let mut dish = recipe("a", "糖醋排骨", "荤菜", 3, &[]);
        dish.description = "外酥里嫩，蒜香浓郁".to_string();
        assert_eq!(flavor_profile(&dish), vec!["甜", "酸", "鲜", "香"]);
        assert_eq!(flavor_profile(&recipe("b", "白粥", "主食", 1, &[])), vec!["清淡"]);
    }
}
