use tracing::{debug, info};

use crate::menu::analysis::{analyze_difficulty, cooking_time_stats, shopping_list};
use crate::menu::diversity::{seeded_pick, select_diverse_recipes};
use crate::menu::{
    DishRecommendation, MenuError, RecommendationOutcome, WhatToEatParams, MAX_PEOPLE,
    MIN_PEOPLE,
};
use crate::recipes::classify::{
    cooking_method, cuisine_type, is_aquatic_dish, is_meat_dish, is_vegetable_dish,
};
use crate::recipes::query::SimplifiedRecipe;
use crate::recipes::{Recipe, CATEGORY_SOUP, CATEGORY_STAPLE};

const FISH_SEED_OFFSET: f64 = 1.0;
const MEAT_SEED_OFFSET: f64 = 100.0;
const VEGETABLE_SEED_OFFSET: f64 = 200.0;
const SOUP_SEED_OFFSET: f64 = 300.0;
const STAPLE_SEED_OFFSET: f64 = 400.0;

const MEAT_SHARE: f64 = 0.6;
const VEGETABLE_SHARE: f64 = 0.4;
const MIN_VEGETARIAN_DISHES: u32 = 3;
const FISH_HEADCOUNT_THRESHOLD: u32 = 8;
const SOUP_HEADCOUNT_THRESHOLD: u32 = 5;
const STAPLE_HEADCOUNT_THRESHOLD: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DishQuota {
    pub meat: usize,
    pub vegetable: usize,
}

pub fn dish_quota(people: u32, dish_count: Option<u32>, vegetarian: bool) -> DishQuota {
    if vegetarian {
        return DishQuota {
            meat: 0,
            vegetable: dish_count.unwrap_or(people.max(MIN_VEGETARIAN_DISHES)) as usize,
        };
    }
    match dish_count {
        Some(total) => {
            let meat = (f64::from(total) * MEAT_SHARE).ceil() as usize;
            DishQuota {
                meat,
                vegetable: (total as usize).saturating_sub(meat),
            }
        }
        None => DishQuota {
            meat: (f64::from(people) * MEAT_SHARE).ceil() as usize,
            vegetable: (f64::from(people) * VEGETABLE_SHARE).ceil() as usize,
        },
    }
}

/// Builds a menu from `recipes`. Expected failures come back as
/// [`RecommendationOutcome::Error`]; an empty collection yields
/// [`RecommendationOutcome::NoData`].
pub fn recommend(params: &WhatToEatParams, recipes: &[Recipe]) -> RecommendationOutcome {
    if !(MIN_PEOPLE..=MAX_PEOPLE).contains(&params.people_count) {
        return MenuError::InvalidPeopleCount(params.people_count).into();
    }
    if recipes.is_empty() {
        return RecommendationOutcome::no_data();
    }
    match build_menu(params, recipes) {
        Ok(menu) => RecommendationOutcome::Menu(Box::new(menu)),
        Err(error) => {
            debug!("no menu for {params:?}: {error}");
            error.into()
        }
    }
}

fn build_menu(
    params: &WhatToEatParams,
    recipes: &[Recipe],
) -> Result<DishRecommendation, MenuError> {
    let people = params.people_count as u32;
    let seed = params.seed;

    let mut pool = recipes
        .iter()
        .filter(|recipe| {
            !params
                .avoid_ingredients
                .iter()
                .any(|avoid| recipe.has_ingredient_containing(avoid))
        })
        .collect::<Vec<_>>();
    if params.vegetarian {
        pool.retain(|recipe| is_vegetable_dish(recipe));
        if pool.is_empty() {
            return Err(MenuError::NoVegetarianRecipes);
        }
    } else if pool.is_empty() {
        return Err(MenuError::AllRecipesExcluded);
    }

    let quota = dish_quota(people, params.dish_count, params.vegetarian);
    debug!(
        "menu quota for {people} people: {} meat, {} vegetable ({} candidates)",
        quota.meat,
        quota.vegetable,
        pool.len()
    );

    let fish = if !params.vegetarian
        && (params.prefer_fish || people > FISH_HEADCOUNT_THRESHOLD)
    {
        let fish_pool = pool
            .iter()
            .copied()
            .filter(|recipe| is_aquatic_dish(recipe))
            .collect::<Vec<_>>();
        seeded_pick(&fish_pool, seed + FISH_SEED_OFFSET)
    } else {
        None
    };

    let meat = if params.vegetarian {
        Vec::new()
    } else {
        let meat_pool = pool
            .iter()
            .copied()
            .filter(|recipe| is_meat_dish(recipe))
            .filter(|recipe| fish.map_or(true, |fish| fish.id != recipe.id))
            .collect::<Vec<_>>();
        let wanted = quota.meat.saturating_sub(usize::from(fish.is_some()));
        select_diverse_recipes(&meat_pool, wanted, seed + MEAT_SEED_OFFSET)
    };

    let vegetable_pool = pool
        .iter()
        .copied()
        .filter(|recipe| is_vegetable_dish(recipe))
        .collect::<Vec<_>>();
    let vegetables =
        select_diverse_recipes(&vegetable_pool, quota.vegetable, seed + VEGETABLE_SEED_OFFSET);

    let mut extras = Vec::new();
    if people >= SOUP_HEADCOUNT_THRESHOLD {
        extras.extend(pick_extra(
            &pool,
            CATEGORY_SOUP,
            params.vegetarian,
            seed + SOUP_SEED_OFFSET,
        ));
    }
    if people >= STAPLE_HEADCOUNT_THRESHOLD {
        extras.extend(pick_extra(
            &pool,
            CATEGORY_STAPLE,
            params.vegetarian,
            seed + STAPLE_SEED_OFFSET,
        ));
    }

    let dishes = fish
        .into_iter()
        .chain(meat)
        .chain(vegetables)
        .chain(extras.iter().copied())
        .collect::<Vec<_>>();
    if dishes.is_empty() {
        return Err(if params.vegetarian {
            MenuError::EmptyVegetarianMenu
        } else {
            MenuError::EmptyMenu
        });
    }

    let menu = summarize(params, people, &dishes, extras.len());
    info!(
        "recommended {} dishes for {people} people (seed {seed})",
        menu.dishes.len()
    );
    Ok(menu)
}

fn pick_extra<'a>(
    pool: &[&'a Recipe],
    category: &str,
    vegetarian: bool,
    seed: f64,
) -> Option<&'a Recipe> {
    let candidates = pool
        .iter()
        .copied()
        .filter(|recipe| recipe.is_category(category))
        .filter(|recipe| !vegetarian || is_vegetable_dish(recipe))
        .collect::<Vec<_>>();
    seeded_pick(&candidates, seed)
}

fn distinct(values: impl Iterator<Item = &'static str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.iter().any(|seen| seen == value) {
            out.push(value.to_string());
        }
    }
    out
}

fn summarize(
    params: &WhatToEatParams,
    people: u32,
    dishes: &[&Recipe],
    extra_count: usize,
) -> DishRecommendation {
    let cooking_time_stats = cooking_time_stats(dishes);
    let difficulty_analysis = analyze_difficulty(dishes);
    let cuisine_variety = distinct(dishes.iter().map(|dish| cuisine_type(dish)));
    let cooking_methods = distinct(dishes.iter().map(|dish| cooking_method(dish)));

    let mut message = format!(
        "为{people}人定制的多样化菜单：共{}道菜，包含{}种风味（{}），预计{}分钟完成，平均难度{}星。",
        dishes.len(),
        cuisine_variety.len(),
        cuisine_variety.join("、"),
        cooking_time_stats.estimated_total_time,
        difficulty_analysis.average_difficulty,
    );
    if extra_count > 0 {
        message.push_str("已包含汤品/主食。");
    }
    if !params.avoid_ingredients.is_empty() {
        message.push_str(&format!("已避免：{}。", params.avoid_ingredients.join("、")));
    }
    if params.vegetarian {
        message.push_str("全素食菜单。");
    }

    DishRecommendation {
        people_count: people,
        meat_dish_count: dishes.iter().filter(|dish| is_meat_dish(dish)).count(),
        vegetable_dish_count: dishes.iter().filter(|dish| is_vegetable_dish(dish)).count(),
        extra_dish_count: extra_count,
        dishes: dishes.iter().map(|dish| SimplifiedRecipe::from(*dish)).collect(),
        shopping_list: shopping_list(dishes),
        cooking_time_stats,
        difficulty_analysis,
        cuisine_variety,
        cooking_methods,
        message,
    }
}
