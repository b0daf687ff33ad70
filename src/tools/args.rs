//! Lenient readers for tool arguments.
//!
//! Arguments are whatever JSON the caller sent. Wrong types never fail a
//! call; they read as absent.

use chrono::Utc;
use serde_json::Value;

use crate::menu::{WhatToEatParams, MAX_PEOPLE, MIN_PEOPLE};

const DEFAULT_PEOPLE_COUNT: i64 = 2;

fn field<'a>(args: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    args.and_then(|value| value.get(key))
}

pub fn parse_string_param(args: Option<&Value>, key: &str, default: &str) -> String {
    field(args, key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

pub fn parse_number_param(args: Option<&Value>, key: &str) -> Option<f64> {
    field(args, key).and_then(Value::as_f64)
}

/// Non-string entries are dropped.
pub fn parse_string_array_param(args: Option<&Value>, key: &str) -> Vec<String> {
    field(args, key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Loose truthiness: `null`, `false`, `0`, and `""` are false, anything else
/// present is true.
pub fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Truncates an in-range head count. Values outside 1..=10 are rounded away
/// from the range so `10.5` or `0.5` still fail validation.
fn people_from_raw(count: f64) -> i64 {
    if count > MAX_PEOPLE as f64 {
        count.ceil() as i64
    } else if count < MIN_PEOPLE as f64 {
        count.floor() as i64
    } else {
        count.trunc() as i64
    }
}

impl WhatToEatParams {
    /// Reads `whatToEat` arguments, seeding from the current time when no
    /// usable seed is given.
    pub fn from_args(args: Option<&Value>) -> Self {
        Self::from_args_with_seed(args, Utc::now().timestamp_millis() as f64)
    }

    pub fn from_args_with_seed(args: Option<&Value>, fallback_seed: f64) -> Self {
        let people_count = parse_number_param(args, "peopleCount")
            .filter(|count| *count != 0.0)
            .map(people_from_raw)
            .unwrap_or(DEFAULT_PEOPLE_COUNT);
        let dish_count = parse_number_param(args, "dishCount")
            .filter(|count| *count >= 1.0)
            .map(|count| count.trunc() as u32);
        let seed = parse_number_param(args, "seed")
            .filter(|seed| seed.is_finite() && *seed != 0.0)
            .unwrap_or(fallback_seed);

        Self {
            people_count,
            prefer_fish: truthy(field(args, "preferFish")),
            vegetarian: truthy(field(args, "vegetarian")),
            avoid_ingredients: parse_string_array_param(args, "avoidIngredients"),
            dish_count,
            seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::menu::{WhatToEatParams, MAX_PEOPLE, MIN_PEOPLE};
    use crate::tools::args::{
        parse_number_param, parse_string_array_param, parse_string_param, truthy,
    };

    #[test]
    fn readers_ignore_wrong_types() {
        let args = json!({ "query": 5, "limit": "10", "items": ["a", 1, null, "b"] });
        assert_eq!(parse_string_param(Some(&args), "query", "x"), "x");
        assert_eq!(parse_string_param(None, "query", ""), "");
        assert!(parse_number_param(Some(&args), "limit").is_none());
        assert_eq!(parse_string_array_param(Some(&args), "items"), vec!["a", "b"]);
        assert!(parse_string_array_param(Some(&args), "query").is_empty());
    }

    #[test]
    fn truthiness_matches_loose_semantics() {
        assert!(!truthy(None));
        assert!(!truthy(Some(&json!(null))));
        assert!(!truthy(Some(&json!(0))));
        assert!(!truthy(Some(&json!(""))));
        assert!(!truthy(Some(&json!(false))));
        assert!(truthy(Some(&json!("false"))));
        assert!(truthy(Some(&json!(1))));
        assert!(truthy(Some(&json!([]))));
    }

    #[test]
    fn what_to_eat_defaults() {
        let params = WhatToEatParams::from_args_with_seed(None, 77.0);
        assert_eq!(params, WhatToEatParams::new(2, 77.0));

        let params =
            WhatToEatParams::from_args_with_seed(Some(&json!({ "peopleCount": 0, "seed": 0 })), 5.0);
        assert_eq!(params.people_count, 2);
        assert_eq!(params.seed, 5.0);
    }

    #[test]
    fn what_to_eat_reads_every_field() {
        let args = json!({
            "peopleCount": 6.7,
            "preferFish": 1,
            "vegetarian": "yes",
            "avoidIngredients": ["葱", 3, "蒜"],
            "dishCount": 4,
            "seed": 12345
        });
        let params = WhatToEatParams::from_args_with_seed(Some(&args), 1.0);
        assert_eq!(params.people_count, 6);
        assert!(params.prefer_fish);
        assert!(params.vegetarian);
        assert_eq!(params.avoid_ingredients, vec!["葱", "蒜"]);
        assert_eq!(params.dish_count, Some(4));
        assert_eq!(params.seed, 12345.0);
    }

    #[test]
    fn non_positive_dish_count_is_ignored() {
        for raw in [json!(0), json!(-2), json!(null), json!("3")] {
            let params =
                WhatToEatParams::from_args_with_seed(Some(&json!({ "dishCount": raw })), 1.0);
            assert!(params.dish_count.is_none());
        }
        let params =
            WhatToEatParams::from_args_with_seed(Some(&json!({ "peopleCount": 42 })), 1.0);
        assert_eq!(params.people_count, 42);
    }

    #[test]
    fn fractional_head_counts_outside_the_range_stay_invalid() {
        let read = |raw: f64| {
            WhatToEatParams::from_args_with_seed(Some(&json!({ "peopleCount": raw })), 1.0)
                .people_count
        };
        assert_eq!(read(10.5), 11);
        assert_eq!(read(0.5), 0);
        assert_eq!(read(-0.5), -1);
        assert_eq!(read(1.5), 1);
        assert_eq!(read(10.0), 10);
    }
}
