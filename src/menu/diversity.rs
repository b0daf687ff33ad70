//! Greedy, seed-reproducible diversity selection.
//!
//! Each round every remaining candidate is scored on how many unseen
//! attributes it would introduce (cuisine +3, cooking method +2, a fully
//! unseen flavor set +1). Ties among the best are broken by
//! [`seeded_random`], so a given seed always reproduces the same picks.

use std::collections::HashSet;

use crate::recipes::classify::{cooking_method, cuisine_type, flavor_profile};
use crate::recipes::Recipe;

const CUISINE_WEIGHT: u8 = 3;
const METHOD_WEIGHT: u8 = 2;
const FLAVOR_WEIGHT: u8 = 1;

/// `frac(sin(seed) * 10000)`. Kept bit-for-bit so existing seeds keep
/// reproducing the same menus.
pub fn seeded_random(seed: f64) -> f64 {
    let x = seed.sin() * 10000.0;
    x - x.floor()
}

pub fn seeded_index(seed: f64, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let index = (seeded_random(seed) * len as f64).floor() as usize;
    Some(index.min(len - 1))
}

pub fn seeded_pick<'a>(pool: &[&'a Recipe], seed: f64) -> Option<&'a Recipe> {
    seeded_index(seed, pool.len()).map(|index| pool[index])
}

#[derive(Debug, Clone)]
pub struct SelectionCandidate<'a> {
    pub recipe: &'a Recipe,
    pub cuisine: &'static str,
    pub method: &'static str,
    pub flavors: Vec<&'static str>,
    pub diversity_score: u8,
}

impl<'a> SelectionCandidate<'a> {
    pub fn new(recipe: &'a Recipe) -> Self {
        Self {
            recipe,
            cuisine: cuisine_type(recipe),
            method: cooking_method(recipe),
            flavors: flavor_profile(recipe),
            diversity_score: 0,
        }
    }
}

#[derive(Debug, Default)]
struct UsedAttributes {
    cuisines: HashSet<&'static str>,
    methods: HashSet<&'static str>,
    flavors: HashSet<&'static str>,
}

impl UsedAttributes {
    fn score(&self, candidate: &SelectionCandidate<'_>) -> u8 {
        let mut score = 0;
        if !self.cuisines.contains(candidate.cuisine) {
            score += CUISINE_WEIGHT;
        }
        if !self.methods.contains(candidate.method) {
            score += METHOD_WEIGHT;
        }
        if candidate
            .flavors
            .iter()
            .all(|flavor| !self.flavors.contains(flavor))
        {
            score += FLAVOR_WEIGHT;
        }
        score
    }

    fn absorb(&mut self, candidate: &SelectionCandidate<'_>) {
        self.cuisines.insert(candidate.cuisine);
        self.methods.insert(candidate.method);
        self.flavors.extend(candidate.flavors.iter().copied());
    }
}

/// Picks up to `count` recipes, first pick first.
pub fn select_diverse_recipes<'a>(
    candidates: &[&'a Recipe],
    count: usize,
    seed_base: f64,
) -> Vec<&'a Recipe> {
    let mut remaining = candidates
        .iter()
        .copied()
        .map(SelectionCandidate::new)
        .collect::<Vec<_>>();
    let mut used = UsedAttributes::default();
    let mut selected = Vec::with_capacity(count.min(remaining.len()));
    let mut current_seed = seed_base;

    while selected.len() < count && !remaining.is_empty() {
        for candidate in &mut remaining {
            candidate.diversity_score = used.score(candidate);
        }
        let max_score = remaining
            .iter()
            .map(|candidate| candidate.diversity_score)
            .max()
            .unwrap_or(0);
        let best = remaining
            .iter()
            .enumerate()
            .filter(|(_, candidate)| candidate.diversity_score == max_score)
            .map(|(position, _)| position)
            .collect::<Vec<_>>();

        let Some(pick) = seeded_index(current_seed, best.len()) else {
            break;
        };
        current_seed += 1.0;

        let chosen = remaining.remove(best[pick]);
        used.absorb(&chosen);
        selected.push(chosen.recipe);
    }

    selected
}
