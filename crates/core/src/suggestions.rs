//! "What should I cook tonight?" ranking.
//!
//! Recipes are scored from a base value, nudged by the user's past cooking
//! feedback and by total time (quick recipes win on a weeknight).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Feedback};

/// Number of suggestions returned by default.
pub const DEFAULT_SUGGESTION_COUNT: usize = 3;

const BASE_SCORE: i32 = 50;
const BOOST_YES: i32 = 30;
const PENALTY_NO: i32 = 50;

/// Effort estimate shown next to a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effort {
    Low,
    Medium,
    High,
}

/// The fields of a recipe the ranking looks at.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub recipe_id: DbId,
    pub prep_time: i32,
    pub cook_time: i32,
    pub ingredient_count: usize,
}

impl Candidate {
    pub fn total_time(&self) -> i32 {
        self.prep_time.max(0).saturating_add(self.cook_time.max(0))
    }
}

/// A ranked suggestion. `score` is internal and not serialized.
#[derive(Debug, Clone, Serialize)]
pub struct Ranked {
    pub recipe_id: DbId,
    #[serde(skip)]
    pub score: i32,
    pub effort: Effort,
    pub total_time: i32,
}

/// Effort from total minutes and ingredient count.
pub fn effort_level(total_time: i32, ingredient_count: usize) -> Effort {
    if total_time > 75 || ingredient_count > 15 {
        Effort::High
    } else if total_time > 45 || ingredient_count > 10 {
        Effort::Medium
    } else {
        Effort::Low
    }
}

/// Score a single recipe given the user's feedback on it, if any.
pub fn score(candidate: &Candidate, feedback: Option<Feedback>) -> i32 {
    let mut score = BASE_SCORE;

    match feedback {
        Some(Feedback::Yes) => score += BOOST_YES,
        Some(Feedback::No) => score -= PENALTY_NO,
        Some(Feedback::Meh) | None => {}
    }

    let total = candidate.total_time();
    if total <= 30 {
        score += 20;
    } else if total <= 45 {
        score += 10;
    } else if total > 60 {
        score -= 10;
    }

    score
}

/// Rank candidates and keep the best `count`. Ties keep the input order.
pub fn rank_tonight(
    candidates: &[Candidate],
    feedback: &HashMap<DbId, Feedback>,
    count: usize,
) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = candidates
        .iter()
        .map(|c| Ranked {
            recipe_id: c.recipe_id,
            score: score(c, feedback.get(&c.recipe_id).copied()),
            effort: effort_level(c.total_time(), c.ingredient_count),
            total_time: c.total_time(),
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(count);
    ranked
}
