// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Daily totals, meal split, pre-workout snack and cumulative burn curve

use crate::constants::{meals, units};
use crate::errors::{FuelError, FuelResult};
use crate::models::{EnergyResult, FoodItem, SessionResult};
use crate::providers::FoodLookupProvider;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Energy and fluid needed on a training day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub total_kcal: f64,
    pub total_fluid_liters: f64,
}

pub fn daily_totals(energy: &EnergyResult, session: &SessionResult) -> DailyTotals {
    DailyTotals {
        total_kcal: energy.basal_kcal_per_day + session.session_kcal,
        total_fluid_liters: energy.fluid_baseline_liters_per_day + session.session_fluid_liters,
    }
}

/// Whole kcal per meal when the day is split into `meal_count` meals
///
/// # Errors
///
/// Returns `InvalidInput` for zero meals or a negative total
pub fn per_meal_kcal(total_kcal: f64, meal_count: u32) -> FuelResult<f64> {
    if meal_count == 0 {
        return Err(FuelError::invalid_input("meal count must be positive"));
    }
    if !total_kcal.is_finite() || total_kcal < 0.0 {
        return Err(FuelError::invalid_input(format!(
            "daily total must be non-negative, got {total_kcal}"
        )));
    }
    Ok((total_kcal / f64::from(meal_count)).floor())
}

/// Recipe totals as returned by a recipe source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeNutrition {
    pub label: String,
    /// kcal for the whole recipe
    pub total_kcal: f64,
    /// Servings the recipe makes; 0 counts as 1
    pub servings: u32,
}

impl RecipeNutrition {
    pub fn kcal_per_serving(&self) -> f64 {
        self.total_kcal / f64::from(self.servings.max(1))
    }
}

/// Servings of a recipe that cover one meal; `None` for recipes without calories
pub fn portions_for(per_meal_kcal: f64, recipe: &RecipeNutrition) -> Option<f64> {
    let per_serving = recipe.kcal_per_serving();
    (per_serving > 0.0).then(|| per_meal_kcal / per_serving)
}

/// Calories to eat before a session
pub fn pre_workout_snack_kcal(session_kcal: f64) -> f64 {
    session_kcal * meals::PRE_WORKOUT_SNACK_SHARE
}

/// Smallest snack reaching the target, else the largest available
pub fn choose_snack(options: &[FoodItem], target_kcal: f64) -> Option<&FoodItem> {
    options
        .iter()
        .filter(|item| item.calories >= target_kcal)
        .min_by(|a, b| a.calories.total_cmp(&b.calories))
        .or_else(|| options.iter().max_by(|a, b| a.calories.total_cmp(&b.calories)))
}

/// Look up each candidate and pick a snack for the target
///
/// Candidates the provider cannot resolve are skipped.
pub async fn recommend_snack(
    provider: &dyn FoodLookupProvider,
    candidates: &[&str],
    target_kcal: f64,
) -> Option<FoodItem> {
    let mut options = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match provider.lookup(candidate).await {
            Ok(item) => options.push(item),
            Err(e) => warn!(
                provider = provider.provider_name(),
                "Skipping snack candidate {}: {}", candidate, e
            ),
        }
    }

    let chosen = choose_snack(&options, target_kcal).cloned();
    debug!(target_kcal, chosen = ?chosen.as_ref().map(|c| &c.name), "Snack recommendation");
    chosen
}

/// Default candidate list
pub fn default_snack_candidates() -> Vec<&'static str> {
    meals::CANDIDATE_SNACKS.to_vec()
}

/// Burn and fluid loss accumulated up to a minute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub minute: u32,
    pub kcal: f64,
    pub fluid_liters: f64,
}

/// Minute-by-minute cumulative series from 0 to `duration_minutes`
///
/// Assumes a constant rate; the last point equals the session totals.
pub fn cumulative_series(duration_minutes: u32, session: &SessionResult) -> Vec<CumulativePoint> {
    if duration_minutes == 0 {
        return vec![CumulativePoint {
            minute: 0,
            kcal: 0.0,
            fluid_liters: 0.0,
        }];
    }

    let kcal_per_minute = session.session_kcal / f64::from(duration_minutes);
    let fluid_per_minute = session.session_fluid_liters / f64::from(duration_minutes);

    (0..=duration_minutes)
        .map(|minute| CumulativePoint {
            minute,
            kcal: kcal_per_minute * f64::from(minute),
            fluid_liters: fluid_per_minute * f64::from(minute),
        })
        .collect()
}

/// kcal per hour of a session, for display next to the curve
pub fn hourly_rate(duration_minutes: f64, session: &SessionResult) -> Option<f64> {
    (duration_minutes > 0.0).then(|| session.session_kcal / duration_minutes * units::MINUTES_PER_HOUR)
}
