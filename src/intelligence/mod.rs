// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Planning calculations
//!
//! Pure functions over the value types in [`crate::models`]. Each module
//! exposes a default-config entry point plus a variant taking an explicit
//! config section.

pub mod activity;
pub mod energy;
pub mod meal_plan;
pub mod scheduler;
pub mod workout_analysis;

pub use activity::{calculate_session_energy, session_energy, session_energy_for_label, ActivityModel};
pub use energy::{basal_kcal, calculate_energy, calculate_harris_benedict, energy_for, fluid_baseline};
pub use meal_plan::{
    choose_snack, cumulative_series, daily_totals, default_snack_candidates, hourly_rate,
    per_meal_kcal, portions_for, pre_workout_snack_kcal, recommend_snack, CumulativePoint,
    DailyTotals, RecipeNutrition,
};
pub use scheduler::{build_plan, cadence_for, default_cadence, plan_for_session, Cadence};
pub use workout_analysis::{
    analyze_import, compare_with_plan, keytel_kcal, sweat_loss_liters, MeasurementSource,
    WorkoutComparison,
};
