// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Constants Module
//!
//! Formula coefficients, input ranges and environment-based defaults.
//! Tunable values are mirrored in [`crate::config::PlannerConfig`]; the
//! constants here are the defaults that configuration falls back to.

use std::env;

/// Harris-Benedict basal metabolic rate coefficients
pub mod harris_benedict {
    pub const MALE_CONSTANT: f64 = 66.47;
    pub const MALE_WEIGHT_COEF: f64 = 13.7;
    pub const MALE_HEIGHT_COEF: f64 = 5.0;
    pub const MALE_AGE_COEF: f64 = 6.8;

    pub const FEMALE_CONSTANT: f64 = 655.1;
    pub const FEMALE_WEIGHT_COEF: f64 = 9.6;
    pub const FEMALE_HEIGHT_COEF: f64 = 1.8;
    pub const FEMALE_AGE_COEF: f64 = 4.7;
}

/// Fluid rules
pub mod hydration {
    /// Daily baseline: 35 ml per kg body weight
    pub const BASELINE_LITERS_PER_KG: f64 = 0.035;
    /// Sweat loss during activity, independent of intensity
    pub const SESSION_LITERS_PER_HOUR: f64 = 0.7;
    /// Sweat volume per kcal/h of energy turnover, used for measured sessions
    pub const SWEAT_LITERS_PER_KCAL: f64 = 1.38e-3;
}

/// Default intake cadence tiers
pub mod cadence {
    pub const DRINK_INTERVAL_MINUTES: u32 = 15;
    /// (upper duration bound in minutes, eat interval in minutes)
    pub const EAT_TIERS: [(u32, u32); 3] = [(60, 20), (120, 30), (180, 45)];
    /// Eat interval for anything longer than the last tier
    pub const EAT_INTERVAL_LONG: u32 = 60;
}

/// Input ranges enforced by the capture form
pub mod ranges {
    pub const MIN_WEIGHT_KG: f64 = 30.0;
    pub const MAX_WEIGHT_KG: f64 = 200.0;
    pub const MIN_HEIGHT_CM: u32 = 100;
    pub const MAX_HEIGHT_CM: u32 = 220;
    pub const MIN_AGE_YEARS: u32 = 10;
    pub const MAX_AGE_YEARS: u32 = 100;
}

/// Meal and snack planning
pub mod meals {
    pub const MEALS_PER_DAY: u32 = 3;
    /// Share of the session burn eaten as a snack before training
    pub const PRE_WORKOUT_SNACK_SHARE: f64 = 0.3;
    /// Snacks offered when no other catalog is configured
    pub const CANDIDATE_SNACKS: [&str; 3] = ["Clif Bar", "Honey Stinger Gel", "Gatorade"];
}

/// Offline trainer defaults
pub mod trainer {
    pub const WEIGHT_GRID_START_KG: u32 = 55;
    pub const WEIGHT_GRID_END_KG: u32 = 95;
    pub const WEIGHT_GRID_STEP_KG: u32 = 5;
    pub const DURATION_GRID_START_MIN: u32 = 30;
    pub const DURATION_GRID_END_MIN: u32 = 150;
    pub const DURATION_GRID_STEP_MIN: u32 = 20;
    pub const N_ESTIMATORS: usize = 100;
    pub const RANDOM_SEED: u64 = 42;
    pub const TEST_FRACTION: f64 = 0.2;
    /// Numeric columns trailing the activity label in the reference CSV
    pub const REFERENCE_NUMERIC_COLUMNS: usize = 5;
}

/// Unit conversions
pub mod units {
    pub const MINUTES_PER_HOUR: f64 = 60.0;
    pub const KJ_PER_KCAL: f64 = 4.184;
}

/// Environment-based configuration
pub mod env_config {
    use super::env;

    /// Overrides the reference dataset path
    pub const DATASET_PATH_VAR: &str = "SPORT_FUEL_DATASET";
    /// Overrides the persisted model path
    pub const MODEL_PATH_VAR: &str = "SPORT_FUEL_MODEL";

    /// Get log level from environment or default
    pub fn log_level() -> String {
        env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    }
}

/// Service identity used in structured logs
pub mod service {
    pub const SERVICE_NAME: &str = "sport-fuel-planner";
    pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
}
