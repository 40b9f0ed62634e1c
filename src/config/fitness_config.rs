// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Formula coefficients, cadence tiers and trainer parameters

use crate::constants::{cadence, harris_benedict, hydration, trainer};
use crate::models::{ActivityKind, Intensity};
use serde::{Deserialize, Serialize};

/// Harris-Benedict coefficients per sex
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarrisBenedictConfig {
    pub male: BmrCoefficients,
    pub female: BmrCoefficients,
    /// Daily fluid baseline in liters per kg body weight
    pub fluid_liters_per_kg: f64,
}

/// `constant + weight·w + height·h − age·a`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmrCoefficients {
    pub constant: f64,
    pub weight: f64,
    pub height: f64,
    pub age: f64,
}

impl BmrCoefficients {
    /// Term-by-term mean of two coefficient sets
    pub fn midpoint(&self, other: &Self) -> Self {
        Self {
            constant: (self.constant + other.constant) / 2.0,
            weight: (self.weight + other.weight) / 2.0,
            height: (self.height + other.height) / 2.0,
            age: (self.age + other.age) / 2.0,
        }
    }

    pub fn apply(&self, weight_kg: f64, height_cm: f64, age_years: f64) -> f64 {
        self.constant + self.weight * weight_kg + self.height * height_cm - self.age * age_years
    }
}

/// Session burn factors in kcal per kg per hour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityFactorsConfig {
    pub running: IntensityFactors,
    pub cycling: IntensityFactors,
    pub swimming: IntensityFactors,
    pub triathlon: IntensityFactors,
    /// Fluid lost per hour of activity
    pub fluid_liters_per_hour: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityFactors {
    pub light: f64,
    pub moderate: f64,
    pub hard: f64,
}

impl IntensityFactors {
    const fn new(light: f64, moderate: f64, hard: f64) -> Self {
        Self {
            light,
            moderate,
            hard,
        }
    }

    pub fn for_intensity(&self, intensity: Intensity) -> f64 {
        match intensity {
            Intensity::Light => self.light,
            Intensity::Moderate => self.moderate,
            Intensity::Hard => self.hard,
        }
    }
}

impl ActivityFactorsConfig {
    /// kcal per kg per hour for a sport at an intensity
    pub fn factor(&self, kind: ActivityKind, intensity: Intensity) -> f64 {
        let row = match kind {
            ActivityKind::Running => &self.running,
            ActivityKind::Cycling => &self.cycling,
            ActivityKind::Swimming => &self.swimming,
            ActivityKind::Triathlon => &self.triathlon,
        };
        row.for_intensity(intensity)
    }
}

/// Default eat cadence tiers; drink cadence is flat
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceConfig {
    /// Ascending (max duration, eat interval) pairs, all in minutes
    pub eat_tiers: Vec<(u32, u32)>,
    pub eat_interval_long: u32,
    pub drink_interval: u32,
}

/// Label keyword with its synthetic-label multiplier and pace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityFamily {
    /// Substring matched against the reference dataset label
    pub keyword: String,
    /// Manually tuned multiplier on the reference burn rate
    pub boost: f64,
    /// Assumed pace used to fill the distance column
    pub km_per_minute: f64,
}

impl ActivityFamily {
    fn new(keyword: &str, boost: f64, km_per_minute: f64) -> Self {
        Self {
            keyword: keyword.to_string(),
            boost,
            km_per_minute,
        }
    }
}

/// Offline calorie predictor training parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// (start, end inclusive, step) in kg
    pub weight_grid: (u32, u32, u32),
    /// (start, end inclusive, step) in minutes
    pub duration_grid: (u32, u32, u32),
    pub families: Vec<ActivityFamily>,
    /// Used for labels matching no family
    pub fallback_family: ActivityFamily,
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub seed: u64,
    pub test_fraction: f64,
    /// Train with the distance column
    pub use_distance: bool,
}

impl TrainerConfig {
    /// First family whose keyword occurs in the label
    pub fn family_for(&self, label: &str) -> &ActivityFamily {
        self.families
            .iter()
            .find(|family| label.contains(&family.keyword))
            .unwrap_or(&self.fallback_family)
    }

    pub fn weights(&self) -> Vec<f64> {
        grid(self.weight_grid)
    }

    pub fn durations(&self) -> Vec<f64> {
        grid(self.duration_grid)
    }
}

fn grid((start, end, step): (u32, u32, u32)) -> Vec<f64> {
    if step == 0 {
        return vec![f64::from(start)];
    }
    (start..=end)
        .step_by(step as usize)
        .map(f64::from)
        .collect()
}

impl Default for HarrisBenedictConfig {
    fn default() -> Self {
        Self {
            male: BmrCoefficients {
                constant: harris_benedict::MALE_CONSTANT,
                weight: harris_benedict::MALE_WEIGHT_COEF,
                height: harris_benedict::MALE_HEIGHT_COEF,
                age: harris_benedict::MALE_AGE_COEF,
            },
            female: BmrCoefficients {
                constant: harris_benedict::FEMALE_CONSTANT,
                weight: harris_benedict::FEMALE_WEIGHT_COEF,
                height: harris_benedict::FEMALE_HEIGHT_COEF,
                age: harris_benedict::FEMALE_AGE_COEF,
            },
            fluid_liters_per_kg: hydration::BASELINE_LITERS_PER_KG,
        }
    }
}

impl Default for ActivityFactorsConfig {
    fn default() -> Self {
        Self {
            running: IntensityFactors::new(7.0, 9.0, 12.0),
            cycling: IntensityFactors::new(5.0, 7.0, 10.0),
            swimming: IntensityFactors::new(6.0, 8.0, 11.0),
            triathlon: IntensityFactors::new(6.0, 9.0, 13.0),
            fluid_liters_per_hour: hydration::SESSION_LITERS_PER_HOUR,
        }
    }
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            eat_tiers: cadence::EAT_TIERS.to_vec(),
            eat_interval_long: cadence::EAT_INTERVAL_LONG,
            drink_interval: cadence::DRINK_INTERVAL_MINUTES,
        }
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            weight_grid: (
                trainer::WEIGHT_GRID_START_KG,
                trainer::WEIGHT_GRID_END_KG,
                trainer::WEIGHT_GRID_STEP_KG,
            ),
            duration_grid: (
                trainer::DURATION_GRID_START_MIN,
                trainer::DURATION_GRID_END_MIN,
                trainer::DURATION_GRID_STEP_MIN,
            ),
            families: vec![
                ActivityFamily::new("Running", 4.3, 0.1),
                ActivityFamily::new("Cycling", 4.5, 0.25),
                ActivityFamily::new("Swimming", 10.0, 0.05),
            ],
            fallback_family: ActivityFamily::new("", 1.0, 0.1),
            n_estimators: trainer::N_ESTIMATORS,
            max_depth: None,
            min_samples_split: 2,
            seed: trainer::RANDOM_SEED,
            test_fraction: trainer::TEST_FRACTION,
            use_distance: true,
        }
    }
}
