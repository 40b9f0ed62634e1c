// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Data Models
//!
//! Value objects passed between the planning components. Nothing here holds
//! session state: callers capture a [`BodyMetrics`] and an
//! [`ActivitySelection`] and hand them to the pure functions in
//! [`crate::intelligence`].
//!
//! ## Core Models
//!
//! - [`BodyMetrics`]: weight, height, age and sex of the athlete
//! - [`ActivitySelection`]: planned sport, intensity and duration
//! - [`EnergyResult`]: basal energy and daily fluid baseline
//! - [`SessionResult`]: calories burned and fluid lost in one session
//! - [`IntakePlan`]: timed eat/drink checkpoints for one session
//! - [`MeasuredSession`]: a recorded workout imported after the fact
//! - [`FoodItem`]: nutrition facts of one food serving
//! - [`TrainingRecord`]: one synthetic row for the offline calorie predictor

use crate::constants::ranges;
use crate::errors::{FuelError, FuelResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Biological sex used to select the basal metabolic rate formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    /// Term-by-term average of the male and female formulas
    Other,
}

impl FromStr for Sex {
    type Err = FuelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "männlich" => Ok(Self::Male),
            "female" | "f" | "weiblich" => Ok(Self::Female),
            "other" | "divers" | "unspecified" => Ok(Self::Other),
            other => Err(FuelError::invalid_input(format!("unknown sex: {other}"))),
        }
    }
}

/// Body metrics captured once per planning session
///
/// # Examples
///
/// ```rust
/// use sport_fuel_planner::models::{BodyMetrics, Sex};
///
/// let metrics = BodyMetrics::new(70.0, 175, 25, Sex::Male).unwrap();
/// assert_eq!(metrics.height_cm, 175);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBodyMetrics")]
pub struct BodyMetrics {
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Height in centimeters
    pub height_cm: u32,
    /// Age in whole years
    pub age_years: u32,
    pub sex: Sex,
}

impl BodyMetrics {
    /// Capture metrics, rejecting non-positive values
    pub fn new(weight_kg: f64, height_cm: u32, age_years: u32, sex: Sex) -> FuelResult<Self> {
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(FuelError::invalid_input(format!(
                "weight must be positive, got {weight_kg}"
            )));
        }
        if height_cm == 0 {
            return Err(FuelError::invalid_input("height must be positive"));
        }
        if age_years == 0 {
            return Err(FuelError::invalid_input("age must be positive"));
        }

        Ok(Self {
            weight_kg,
            height_cm,
            age_years,
            sex,
        })
    }

    /// Check the ranges the input form enforces (30-200 kg, 100-220 cm, 10-100 years)
    pub fn validate_ranges(&self) -> FuelResult<()> {
        if !(ranges::MIN_WEIGHT_KG..=ranges::MAX_WEIGHT_KG).contains(&self.weight_kg) {
            return Err(FuelError::invalid_input(format!(
                "weight {} kg outside {}-{} kg",
                self.weight_kg,
                ranges::MIN_WEIGHT_KG,
                ranges::MAX_WEIGHT_KG
            )));
        }
        if !(ranges::MIN_HEIGHT_CM..=ranges::MAX_HEIGHT_CM).contains(&self.height_cm) {
            return Err(FuelError::invalid_input(format!(
                "height {} cm outside {}-{} cm",
                self.height_cm,
                ranges::MIN_HEIGHT_CM,
                ranges::MAX_HEIGHT_CM
            )));
        }
        if !(ranges::MIN_AGE_YEARS..=ranges::MAX_AGE_YEARS).contains(&self.age_years) {
            return Err(FuelError::invalid_input(format!(
                "age {} outside {}-{} years",
                self.age_years,
                ranges::MIN_AGE_YEARS,
                ranges::MAX_AGE_YEARS
            )));
        }
        Ok(())
    }
}

/// Unchecked wire form of [`BodyMetrics`]
#[derive(Deserialize)]
struct RawBodyMetrics {
    weight_kg: f64,
    height_cm: u32,
    age_years: u32,
    sex: Sex,
}

impl TryFrom<RawBodyMetrics> for BodyMetrics {
    type Error = FuelError;

    fn try_from(raw: RawBodyMetrics) -> FuelResult<Self> {
        Self::new(raw.weight_kg, raw.height_cm, raw.age_years, raw.sex)
    }
}

/// Sports covered by the calorie factor table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Running,
    Cycling,
    Swimming,
    Triathlon,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 4] = [
        ActivityKind::Running,
        ActivityKind::Cycling,
        ActivityKind::Swimming,
        ActivityKind::Triathlon,
    ];

    /// Label family used by the reference dataset ("Running, 6 mph" etc.)
    pub fn reference_label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
            Self::Swimming => "Swimming",
            Self::Triathlon => "Triathlon",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
            Self::Swimming => "swimming",
            Self::Triathlon => "triathlon",
        };
        f.write_str(name)
    }
}

impl FromStr for ActivityKind {
    type Err = FuelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "running" | "run" | "laufen" => Ok(Self::Running),
            "cycling" | "ride" | "bike" | "radfahren" => Ok(Self::Cycling),
            "swimming" | "swim" | "schwimmen" => Ok(Self::Swimming),
            "triathlon" => Ok(Self::Triathlon),
            _ => Err(FuelError::UnknownActivity(s.trim().to_string())),
        }
    }
}

/// Coarse effort level applied to the per-sport burn rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Light,
    Moderate,
    Hard,
}

impl Intensity {
    pub const ALL: [Intensity; 3] = [Intensity::Light, Intensity::Moderate, Intensity::Hard];
}

impl FromStr for Intensity {
    type Err = FuelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" | "easy" | "leicht" => Ok(Self::Light),
            "moderate" | "medium" | "mittel" => Ok(Self::Moderate),
            "hard" | "hart" => Ok(Self::Hard),
            other => Err(FuelError::invalid_input(format!("unknown intensity: {other}"))),
        }
    }
}

/// A planned training session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySelection {
    pub kind: ActivityKind,
    pub intensity: Intensity,
    pub duration_minutes: f64,
    /// Planned distance; only the model-based calorie path reads it
    pub distance_km: Option<f64>,
}

impl ActivitySelection {
    pub fn new(kind: ActivityKind, intensity: Intensity, duration_minutes: f64) -> Self {
        Self {
            kind,
            intensity,
            duration_minutes,
            distance_km: None,
        }
    }

    pub fn with_distance(mut self, distance_km: f64) -> Self {
        self.distance_km = Some(distance_km);
        self
    }
}

/// Basal energy and fluid baseline for one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyResult {
    pub basal_kcal_per_day: f64,
    pub fluid_baseline_liters_per_day: f64,
}

/// Which computation produced a session's calorie figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergySource {
    /// Static kcal/kg/h factor table
    Formula,
    /// Trained regression model
    Model,
}

/// Energy and fluid demand of one training session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub session_kcal: f64,
    pub session_fluid_liters: f64,
    pub source: EnergySource,
    /// Recoverable problems met on the way (e.g. model fallback)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl SessionResult {
    pub fn formula(session_kcal: f64, session_fluid_liters: f64) -> Self {
        Self {
            session_kcal,
            session_fluid_liters,
            source: EnergySource::Formula,
            warnings: Vec::new(),
        }
    }
}

/// What to consume at a checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckpointKind {
    Eat,
    Drink,
    Both,
}

/// A single scheduled intake point during a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Minutes since the session started
    pub minute_offset: u32,
    pub kind: CheckpointKind,
    /// Calories to eat here, present for `Eat` and `Both`
    pub eat_kcal: Option<f64>,
    /// Fluid to drink here, present for `Drink` and `Both`
    pub drink_liters: Option<f64>,
}

/// Ordered intake checkpoints for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakePlan {
    pub duration_minutes: u32,
    pub eat_interval_minutes: u32,
    pub drink_interval_minutes: u32,
    pub checkpoints: Vec<Checkpoint>,
}

impl IntakePlan {
    pub fn total_eat_kcal(&self) -> f64 {
        self.checkpoints.iter().filter_map(|c| c.eat_kcal).sum()
    }

    pub fn total_drink_liters(&self) -> f64 {
        self.checkpoints.iter().filter_map(|c| c.drink_liters).sum()
    }

    pub fn eat_count(&self) -> usize {
        self.checkpoints.iter().filter(|c| c.eat_kcal.is_some()).count()
    }

    pub fn drink_count(&self) -> usize {
        self.checkpoints
            .iter()
            .filter(|c| c.drink_liters.is_some())
            .count()
    }

    /// Pair every checkpoint with its wall-clock time for a given start
    pub fn timed(&self, start: DateTime<Utc>) -> Vec<(DateTime<Utc>, &Checkpoint)> {
        self.checkpoints
            .iter()
            .map(|c| (start + Duration::minutes(i64::from(c.minute_offset)), c))
            .collect()
    }
}

/// A completed workout as reported by a tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasuredSession {
    pub duration_minutes: f64,
    pub distance_km: Option<f64>,
    /// Average heart rate in bpm
    pub avg_hr: Option<f64>,
    pub max_hr: Option<f64>,
    /// Calories reported by the tracker itself
    pub reported_kcal: Option<f64>,
}

/// Nutrition facts for one serving of a food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    /// kcal per serving
    pub calories: f64,
    pub serving_qty: f64,
    pub serving_unit: String,
}

/// One synthetic training example for the calorie predictor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    /// Free-text activity name from the reference dataset
    pub activity_label: String,
    pub weight_kg: f64,
    pub duration_minutes: f64,
    pub distance_km: f64,
    pub kcal_label: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_body_metrics_rejects_non_positive() {
        assert!(BodyMetrics::new(0.0, 175, 25, Sex::Male).is_err());
        assert!(BodyMetrics::new(-3.0, 175, 25, Sex::Male).is_err());
        assert!(BodyMetrics::new(70.0, 0, 25, Sex::Male).is_err());
        assert!(BodyMetrics::new(70.0, 175, 0, Sex::Male).is_err());
        assert!(BodyMetrics::new(70.0, 175, 25, Sex::Female).is_ok());
    }

    #[test]
    fn test_deserialized_metrics_are_checked() {
        let metrics: BodyMetrics = serde_json::from_str(
            r#"{"weight_kg": 70.0, "height_cm": 175, "age_years": 25, "sex": "female"}"#,
        )
        .unwrap();
        assert_eq!(metrics, BodyMetrics::new(70.0, 175, 25, Sex::Female).unwrap());

        let negative = serde_json::from_str::<BodyMetrics>(
            r#"{"weight_kg": -70.0, "height_cm": 175, "age_years": 25, "sex": "male"}"#,
        );
        assert!(negative.unwrap_err().to_string().contains("weight must be positive"));

        let ageless = serde_json::from_str::<BodyMetrics>(
            r#"{"weight_kg": 70.0, "height_cm": 175, "age_years": 0, "sex": "male"}"#,
        );
        assert!(ageless.is_err());
    }

    #[test]
    fn test_validate_ranges() {
        let ok = BodyMetrics::new(70.0, 175, 25, Sex::Other).unwrap();
        assert!(ok.validate_ranges().is_ok());

        let heavy = BodyMetrics::new(250.0, 175, 25, Sex::Male).unwrap();
        assert!(heavy.validate_ranges().is_err());

        let short = BodyMetrics::new(70.0, 90, 25, Sex::Male).unwrap();
        assert!(short.validate_ranges().is_err());
    }

    #[test]
    fn test_activity_kind_parsing() {
        assert_eq!("Running".parse::<ActivityKind>().unwrap(), ActivityKind::Running);
        assert_eq!("Radfahren".parse::<ActivityKind>().unwrap(), ActivityKind::Cycling);
        assert_eq!(" swim ".parse::<ActivityKind>().unwrap(), ActivityKind::Swimming);

        match "unicycling".parse::<ActivityKind>() {
            Err(FuelError::UnknownActivity(label)) => assert_eq!(label, "unicycling"),
            other => panic!("expected UnknownActivity, got {other:?}"),
        }
    }

    #[test]
    fn test_intensity_and_sex_parsing() {
        assert_eq!("Mittel".parse::<Intensity>().unwrap(), Intensity::Moderate);
        assert_eq!("hard".parse::<Intensity>().unwrap(), Intensity::Hard);
        assert!("brutal".parse::<Intensity>().is_err());
        assert_eq!("Divers".parse::<Sex>().unwrap(), Sex::Other);
    }

    #[test]
    fn test_timed_plan() {
        let plan = IntakePlan {
            duration_minutes: 30,
            eat_interval_minutes: 30,
            drink_interval_minutes: 15,
            checkpoints: vec![
                Checkpoint {
                    minute_offset: 15,
                    kind: CheckpointKind::Drink,
                    eat_kcal: None,
                    drink_liters: Some(0.175),
                },
                Checkpoint {
                    minute_offset: 30,
                    kind: CheckpointKind::Both,
                    eat_kcal: Some(300.0),
                    drink_liters: Some(0.175),
                },
            ],
        };

        let start = Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap();
        let timed = plan.timed(start);
        assert_eq!(timed[0].0, Utc.with_ymd_and_hms(2025, 5, 1, 8, 15, 0).unwrap());
        assert_eq!(timed[1].0, Utc.with_ymd_and_hms(2025, 5, 1, 8, 30, 0).unwrap());
        assert_eq!(plan.eat_count(), 1);
        assert_eq!(plan.drink_count(), 2);
    }
}
