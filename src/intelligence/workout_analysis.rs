// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Post-workout analysis: measured burn and sweat loss against the plan
//!
//! Heart-rate calories use Keytel et al. (2005):
//! `kcal/min = (a·HR + b·weight + c·age + d) / 4.184`

use crate::constants::{hydration, units};
use crate::errors::{FuelError, FuelResult};
use crate::models::{BodyMetrics, MeasuredSession, SessionResult, Sex};
use crate::providers::ActivityImportProvider;
use serde::{Deserialize, Serialize};
use tracing::debug;

struct KeytelCoefficients {
    heart_rate: f64,
    weight: f64,
    age: f64,
    constant: f64,
}

const KEYTEL_MALE: KeytelCoefficients = KeytelCoefficients {
    heart_rate: 0.6309,
    weight: 0.1988,
    age: 0.2017,
    constant: -55.0969,
};

const KEYTEL_FEMALE: KeytelCoefficients = KeytelCoefficients {
    heart_rate: 0.4472,
    weight: 0.1263,
    age: 0.0740,
    constant: -20.4022,
};

impl KeytelCoefficients {
    fn kcal_per_minute(&self, avg_hr: f64, weight_kg: f64, age_years: f64) -> f64 {
        (self.heart_rate * avg_hr + self.weight * weight_kg + self.age * age_years + self.constant)
            / units::KJ_PER_KCAL
    }
}

/// Heart-rate based calorie estimate for a session, clamped at zero
///
/// # Errors
///
/// Returns `InvalidInput` for non-positive heart rate or weight, or negative duration
pub fn keytel_kcal(
    avg_hr: f64,
    weight_kg: f64,
    age_years: u32,
    sex: Sex,
    duration_minutes: f64,
) -> FuelResult<f64> {
    if !avg_hr.is_finite() || avg_hr <= 0.0 {
        return Err(FuelError::invalid_input(format!(
            "average heart rate must be positive, got {avg_hr}"
        )));
    }
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(FuelError::invalid_input(format!(
            "weight must be positive, got {weight_kg}"
        )));
    }
    if !duration_minutes.is_finite() || duration_minutes < 0.0 {
        return Err(FuelError::invalid_input(format!(
            "duration must be non-negative, got {duration_minutes}"
        )));
    }

    let age = f64::from(age_years);
    let per_minute = match sex {
        Sex::Male => KEYTEL_MALE.kcal_per_minute(avg_hr, weight_kg, age),
        Sex::Female => KEYTEL_FEMALE.kcal_per_minute(avg_hr, weight_kg, age),
        Sex::Other => {
            (KEYTEL_MALE.kcal_per_minute(avg_hr, weight_kg, age)
                + KEYTEL_FEMALE.kcal_per_minute(avg_hr, weight_kg, age))
                / 2.0
        }
    };

    // Low heart rates drive the regression negative
    Ok((per_minute * duration_minutes).max(0.0))
}

/// Sweat loss in liters from total energy turnover
///
/// `None` when the duration is not positive.
pub fn sweat_loss_liters(total_kcal: f64, duration_hours: f64) -> Option<f64> {
    if !duration_hours.is_finite() || duration_hours <= 0.0 || !total_kcal.is_finite() {
        return None;
    }
    let kcal_per_hour = total_kcal / duration_hours;
    Some(hydration::SWEAT_LITERS_PER_KCAL * kcal_per_hour * duration_hours)
}

/// Where a measured calorie figure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementSource {
    HeartRate,
    Device,
}

/// Measured session next to its plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutComparison {
    pub measured_kcal: Option<f64>,
    pub measurement_source: Option<MeasurementSource>,
    pub measured_fluid_liters: Option<f64>,
    pub device_kcal: Option<f64>,
    pub planned_kcal: Option<f64>,
    pub planned_fluid_liters: Option<f64>,
    /// measured minus planned
    pub kcal_delta: Option<f64>,
    pub fluid_delta_liters: Option<f64>,
}

/// Compare a recorded workout with the planned session
///
/// Heart rate is preferred for the measured burn; the device figure is used
/// when no heart rate was recorded.
///
/// # Errors
///
/// Returns `InvalidInput` when the recorded duration is negative
pub fn compare_with_plan(
    session: &MeasuredSession,
    metrics: &BodyMetrics,
    planned: Option<&SessionResult>,
) -> FuelResult<WorkoutComparison> {
    if !session.duration_minutes.is_finite() || session.duration_minutes < 0.0 {
        return Err(FuelError::invalid_input(format!(
            "recorded duration must be non-negative, got {}",
            session.duration_minutes
        )));
    }

    let heart_rate_kcal = match session.avg_hr {
        Some(hr) if hr > 0.0 => Some(keytel_kcal(
            hr,
            metrics.weight_kg,
            metrics.age_years,
            metrics.sex,
            session.duration_minutes,
        )?),
        _ => None,
    };

    let (measured_kcal, measurement_source) = match (heart_rate_kcal, session.reported_kcal) {
        (Some(kcal), _) => (Some(kcal), Some(MeasurementSource::HeartRate)),
        (None, Some(kcal)) => (Some(kcal), Some(MeasurementSource::Device)),
        (None, None) => (None, None),
    };

    let duration_hours = session.duration_minutes / units::MINUTES_PER_HOUR;
    let measured_fluid_liters = measured_kcal.and_then(|kcal| sweat_loss_liters(kcal, duration_hours));

    let planned_kcal = planned.map(|p| p.session_kcal);
    let planned_fluid_liters = planned.map(|p| p.session_fluid_liters);

    let comparison = WorkoutComparison {
        measured_kcal,
        measurement_source,
        measured_fluid_liters,
        device_kcal: session.reported_kcal,
        planned_kcal,
        planned_fluid_liters,
        kcal_delta: measured_kcal.zip(planned_kcal).map(|(m, p)| m - p),
        fluid_delta_liters: measured_fluid_liters
            .zip(planned_fluid_liters)
            .map(|(m, p)| m - p),
    };

    debug!(?comparison, "Compared workout with plan");
    Ok(comparison)
}

/// Fetch a recorded workout from a provider and compare it with the plan
///
/// # Errors
///
/// Propagates provider errors and `InvalidInput` from the comparison
pub async fn analyze_import(
    provider: &dyn ActivityImportProvider,
    session_id: &str,
    metrics: &BodyMetrics,
    planned: Option<&SessionResult>,
) -> FuelResult<WorkoutComparison> {
    let session = provider.fetch_session(session_id).await?;
    debug!(
        provider = provider.provider_name(),
        session_id, "Imported recorded session"
    );
    compare_with_plan(&session, metrics, planned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(sex: Sex) -> BodyMetrics {
        BodyMetrics::new(70.0, 175, 30, sex).unwrap()
    }

    #[test]
    fn test_keytel_male() {
        let kcal = keytel_kcal(150.0, 70.0, 30, Sex::Male, 60.0).unwrap();
        let expected = (0.6309 * 150.0 + 0.1988 * 70.0 + 0.2017 * 30.0 - 55.0969) / 4.184 * 60.0;
        assert!((kcal - expected).abs() < 1e-9);
    }

    #[test]
    fn test_keytel_other_is_mean() {
        let male = keytel_kcal(140.0, 65.0, 40, Sex::Male, 45.0).unwrap();
        let female = keytel_kcal(140.0, 65.0, 40, Sex::Female, 45.0).unwrap();
        let other = keytel_kcal(140.0, 65.0, 40, Sex::Other, 45.0).unwrap();
        assert!((other - (male + female) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_keytel_clamps_low_heart_rate() {
        assert_eq!(keytel_kcal(40.0, 50.0, 20, Sex::Male, 30.0).unwrap(), 0.0);
        assert!(keytel_kcal(0.0, 70.0, 30, Sex::Male, 30.0).is_err());
    }

    #[test]
    fn test_sweat_loss() {
        let liters = sweat_loss_liters(600.0, 1.0).unwrap();
        assert!((liters - 0.828).abs() < 1e-12);
        assert!(sweat_loss_liters(600.0, 0.0).is_none());
    }

    #[test]
    fn test_compare_prefers_heart_rate() {
        let session = MeasuredSession {
            duration_minutes: 60.0,
            distance_km: Some(10.0),
            avg_hr: Some(150.0),
            max_hr: Some(175.0),
            reported_kcal: Some(700.0),
        };
        let planned = SessionResult::formula(630.0, 0.7);
        let comparison = compare_with_plan(&session, &metrics(Sex::Male), Some(&planned)).unwrap();

        assert_eq!(comparison.measurement_source, Some(MeasurementSource::HeartRate));
        assert_eq!(comparison.device_kcal, Some(700.0));
        let measured = comparison.measured_kcal.unwrap();
        assert!((comparison.kcal_delta.unwrap() - (measured - 630.0)).abs() < 1e-9);
        assert!(comparison.fluid_delta_liters.is_some());
    }

    #[test]
    fn test_compare_uses_device_without_heart_rate() {
        let session = MeasuredSession {
            duration_minutes: 30.0,
            distance_km: None,
            avg_hr: None,
            max_hr: None,
            reported_kcal: Some(300.0),
        };
        let comparison = compare_with_plan(&session, &metrics(Sex::Female), None).unwrap();
        assert_eq!(comparison.measurement_source, Some(MeasurementSource::Device));
        assert_eq!(comparison.measured_kcal, Some(300.0));
        assert!(comparison.kcal_delta.is_none());
    }
}
