// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Basal metabolic rate and daily fluid baseline
//!
//! # Formulas
//!
//! Harris-Benedict (1919):
//! - male: `66.47 + 13.7·w + 5.0·h − 6.8·a`
//! - female: `655.1 + 9.6·w + 1.8·h − 4.7·a`
//! - other: the two formulas averaged term by term
//!
//! Fluid baseline: 35 ml per kg body weight per day.

use crate::config::HarrisBenedictConfig;
use crate::errors::{FuelError, FuelResult};
use crate::models::{BodyMetrics, EnergyResult, Sex};
use tracing::debug;

/// Basal metabolic rate in kcal/day with the default coefficients
///
/// # Errors
///
/// Returns `InvalidInput` if weight, height or age is not positive
pub fn basal_kcal(weight_kg: f64, height_cm: u32, age_years: u32, sex: Sex) -> FuelResult<f64> {
    calculate_harris_benedict(
        weight_kg,
        height_cm,
        age_years,
        sex,
        &HarrisBenedictConfig::default(),
    )
}

/// Daily fluid baseline in liters with the default rate
pub fn fluid_baseline(weight_kg: f64) -> f64 {
    calculate_fluid_baseline(weight_kg, &HarrisBenedictConfig::default())
}

/// Basal metabolic rate using Harris-Benedict coefficients from `config`
///
/// # Errors
///
/// Returns `InvalidInput` if weight, height or age is not positive
pub fn calculate_harris_benedict(
    weight_kg: f64,
    height_cm: u32,
    age_years: u32,
    sex: Sex,
    config: &HarrisBenedictConfig,
) -> FuelResult<f64> {
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

    let coefficients = match sex {
        Sex::Male => config.male,
        Sex::Female => config.female,
        Sex::Other => config.male.midpoint(&config.female),
    };

    let bmr = coefficients.apply(weight_kg, f64::from(height_cm), f64::from(age_years));
    debug!(?sex, weight_kg, height_cm, age_years, bmr, "Computed basal metabolic rate");

    Ok(bmr)
}

/// Daily fluid baseline in liters: linear in body weight
pub fn calculate_fluid_baseline(weight_kg: f64, config: &HarrisBenedictConfig) -> f64 {
    weight_kg * config.fluid_liters_per_kg
}

/// Basal energy and fluid baseline with the default coefficients
///
/// # Errors
///
/// Returns `InvalidInput` if any metric is not positive
pub fn energy_for(metrics: &BodyMetrics) -> FuelResult<EnergyResult> {
    calculate_energy(metrics, &HarrisBenedictConfig::default())
}

/// Basal energy and fluid baseline for captured metrics
///
/// # Errors
///
/// Returns `InvalidInput` if any metric is not positive
pub fn calculate_energy(metrics: &BodyMetrics, config: &HarrisBenedictConfig) -> FuelResult<EnergyResult> {
    let basal_kcal_per_day = calculate_harris_benedict(
        metrics.weight_kg,
        metrics.height_cm,
        metrics.age_years,
        metrics.sex,
        config,
    )?;

    Ok(EnergyResult {
        basal_kcal_per_day,
        fluid_baseline_liters_per_day: calculate_fluid_baseline(metrics.weight_kg, config),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_male_formula() {
        let bmr = basal_kcal(70.0, 175, 25, Sex::Male).unwrap();
        // 66.47 + 959 + 875 - 170
        assert!((bmr - 1730.47).abs() < 1e-9);
    }

    #[test]
    fn test_female_formula() {
        let bmr = basal_kcal(70.0, 175, 25, Sex::Female).unwrap();
        // 655.1 + 672 + 315 - 117.5
        assert!((bmr - 1524.6).abs() < 1e-9);
    }

    #[test]
    fn test_other_is_term_average() {
        let male = basal_kcal(82.5, 181, 44, Sex::Male).unwrap();
        let female = basal_kcal(82.5, 181, 44, Sex::Female).unwrap();
        let other = basal_kcal(82.5, 181, 44, Sex::Other).unwrap();
        assert!((other - (male + female) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_non_positive_inputs() {
        assert!(matches!(
            basal_kcal(0.0, 175, 25, Sex::Male),
            Err(FuelError::InvalidInput(_))
        ));
        assert!(basal_kcal(70.0, 0, 25, Sex::Male).is_err());
        assert!(basal_kcal(70.0, 175, 0, Sex::Female).is_err());
        assert!(basal_kcal(f64::NAN, 175, 25, Sex::Other).is_err());
    }

    #[test]
    fn test_fluid_baseline() {
        assert!((fluid_baseline(70.0) - 2.45).abs() < 1e-12);
        assert!((fluid_baseline(140.0) - 2.0 * fluid_baseline(70.0)).abs() < 1e-12);
    }

    #[test]
    fn test_custom_coefficients() {
        let mut config = HarrisBenedictConfig::default();
        config.male.constant = 100.0;
        config.fluid_liters_per_kg = 0.04;

        let metrics = BodyMetrics::new(70.0, 175, 25, Sex::Male).unwrap();
        let result = calculate_energy(&metrics, &config).unwrap();
        assert!((result.basal_kcal_per_day - 1764.0).abs() < 1e-9);
        assert!((result.fluid_baseline_liters_per_day - 2.8).abs() < 1e-12);
    }
}
