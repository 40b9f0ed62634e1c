// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Integration tests for basal energy and session energy
//!
//! These tests exercise the public formula entry points and the model
//! fallback through `ActivityModel`.

use anyhow::Result;
use sport_fuel_planner::errors::{FuelError, FuelResult};
use sport_fuel_planner::intelligence::{
    basal_kcal, energy_for, fluid_baseline, session_energy, session_energy_for_label, ActivityModel,
};
use sport_fuel_planner::models::{
    ActivityKind, ActivitySelection, BodyMetrics, EnergySource, Intensity, Sex,
};
use sport_fuel_planner::predictor::{CaloriePredictor, PredictionInput};

/// Predictor that always fails, standing in for a broken model file
struct FailingPredictor;

impl CaloriePredictor for FailingPredictor {
    fn predict(&self, _input: &PredictionInput) -> FuelResult<f64> {
        Err(FuelError::model_unavailable("simulated predict failure"))
    }
}

#[test]
fn test_male_reference_athlete() -> Result<()> {
    let metrics = BodyMetrics::new(70.0, 175, 25, Sex::Male)?;
    let energy = energy_for(&metrics)?;

    // 66.47 + 13.7*70 + 5.0*175 - 6.8*25
    assert!((energy.basal_kcal_per_day - 1730.47).abs() < 1e-6);
    assert!((energy.fluid_baseline_liters_per_day - 2.45).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_female_reference_athlete() -> Result<()> {
    // 655.1 + 9.6*70 + 1.8*175 - 4.7*25
    let bmr = basal_kcal(70.0, 175, 25, Sex::Female)?;
    assert!((bmr - 1524.6).abs() < 1e-6);
    Ok(())
}

#[test]
fn test_sexes_differ_and_other_is_average() -> Result<()> {
    for (weight, height, age) in [(55.0, 160, 19), (70.0, 175, 25), (95.5, 198, 63)] {
        let male = basal_kcal(weight, height, age, Sex::Male)?;
        let female = basal_kcal(weight, height, age, Sex::Female)?;
        let other = basal_kcal(weight, height, age, Sex::Other)?;

        assert!((male - female).abs() > 1e-6);
        assert!((other - (male + female) / 2.0).abs() < 1e-9);
    }
    Ok(())
}

#[test]
fn test_fluid_baseline_is_linear() {
    for weight in [30.0, 62.5, 100.0] {
        assert!((fluid_baseline(2.0 * weight) - 2.0 * fluid_baseline(weight)).abs() < 1e-12);
    }
}

#[test]
fn test_invalid_metrics_rejected() {
    assert!(matches!(
        BodyMetrics::new(-70.0, 175, 25, Sex::Male),
        Err(FuelError::InvalidInput(_))
    ));
    assert!(basal_kcal(70.0, 0, 25, Sex::Male).is_err());
}

#[test]
fn test_moderate_hour_of_running() -> Result<()> {
    let session = session_energy(ActivityKind::Running, Intensity::Moderate, 60.0, 70.0)?;
    assert!((session.session_kcal - 630.0).abs() < 1e-9);
    assert!((session.session_fluid_liters - 0.7).abs() < 1e-9);
    assert_eq!(session.source, EnergySource::Formula);
    Ok(())
}

#[test]
fn test_zero_duration_for_every_activity() -> Result<()> {
    for kind in ActivityKind::ALL {
        for intensity in Intensity::ALL {
            let session = session_energy(kind, intensity, 0.0, 81.0)?;
            assert_eq!(session.session_kcal, 0.0);
            assert_eq!(session.session_fluid_liters, 0.0);
        }
    }
    Ok(())
}

#[test]
fn test_fluid_independent_of_intensity() -> Result<()> {
    for kind in ActivityKind::ALL {
        let light = session_energy(kind, Intensity::Light, 75.0, 68.0)?;
        let hard = session_energy(kind, Intensity::Hard, 75.0, 68.0)?;

        assert!(hard.session_kcal > light.session_kcal);
        assert_eq!(light.session_fluid_liters, hard.session_fluid_liters);
    }
    Ok(())
}

#[test]
fn test_unknown_activity_label() {
    match session_energy_for_label("unicycling", Intensity::Moderate, 60.0, 70.0) {
        Err(FuelError::UnknownActivity(label)) => assert_eq!(label, "unicycling"),
        other => panic!("expected UnknownActivity, got {other:?}"),
    }
}

#[test]
fn test_failing_model_falls_back_to_formula() -> Result<()> {
    let model = ActivityModel::default().with_predictor(Box::new(FailingPredictor));
    assert!(model.has_model());

    let selection = ActivitySelection::new(ActivityKind::Running, Intensity::Moderate, 60.0)
        .with_distance(10.0);
    let session = model.session_energy(&selection, 70.0)?;

    assert_eq!(session.source, EnergySource::Formula);
    assert!((session.session_kcal - 630.0).abs() < 1e-9);
    assert!((session.session_fluid_liters - 0.7).abs() < 1e-9);
    assert_eq!(session.warnings.len(), 1);
    assert!(session.warnings[0].contains("simulated predict failure"));
    Ok(())
}

#[test]
fn test_model_path_still_validates_inputs() {
    let model = ActivityModel::default().with_predictor(Box::new(FailingPredictor));
    let selection = ActivitySelection::new(ActivityKind::Cycling, Intensity::Hard, -10.0);
    assert!(matches!(
        model.session_energy(&selection, 70.0),
        Err(FuelError::InvalidInput(_))
    ));
}
