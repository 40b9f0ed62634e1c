// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Session calorie burn and fluid loss
//!
//! Two paths produce the calorie figure:
//! - formula: `factor(activity, intensity) · weight · hours`
//! - model: a trained [`CaloriePredictor`], falling back to the formula on any error
//!
//! Fluid loss always uses the flat per-hour rate.

use crate::config::ActivityFactorsConfig;
use crate::constants::units::MINUTES_PER_HOUR;
use crate::errors::{FuelError, FuelResult};
use crate::logging::AppLogger;
use crate::models::{ActivityKind, ActivitySelection, EnergySource, Intensity, SessionResult};
use crate::predictor::{CaloriePredictor, PredictionInput, TrainedModel};
use std::path::Path;
use tracing::{debug, info, warn};

/// Formula-path session energy with the default factor table
///
/// # Errors
///
/// Returns `InvalidInput` for negative or non-finite duration, or non-positive weight
pub fn session_energy(
    kind: ActivityKind,
    intensity: Intensity,
    duration_minutes: f64,
    weight_kg: f64,
) -> FuelResult<SessionResult> {
    calculate_session_energy(
        kind,
        intensity,
        duration_minutes,
        weight_kg,
        &ActivityFactorsConfig::default(),
    )
}

/// Formula-path session energy for a free-text activity label
///
/// # Errors
///
/// Returns `UnknownActivity` for labels outside the factor table
pub fn session_energy_for_label(
    label: &str,
    intensity: Intensity,
    duration_minutes: f64,
    weight_kg: f64,
) -> FuelResult<SessionResult> {
    let kind: ActivityKind = label.parse()?;
    session_energy(kind, intensity, duration_minutes, weight_kg)
}

/// Formula-path session energy using `factors`
///
/// # Errors
///
/// Returns `InvalidInput` for negative or non-finite duration, or non-positive weight
pub fn calculate_session_energy(
    kind: ActivityKind,
    intensity: Intensity,
    duration_minutes: f64,
    weight_kg: f64,
    factors: &ActivityFactorsConfig,
) -> FuelResult<SessionResult> {
    validate_duration(duration_minutes)?;
    if duration_minutes == 0.0 {
        return Ok(SessionResult::formula(0.0, 0.0));
    }
    validate_weight(weight_kg)?;

    let hours = duration_minutes / MINUTES_PER_HOUR;
    let factor = factors.factor(kind, intensity);
    let session_kcal = factor * weight_kg * hours;
    let session_fluid_liters = session_fluid(duration_minutes, factors);

    debug!(
        activity = %kind,
        ?intensity,
        factor,
        duration_minutes,
        session_kcal,
        "Computed session energy from factor table"
    );

    Ok(SessionResult::formula(session_kcal, session_fluid_liters))
}

fn session_fluid(duration_minutes: f64, factors: &ActivityFactorsConfig) -> f64 {
    factors.fluid_liters_per_hour * duration_minutes / MINUTES_PER_HOUR
}

fn validate_duration(duration_minutes: f64) -> FuelResult<()> {
    if !duration_minutes.is_finite() || duration_minutes < 0.0 {
        return Err(FuelError::invalid_input(format!(
            "duration must be a non-negative number of minutes, got {duration_minutes}"
        )));
    }
    Ok(())
}

fn validate_weight(weight_kg: f64) -> FuelResult<()> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(FuelError::invalid_input(format!(
            "weight must be positive, got {weight_kg}"
        )));
    }
    Ok(())
}

/// Session energy with an optional trained predictor in front of the factor table
pub struct ActivityModel {
    factors: ActivityFactorsConfig,
    predictor: Option<Box<dyn CaloriePredictor>>,
    /// Why a requested model could not be loaded
    unavailable: Option<String>,
}

impl ActivityModel {
    /// Formula-only model
    pub fn new(factors: ActivityFactorsConfig) -> Self {
        Self {
            factors,
            predictor: None,
            unavailable: None,
        }
    }

    pub fn with_predictor(mut self, predictor: Box<dyn CaloriePredictor>) -> Self {
        self.predictor = Some(predictor);
        self.unavailable = None;
        self
    }

    /// Load a persisted model; a missing or corrupt file leaves the formula path only
    ///
    /// The load failure is repeated as a warning on every session result.
    pub fn load_with_model(factors: ActivityFactorsConfig, model_path: &Path) -> Self {
        match TrainedModel::load(model_path) {
            Ok(model) => {
                info!("Loaded calorie model from {}", model_path.display());
                Self::new(factors).with_predictor(Box::new(model))
            }
            Err(e) => {
                warn!(
                    "Calorie model at {} unavailable, using factor table: {}",
                    model_path.display(),
                    e
                );
                Self {
                    unavailable: Some(e.to_string()),
                    ..Self::new(factors)
                }
            }
        }
    }

    pub fn has_model(&self) -> bool {
        self.predictor.is_some()
    }

    /// Session energy, preferring the predictor when one is loaded
    ///
    /// Model failures never surface as errors: the factor table result is
    /// returned with a warning attached.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for negative duration or non-positive weight
    pub fn session_energy(&self, selection: &ActivitySelection, weight_kg: f64) -> FuelResult<SessionResult> {
        let formula = calculate_session_energy(
            selection.kind,
            selection.intensity,
            selection.duration_minutes,
            weight_kg,
            &self.factors,
        )?;

        if selection.duration_minutes == 0.0 {
            return Ok(formula);
        }

        let Some(predictor) = &self.predictor else {
            let mut result = formula;
            if let Some(reason) = &self.unavailable {
                result
                    .warnings
                    .push(format!("model not loaded, factor table used: {reason}"));
            }
            return Ok(result);
        };

        let input = PredictionInput::new(
            selection.kind.reference_label(),
            weight_kg,
            selection.duration_minutes,
        )
        .with_distance(selection.distance_km);

        let outcome = predictor.predict(&input).and_then(|kcal| {
            if kcal.is_finite() && kcal >= 0.0 {
                Ok(kcal)
            } else {
                Err(FuelError::model_unavailable(format!(
                    "predictor returned {kcal}"
                )))
            }
        });

        match outcome {
            Ok(session_kcal) => {
                debug!(
                    activity = %selection.kind,
                    predictor = predictor.name(),
                    session_kcal,
                    "Computed session energy from model"
                );
                Ok(SessionResult {
                    session_kcal,
                    session_fluid_liters: formula.session_fluid_liters,
                    source: EnergySource::Model,
                    warnings: Vec::new(),
                })
            }
            Err(e) => {
                let reason = e.to_string();
                AppLogger::log_model_fallback(selection.kind.reference_label(), &reason);
                let mut result = formula;
                result
                    .warnings
                    .push(format!("model path failed, factor table used: {reason}"));
                Ok(result)
            }
        }
    }
}

impl Default for ActivityModel {
    fn default() -> Self {
        Self::new(ActivityFactorsConfig::default())
    }
}
