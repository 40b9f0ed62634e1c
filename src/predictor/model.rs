// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Persisted calorie model
//!
//! The JSON file carries the feature column names next to the forest. A
//! file whose recorded columns disagree with its encoder is rejected at load.

use super::features::FeatureEncoder;
use super::forest::RandomForest;
use super::{CaloriePredictor, PredictionInput};
use crate::config::ActivityFamily;
use crate::errors::{FuelError, FuelResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    pub feature_columns: Vec<String>,
    pub encoder: FeatureEncoder,
    pub forest: RandomForest,
    /// Pace assumptions used to fill a missing distance
    pub families: Vec<ActivityFamily>,
    pub fallback_family: ActivityFamily,
    pub trained_at: DateTime<Utc>,
    /// Held-out RMSE at training time, kcal
    pub rmse: f64,
}

impl TrainedModel {
    pub fn new(
        encoder: FeatureEncoder,
        forest: RandomForest,
        families: Vec<ActivityFamily>,
        fallback_family: ActivityFamily,
        trained_at: DateTime<Utc>,
        rmse: f64,
    ) -> Self {
        Self {
            feature_columns: encoder.columns(),
            encoder,
            forest,
            families,
            fallback_family,
            trained_at,
            rmse,
        }
    }

    /// Write the model as JSON, creating parent directories and replacing any old file
    pub fn save(&self, path: &Path) -> FuelResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        info!("Saved calorie model to {}", path.display());
        Ok(())
    }

    /// Read and validate a model file
    ///
    /// # Errors
    ///
    /// Returns `ModelUnavailable` for a missing, unparsable or inconsistent file
    pub fn load(path: &Path) -> FuelResult<Self> {
        let file = File::open(path).map_err(|e| {
            FuelError::model_unavailable(format!("cannot open {}: {e}", path.display()))
        })?;
        let model: Self = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            FuelError::model_unavailable(format!("cannot parse {}: {e}", path.display()))
        })?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> FuelResult<()> {
        if self.feature_columns != self.encoder.columns() {
            return Err(FuelError::model_unavailable(
                "recorded feature columns do not match the encoder",
            ));
        }
        if self.forest.n_features != self.feature_columns.len() {
            return Err(FuelError::model_unavailable(format!(
                "forest expects {} features, model records {}",
                self.forest.n_features,
                self.feature_columns.len()
            )));
        }
        if self.forest.trees.is_empty() {
            return Err(FuelError::model_unavailable("forest has no trees"));
        }
        for tree in &self.forest.trees {
            tree.validate(self.forest.n_features)?;
        }
        Ok(())
    }

    fn family_for(&self, label: &str) -> &ActivityFamily {
        self.families
            .iter()
            .find(|family| label.contains(&family.keyword))
            .unwrap_or(&self.fallback_family)
    }

    /// Trained labels a runtime label stands for
    ///
    /// An exact label wins; otherwise every trained label containing the
    /// runtime label (case-insensitive) is used.
    pub fn resolve_labels(&self, label: &str) -> Vec<&str> {
        let label = label.trim();
        if let Some(index) = self.encoder.label_index(label) {
            return vec![self.encoder.activity_labels[index].as_str()];
        }

        let needle = label.to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.encoder
            .activity_labels
            .iter()
            .filter(|known| known.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    fn predict_label(&self, label: &str, input: &PredictionInput) -> FuelResult<f64> {
        let distance_km = input
            .distance_km
            .unwrap_or_else(|| input.duration_minutes * self.family_for(label).km_per_minute);
        let row = self
            .encoder
            .encode(label, input.weight_kg, input.duration_minutes, distance_km);
        self.forest.predict(&row)
    }
}

impl CaloriePredictor for TrainedModel {
    fn predict(&self, input: &PredictionInput) -> FuelResult<f64> {
        if !input.weight_kg.is_finite() || input.weight_kg <= 0.0 {
            return Err(FuelError::invalid_input(format!(
                "weight must be positive, got {}",
                input.weight_kg
            )));
        }
        if !input.duration_minutes.is_finite() || input.duration_minutes < 0.0 {
            return Err(FuelError::invalid_input(format!(
                "duration must be non-negative, got {}",
                input.duration_minutes
            )));
        }

        let labels = self.resolve_labels(&input.activity_label);
        if labels.is_empty() {
            return Err(FuelError::model_unavailable(format!(
                "no trained activity matches '{}'",
                input.activity_label
            )));
        }

        let mut total = 0.0;
        for label in &labels {
            total += self.predict_label(label, input)?;
        }
        let kcal = total / labels.len() as f64;

        debug!(
            activity = %input.activity_label,
            matched_labels = labels.len(),
            kcal,
            "Model prediction"
        );
        Ok(kcal)
    }

    fn name(&self) -> &'static str {
        "random_forest"
    }
}
