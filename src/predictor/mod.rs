// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Calorie Predictor
//!
//! Offline training and runtime prediction of session calorie burn.
//!
//! The trainer reads a reference table of per-activity burn rates, expands it
//! into a synthetic table over a weight and duration grid, fits a random
//! forest regressor and writes it to a JSON file. At runtime the planner only
//! loads that file and calls [`CaloriePredictor::predict`].

pub mod dataset;
pub mod features;
pub mod forest;
pub mod model;
pub mod trainer;

use crate::errors::FuelResult;
use serde::{Deserialize, Serialize};

pub use dataset::{load_reference_dataset, parse_reference_reader, ReferenceActivity, ReferenceDataset};
pub use features::FeatureEncoder;
pub use forest::{ForestParams, Node, RandomForest, RegressionTree};
pub use model::TrainedModel;
pub use trainer::{rmse, synthesize, train, train_test_split, TrainingReport};

/// Features for one calorie prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    /// Activity label, either a full reference label or a family name like "Running"
    pub activity_label: String,
    pub weight_kg: f64,
    pub duration_minutes: f64,
    pub distance_km: Option<f64>,
}

impl PredictionInput {
    pub fn new(activity_label: impl Into<String>, weight_kg: f64, duration_minutes: f64) -> Self {
        Self {
            activity_label: activity_label.into(),
            weight_kg,
            duration_minutes,
            distance_km: None,
        }
    }

    pub fn with_distance(mut self, distance_km: Option<f64>) -> Self {
        self.distance_km = distance_km;
        self
    }
}

/// Anything that can estimate session calories from activity features
///
/// Errors are expected to be `ModelUnavailable`; callers fall back to the
/// factor table on any error.
pub trait CaloriePredictor: Send + Sync {
    fn predict(&self, input: &PredictionInput) -> FuelResult<f64>;

    fn name(&self) -> &'static str {
        "calorie_predictor"
    }
}
