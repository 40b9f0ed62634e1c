// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Environment-based file locations for the dataset and the persisted model

use crate::constants::env_config;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Reference dataset (CSV) read by the trainer
    pub dataset: PathBuf,
    /// Serialized calorie predictor
    pub model: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("sport-fuel-ml/exercise_dataset.csv"),
            model: PathBuf::from("models/calorie_predictor.json"),
        }
    }
}

impl PathsConfig {
    /// Replace paths with environment values where those are set
    pub fn apply_env_overrides(&mut self) {
        if let Ok(dataset) = env::var(env_config::DATASET_PATH_VAR) {
            self.dataset = PathBuf::from(dataset);
        }
        if let Ok(model) = env::var(env_config::MODEL_PATH_VAR) {
            self.model = PathBuf::from(model);
        }
    }
}

/// Load a `.env` file into the process environment
///
/// Without a path the file is searched from the working directory upwards.
/// Variables already set are left alone; a missing file is not an error.
pub fn load_env_file(path: Option<&Path>) {
    let loaded = match path {
        Some(path) => dotenv::from_path(path).map(|()| path.to_path_buf()),
        None => dotenv::dotenv(),
    };
    match loaded {
        Ok(file) => debug!("Loaded environment from {}", file.display()),
        Err(e) => debug!("No .env file loaded: {}", e),
    }
}
