// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration management for the fuel planner

pub mod environment;
pub mod fitness_config;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub use environment::PathsConfig;
pub use fitness_config::{
    ActivityFactorsConfig, ActivityFamily, BmrCoefficients, CadenceConfig, HarrisBenedictConfig,
    IntensityFactors, TrainerConfig,
};

const LOCAL_CONFIG_FILE: &str = "sport_fuel.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub harris_benedict: HarrisBenedictConfig,
    pub activity: ActivityFactorsConfig,
    pub cadence: CadenceConfig,
    pub trainer: TrainerConfig,
    pub paths: PathsConfig,
}

impl PlannerConfig {
    /// Load from an explicit path, `./sport_fuel.toml`, the user config dir,
    /// or fall back to embedded defaults. Environment path overrides, including
    /// any `.env` file, apply last.
    pub fn load(path: Option<String>) -> Result<Self> {
        let mut config = match Self::resolve_path(path) {
            Some(config_path) => Self::load_from_file(&config_path)?,
            None => {
                debug!("No planner config file found, using defaults");
                Self::default()
            }
        };

        environment::load_env_file(None);
        config.paths.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read planner config file: {}", path.display()))?;

        let config: PlannerConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse planner config file: {}", path.display()))?;

        info!("Loaded planner config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write planner config: {}", path.display()))?;

        Ok(())
    }

    fn resolve_path(path: Option<String>) -> Option<PathBuf> {
        if let Some(explicit) = path {
            return Some(PathBuf::from(explicit));
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }

        dirs::config_dir()
            .map(|dir| dir.join("sport-fuel/config.toml"))
            .filter(|candidate| candidate.exists())
    }

    /// Reject values the formulas cannot work with
    pub fn validate(&self) -> Result<()> {
        let factors = [
            &self.activity.running,
            &self.activity.cycling,
            &self.activity.swimming,
            &self.activity.triathlon,
        ];
        for row in factors {
            if [row.light, row.moderate, row.hard].iter().any(|f| *f <= 0.0) {
                return Err(anyhow::anyhow!("Activity factors must be positive"));
            }
        }

        if self.activity.fluid_liters_per_hour < 0.0 || self.harris_benedict.fluid_liters_per_kg < 0.0 {
            return Err(anyhow::anyhow!("Fluid rates cannot be negative"));
        }

        if self.cadence.drink_interval == 0 || self.cadence.eat_interval_long == 0 {
            return Err(anyhow::anyhow!("Cadence intervals must be positive"));
        }
        if self.cadence.eat_tiers.iter().any(|(_, interval)| *interval == 0) {
            return Err(anyhow::anyhow!("Cadence tier intervals must be positive"));
        }
        if self
            .cadence
            .eat_tiers
            .windows(2)
            .any(|pair| pair[0].0 >= pair[1].0)
        {
            return Err(anyhow::anyhow!("Cadence tiers must be sorted by duration"));
        }

        if !(self.trainer.test_fraction > 0.0 && self.trainer.test_fraction < 1.0) {
            return Err(anyhow::anyhow!(
                "Trainer test_fraction must be between 0 and 1, got {}",
                self.trainer.test_fraction
            ));
        }
        if self.trainer.n_estimators == 0 {
            return Err(anyhow::anyhow!("Trainer needs at least one tree"));
        }

        Ok(())
    }
}
