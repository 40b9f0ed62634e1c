// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::{Context, Result};
use clap::Parser;
use sport_fuel_planner::config::PlannerConfig;
use sport_fuel_planner::logging::init_from_env;
use sport_fuel_planner::predictor::{load_reference_dataset, train};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "train-calorie-model")]
#[command(about = "Train the calorie predictor from a reference burn-rate table")]
#[command(version)]
struct Args {
    /// Reference dataset CSV (defaults to the configured path)
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Where to write the model JSON (defaults to the configured path)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Number of trees
    #[arg(long)]
    trees: Option<usize>,

    /// Random seed for the split and the bootstrap samples
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum tree depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Planner config file (TOML)
    #[arg(short, long)]
    config: Option<String>,
}

fn main() -> Result<()> {
    init_from_env()?;

    let args = Args::parse();
    let mut config = PlannerConfig::load(args.config)?;

    if let Some(trees) = args.trees {
        config.trainer.n_estimators = trees;
    }
    if let Some(seed) = args.seed {
        config.trainer.seed = seed;
    }
    if args.max_depth.is_some() {
        config.trainer.max_depth = args.max_depth;
    }
    config.validate()?;

    let dataset_path = args.dataset.unwrap_or_else(|| config.paths.dataset.clone());
    let output_path = args.output.unwrap_or_else(|| config.paths.model.clone());

    info!(
        "Training calorie model from {} ({} trees, seed {})",
        dataset_path.display(),
        config.trainer.n_estimators,
        config.trainer.seed
    );

    let dataset = match load_reference_dataset(&dataset_path) {
        Ok(dataset) => dataset,
        Err(e) => {
            error!("Training aborted: {}", e);
            return Err(e).context("Reference dataset unavailable");
        }
    };

    let report = train(&dataset, &config.trainer).context("Training failed")?;
    report
        .model
        .save(&output_path)
        .with_context(|| format!("Failed to write model to {}", output_path.display()))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    println!(
        "Model saved to {} (RMSE {:.2} kcal)",
        output_path.display(),
        report.rmse
    );

    Ok(())
}
