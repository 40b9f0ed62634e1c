// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Offline training run: synthetic table, split, fit, evaluate

use super::dataset::ReferenceDataset;
use super::features::FeatureEncoder;
use super::forest::{ForestParams, RandomForest};
use super::model::TrainedModel;
use crate::config::TrainerConfig;
use crate::constants::units::MINUTES_PER_HOUR;
use crate::errors::{FuelError, FuelResult};
use crate::logging::AppLogger;
use crate::models::TrainingRecord;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Outcome of one training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    #[serde(skip)]
    pub model: TrainedModel,
    pub run_id: Uuid,
    pub trained_at: DateTime<Utc>,
    pub rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Held-out root mean squared error in kcal
    pub rmse: f64,
    pub skipped_rows: usize,
}

/// Expand every reference activity over the weight and duration grids
///
/// `kcal = duration · weight · kcal_per_kg / 60 · boost`, with the boost and
/// pace taken from the first family whose keyword occurs in the label.
pub fn synthesize(dataset: &ReferenceDataset, config: &TrainerConfig) -> Vec<TrainingRecord> {
    let weights = config.weights();
    let durations = config.durations();
    let mut records = Vec::with_capacity(dataset.len() * weights.len() * durations.len());

    for activity in &dataset.activities {
        let family = config.family_for(&activity.label);
        for &weight_kg in &weights {
            for &duration_minutes in &durations {
                records.push(TrainingRecord {
                    activity_label: activity.label.clone(),
                    weight_kg,
                    duration_minutes,
                    distance_km: duration_minutes * family.km_per_minute,
                    kcal_label: duration_minutes * weight_kg * activity.kcal_per_kg
                        / MINUTES_PER_HOUR
                        * family.boost,
                });
            }
        }
    }

    records
}

/// Shuffle with `seed` and hold out `ceil(test_fraction · n)` rows
///
/// # Errors
///
/// Returns `InvalidInput` if either side would be empty
pub fn train_test_split<T: Clone>(
    rows: &[T],
    test_fraction: f64,
    seed: u64,
) -> FuelResult<(Vec<T>, Vec<T>)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(FuelError::invalid_input(format!(
            "test fraction must be within (0, 1), got {test_fraction}"
        )));
    }

    let n_test = (test_fraction * rows.len() as f64).ceil() as usize;
    if n_test == 0 || n_test >= rows.len() {
        return Err(FuelError::invalid_input(format!(
            "cannot split {} rows with test fraction {test_fraction}",
            rows.len()
        )));
    }

    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.shuffle(&mut StdRng::seed_from_u64(seed));

    let test = order[..n_test].iter().map(|&i| rows[i].clone()).collect();
    let train = order[n_test..].iter().map(|&i| rows[i].clone()).collect();
    Ok((train, test))
}

/// Root mean squared error; `None` for empty or mismatched input
pub fn rmse(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    if actual.is_empty() || actual.len() != predicted.len() {
        return None;
    }
    let mse = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64;
    Some(mse.sqrt())
}

fn encode_rows(encoder: &FeatureEncoder, records: &[TrainingRecord]) -> (Vec<Vec<f64>>, Vec<f64>) {
    records
        .iter()
        .map(|r| {
            (
                encoder.encode(&r.activity_label, r.weight_kg, r.duration_minutes, r.distance_km),
                r.kcal_label,
            )
        })
        .unzip()
}

/// Train a calorie model on a reference table
///
/// # Errors
///
/// Returns `InvalidInput` when the table yields too few rows to split
pub fn train(dataset: &ReferenceDataset, config: &TrainerConfig) -> FuelResult<TrainingReport> {
    let run_id = Uuid::new_v4();
    let records = synthesize(dataset, config);
    if records.is_empty() {
        return Err(FuelError::invalid_input(
            "reference dataset produced no training rows",
        ));
    }
    info!(%run_id, rows = records.len(), "Synthesized training table");

    let (train_rows, test_rows) = train_test_split(&records, config.test_fraction, config.seed)?;

    let encoder = FeatureEncoder::fit(
        records.iter().map(|r| r.activity_label.as_str()),
        config.use_distance,
    );
    let (x_train, y_train) = encode_rows(&encoder, &train_rows);
    let (x_test, y_test) = encode_rows(&encoder, &test_rows);

    let params = ForestParams {
        n_estimators: config.n_estimators,
        max_depth: config.max_depth,
        min_samples_split: config.min_samples_split,
    };
    let forest = RandomForest::fit(&x_train, &y_train, &params, config.seed)?;

    let predictions = x_test
        .iter()
        .map(|row| forest.predict(row))
        .collect::<FuelResult<Vec<f64>>>()?;
    let rmse = rmse(&y_test, &predictions)
        .ok_or_else(|| FuelError::invalid_input("empty evaluation split"))?;

    let trained_at = Utc::now();
    let model = TrainedModel::new(
        encoder,
        forest,
        config.families.clone(),
        config.fallback_family.clone(),
        trained_at,
        rmse,
    );

    AppLogger::log_training_run(&run_id.to_string(), records.len(), rmse, dataset.skipped);

    Ok(TrainingReport {
        model,
        run_id,
        trained_at,
        rows: records.len(),
        train_rows: train_rows.len(),
        test_rows: test_rows.len(),
        rmse,
        skipped_rows: dataset.skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::dataset::ReferenceActivity;

    fn tiny_dataset() -> ReferenceDataset {
        ReferenceDataset {
            activities: vec![
                ReferenceActivity {
                    label: "Running, 6 mph".to_string(),
                    kcal_per_kg: 2.05,
                },
                ReferenceActivity {
                    label: "Rowing machine".to_string(),
                    kcal_per_kg: 1.0,
                },
            ],
            skipped: 1,
        }
    }

    #[test]
    fn test_synthesize_grid_and_labels() {
        let config = TrainerConfig::default();
        let records = synthesize(&tiny_dataset(), &config);
        assert_eq!(records.len(), 2 * 9 * 7);

        let first = &records[0];
        assert_eq!(first.weight_kg, 55.0);
        assert_eq!(first.duration_minutes, 30.0);
        assert!((first.distance_km - 3.0).abs() < 1e-12);
        assert!((first.kcal_label - 30.0 * 55.0 * 2.05 / 60.0 * 4.3).abs() < 1e-9);

        let rowing = records
            .iter()
            .find(|r| r.activity_label == "Rowing machine")
            .unwrap();
        assert!((rowing.kcal_label - 30.0 * 55.0 * 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_split_sizes_and_determinism() {
        let rows: Vec<u32> = (0..10).collect();
        let (train_a, test_a) = train_test_split(&rows, 0.2, 42).unwrap();
        let (train_b, test_b) = train_test_split(&rows, 0.2, 42).unwrap();

        assert_eq!(test_a.len(), 2);
        assert_eq!(train_a.len(), 8);
        assert_eq!((train_a, test_a), (train_b, test_b));
        assert!(train_test_split(&rows[..1], 0.2, 42).is_err());
    }

    #[test]
    fn test_rmse() {
        assert_eq!(rmse(&[1.0, 3.0], &[1.0, 3.0]), Some(0.0));
        assert_eq!(rmse(&[0.0, 0.0], &[3.0, 4.0]), Some(12.5_f64.sqrt()));
        assert_eq!(rmse(&[], &[]), None);
    }

    #[test]
    fn test_train_small_forest() {
        let config = TrainerConfig {
            n_estimators: 5,
            ..TrainerConfig::default()
        };
        let report = train(&tiny_dataset(), &config).unwrap();

        assert_eq!(report.rows, 126);
        assert_eq!(report.test_rows, 26);
        assert_eq!(report.train_rows, 100);
        assert_eq!(report.skipped_rows, 1);
        assert!(report.rmse.is_finite());
    }
}
