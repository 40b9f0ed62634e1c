// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Reference burn-rate table reader
//!
//! Each row is a free-text activity name followed by five numbers: kcal/h
//! at 130, 155, 180 and 205 lb, then kcal per kg per hour. Names may contain
//! unquoted commas, so everything before the last five fields is the name.

use crate::constants::trainer::REFERENCE_NUMERIC_COLUMNS;
use crate::errors::{FuelError, FuelResult};
use crate::logging::AppLogger;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// One parsed reference row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceActivity {
    pub label: String,
    /// kcal per kg body weight per hour
    pub kcal_per_kg: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDataset {
    pub activities: Vec<ReferenceActivity>,
    /// Rows dropped as malformed
    pub skipped: usize,
}

impl ReferenceDataset {
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

/// Read the reference table from disk
///
/// # Errors
///
/// Returns `DatasetLoadFatal` if the file cannot be opened or read
pub fn load_reference_dataset(path: &Path) -> FuelResult<ReferenceDataset> {
    let file = File::open(path).map_err(|source| FuelError::DatasetLoadFatal {
        path: path.to_path_buf(),
        source,
    })?;

    let dataset = parse_reference_reader(file).map_err(|e| match e {
        FuelError::Io(source) => FuelError::DatasetLoadFatal {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;

    info!(
        "Loaded {} reference activities from {} ({} rows skipped)",
        dataset.len(),
        path.display(),
        dataset.skipped
    );
    Ok(dataset)
}

/// Parse a reference table; the first line is a header
///
/// # Errors
///
/// Returns `Io` when the underlying reader fails
pub fn parse_reference_reader<R: Read>(reader: R) -> FuelResult<ReferenceDataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut dataset = ReferenceDataset::default();
    let mut record = csv::StringRecord::new();

    loop {
        match csv_reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                let line = record.position().map_or(0, csv::Position::line);
                match parse_row(&record, line) {
                    Ok(activity) => dataset.activities.push(activity),
                    Err(FuelError::DatasetParseSkip { line, reason }) => {
                        AppLogger::log_dataset_skip(line, &reason);
                        dataset.skipped += 1;
                    }
                    Err(other) => return Err(other),
                }
            }
            Err(e) => {
                let line = e.position().map_or(0, csv::Position::line);
                match e.into_kind() {
                    csv::ErrorKind::Io(source) => return Err(FuelError::Io(source)),
                    kind => {
                        AppLogger::log_dataset_skip(line, &format!("{kind:?}"));
                        dataset.skipped += 1;
                    }
                }
            }
        }
    }

    Ok(dataset)
}

fn parse_row(record: &csv::StringRecord, line: u64) -> FuelResult<ReferenceActivity> {
    let skip = |reason: String| FuelError::DatasetParseSkip { line, reason };

    if record.len() <= REFERENCE_NUMERIC_COLUMNS {
        return Err(skip(format!(
            "expected a label and {REFERENCE_NUMERIC_COLUMNS} numbers, found {} fields",
            record.len()
        )));
    }

    let split = record.len() - REFERENCE_NUMERIC_COLUMNS;
    let fields: Vec<&str> = record.iter().collect();

    let label = fields[..split].join(",").trim().to_string();
    if label.is_empty() {
        return Err(skip("empty activity label".to_string()));
    }

    let mut numbers = [0.0_f64; REFERENCE_NUMERIC_COLUMNS];
    for (slot, raw) in numbers.iter_mut().zip(&fields[split..]) {
        *slot = raw
            .trim()
            .parse::<f64>()
            .map_err(|_| skip(format!("non-numeric value '{}'", raw.trim())))?;
    }

    let kcal_per_kg = numbers[REFERENCE_NUMERIC_COLUMNS - 1];
    if !kcal_per_kg.is_finite() || kcal_per_kg < 0.0 {
        return Err(skip(format!("invalid kcal per kg {kcal_per_kg}")));
    }

    Ok(ReferenceActivity { label, kcal_per_kg })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Activity, Exercise or Sport (1 hour),130 lb,155 lb,180 lb,205 lb,Calories per kg
\"Cycling, mountain bike, bmx\",502,598,695,791,1.75
Running, 6 mph (10 min mile),590,704,817,931,2.05
Swimming laps,413,493,572,651,1.44
Broken row,abc,1,2,3,4
Too short,1,2
";

    #[test]
    fn test_parses_quoted_and_unquoted_labels() {
        let dataset = parse_reference_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.skipped, 2);
        assert_eq!(dataset.activities[0].label, "Cycling, mountain bike, bmx");
        assert_eq!(dataset.activities[1].label, "Running, 6 mph (10 min mile)");
        assert_eq!(dataset.activities[1].kcal_per_kg, 2.05);
        assert_eq!(dataset.activities[2].label, "Swimming laps");
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = load_reference_dataset(Path::new("/nonexistent/exercise_dataset.csv")).unwrap_err();
        assert!(matches!(err, FuelError::DatasetLoadFatal { .. }));
        assert!(!err.is_recoverable());
    }
}
