// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Feature rows for the calorie predictor

use serde::{Deserialize, Serialize};

const ACTIVITY_PREFIX: &str = "activity=";

/// One-hot activity columns followed by the numeric passthrough columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEncoder {
    /// Known activity labels in column order
    pub activity_labels: Vec<String>,
    pub use_distance: bool,
}

impl FeatureEncoder {
    /// Encoder over the distinct labels, sorted
    pub fn fit<'a>(labels: impl IntoIterator<Item = &'a str>, use_distance: bool) -> Self {
        let mut activity_labels: Vec<String> = labels.into_iter().map(str::to_string).collect();
        activity_labels.sort();
        activity_labels.dedup();
        Self {
            activity_labels,
            use_distance,
        }
    }

    pub fn width(&self) -> usize {
        self.activity_labels.len() + if self.use_distance { 3 } else { 2 }
    }

    /// Column names in encoding order
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = self
            .activity_labels
            .iter()
            .map(|label| format!("{ACTIVITY_PREFIX}{label}"))
            .collect();
        columns.push("weight_kg".to_string());
        columns.push("duration_minutes".to_string());
        if self.use_distance {
            columns.push("distance_km".to_string());
        }
        columns
    }

    pub fn label_index(&self, label: &str) -> Option<usize> {
        self.activity_labels
            .binary_search_by(|known| known.as_str().cmp(label))
            .ok()
    }

    /// Feature row; an unseen label leaves every activity column at zero
    pub fn encode(&self, label: &str, weight_kg: f64, duration_minutes: f64, distance_km: f64) -> Vec<f64> {
        let mut row = vec![0.0; self.width()];
        if let Some(index) = self.label_index(label) {
            row[index] = 1.0;
        }

        let numeric = self.activity_labels.len();
        row[numeric] = weight_kg;
        row[numeric + 1] = duration_minutes;
        if self.use_distance {
            row[numeric + 2] = distance_km;
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_hot_layout() {
        let encoder = FeatureEncoder::fit(["Swimming laps", "Running, 6 mph", "Swimming laps"], true);

        assert_eq!(encoder.activity_labels.len(), 2);
        assert_eq!(
            encoder.columns(),
            vec![
                "activity=Running, 6 mph",
                "activity=Swimming laps",
                "weight_kg",
                "duration_minutes",
                "distance_km"
            ]
        );
        assert_eq!(encoder.encode("Swimming laps", 70.0, 60.0, 3.0), vec![0.0, 1.0, 70.0, 60.0, 3.0]);
    }

    #[test]
    fn test_unknown_label_is_all_zero() {
        let encoder = FeatureEncoder::fit(["Running, 6 mph"], false);
        assert_eq!(encoder.encode("Rowing", 80.0, 45.0, 9.0), vec![0.0, 80.0, 45.0]);
    }
}
