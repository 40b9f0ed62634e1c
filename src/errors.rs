// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error taxonomy for the planning core and the offline trainer
//!
//! Only [`FuelError::DatasetLoadFatal`] is meant to end a run. Every other
//! variant is either rejected input or something a caller recovers from
//! locally (model fallback, skipped dataset row).

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the library
pub type FuelResult<T> = Result<T, FuelError>;

#[derive(Debug, Error)]
pub enum FuelError {
    /// Non-positive or out-of-range body metrics, durations or intervals
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Activity label with no row in the factor table
    #[error("unknown activity: {0}")]
    UnknownActivity(String),

    /// Regression model missing, corrupt, or failing at predict time
    #[error("calorie model unavailable: {0}")]
    ModelUnavailable(String),

    /// External food or activity source could not answer
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Malformed row in the reference dataset
    #[error("skipping dataset line {line}: {reason}")]
    DatasetParseSkip { line: u64, reason: String },

    /// Reference dataset missing or unreadable
    #[error("cannot load reference dataset {}: {source}", path.display())]
    DatasetLoadFatal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FuelError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn model_unavailable(message: impl Into<String>) -> Self {
        Self::ModelUnavailable(message.into())
    }

    /// Whether the caller is expected to recover and continue
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ModelUnavailable(_)
                | Self::ProviderUnavailable(_)
                | Self::DatasetParseSkip { .. }
        )
    }
}
