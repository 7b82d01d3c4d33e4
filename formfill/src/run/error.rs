//! Error types for run orchestration.
//!
//! Item-level failures are always caught at the transform; under the skip
//! policy they become skip markers and never escape the stage. Under the
//! abort policy they surface here as [`ItemError`], wrapped into
//! [`RunError::Aborted`] by the controller.

use thiserror::Error;

use crate::fill::FillError;
use crate::write::WriteError;

/// Invalid run configuration, rejected before any work starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{stage} concurrency limit must be at least 1 (got {value})")]
    InvalidLimit { stage: &'static str, value: usize },

    #[error("range {start}..{end} is outside the candidate set 0..{total}")]
    InvalidRange {
        start: usize,
        end: usize,
        total: usize,
    },
}

/// An unrecovered per-item failure that aborted the pipeline.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("generating {name:?} failed: {source}")]
    Generation {
        name: String,
        #[source]
        source: FillError,
    },

    #[error("writing {name:?} failed: {source}")]
    Write {
        name: String,
        #[source]
        source: WriteError,
    },
}

impl ItemError {
    /// The output file name of the item that failed.
    pub fn item_name(&self) -> &str {
        match self {
            ItemError::Generation { name, .. } | ItemError::Write { name, .. } => name,
        }
    }
}

/// Errors surfaced to the caller of [`RunController::generate`].
///
/// [`RunController::generate`]: super::RunController::generate
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("a run is already in progress")]
    AlreadyRunning,

    /// The run terminated on the first unrecovered item failure.
    #[error("run aborted: {source}")]
    Aborted {
        #[source]
        source: ItemError,
    },

    /// The run was cancelled before consuming all candidates.
    #[error("run cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidLimit {
            stage: "generate",
            value: 0,
        };
        assert_eq!(
            err.to_string(),
            "generate concurrency limit must be at least 1 (got 0)"
        );

        let err = ConfigError::InvalidRange {
            start: 0,
            end: 9,
            total: 5,
        };
        assert_eq!(err.to_string(), "range 0..9 is outside the candidate set 0..5");
    }

    #[test]
    fn test_item_error_carries_name() {
        let err = ItemError::Generation {
            name: "3.pdf".to_string(),
            source: FillError::MissingColumn {
                column: "name".to_string(),
            },
        };
        assert_eq!(err.item_name(), "3.pdf");
        assert!(err.to_string().contains("3.pdf"));
    }
}
