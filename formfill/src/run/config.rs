//! Run configuration and validation.

use std::num::NonZeroUsize;

use super::error::ConfigError;

/// Default concurrency for the document generation stage.
pub const DEFAULT_GENERATE_LIMIT: usize = 4;

/// Default concurrency for the file write stage.
pub const DEFAULT_WRITE_LIMIT: usize = 4;

/// What to do when generating or writing one item fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// The first item failure aborts the whole run.
    #[default]
    Abort,
    /// Item failures are counted and the item is dropped; the run continues.
    Skip,
}

/// Configuration for a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Max simultaneously unsettled document generations.
    pub concurrency_generate: usize,
    /// Max simultaneously unsettled file writes.
    pub concurrency_write: usize,
    pub error_policy: ErrorPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            concurrency_generate: DEFAULT_GENERATE_LIMIT,
            concurrency_write: DEFAULT_WRITE_LIMIT,
            error_policy: ErrorPolicy::default(),
        }
    }
}

impl RunConfig {
    /// Validates the concurrency limits, returning them as non-zero values.
    ///
    /// Fails fast before any work starts; a zero limit never reaches the
    /// stage primitives.
    pub fn validated_limits(&self) -> Result<(NonZeroUsize, NonZeroUsize), ConfigError> {
        let generate =
            NonZeroUsize::new(self.concurrency_generate).ok_or(ConfigError::InvalidLimit {
                stage: "generate",
                value: self.concurrency_generate,
            })?;
        let write = NonZeroUsize::new(self.concurrency_write).ok_or(ConfigError::InvalidLimit {
            stage: "write",
            value: self.concurrency_write,
        })?;
        Ok((generate, write))
    }
}
