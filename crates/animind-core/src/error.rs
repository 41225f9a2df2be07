//! Engine and storage error types.
//!
//! Rejections (`EngineError::is_rejection`) are returned before any field of
//! the progress record or session has been touched.

use thiserror::Error;

/// Errors surfaced by the quiz engine, the lab and the progress facade.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An operation was invoked in a state that does not permit it.
    #[error("cannot {operation} while {state}")]
    InvalidStateTransition {
        operation: &'static str,
        state: String,
    },

    /// The selected option index does not exist on the current question.
    #[error("option {index} out of range (question has {options} options)")]
    OptionOutOfRange { index: usize, options: usize },

    /// Grades are numbered 1 through 5.
    #[error("invalid grade {0}, expected 1-5")]
    InvalidGrade(u8),

    /// The experiment id is not one the lab knows how to run.
    #[error("unknown experiment: {0}")]
    UnknownExperiment(String),

    /// The progress record could not be written or read.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Returns `true` if the caller simply called at the wrong time and the
    /// session can continue unchanged.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidStateTransition { .. } | EngineError::OptionOutOfRange { .. }
        )
    }
}

/// Failures of the durable progress storage.
///
/// A record that exists but cannot be parsed is not an error: stores replace
/// it with a fresh default record.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing medium failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The record could not be serialized.
    #[error("failed to serialize progress: {0}")]
    Serialize(#[from] serde_json::Error),
}
