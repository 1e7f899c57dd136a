use common::SubmissionStatus;
use thiserror::Error;

use crate::store::StoreError;

/// Error returned by every core operation.
///
/// All failures are recovered at the service boundary and surfaced as typed
/// values; nothing in the engine panics or swallows a failed transition.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Insufficient role for this operation")]
    Forbidden,

    #[error("Operation requires phase {required} to be the current phase")]
    OutOfPhaseWindow { required: u8 },

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("Duplicate vote")]
    DuplicateVote,

    #[error("Submission already evaluated by this reviewer")]
    AlreadyEvaluated,

    #[error("Cannot transition submission from {from} to {to}")]
    InvalidTransition {
        from: SubmissionStatus,
        to: SubmissionStatus,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl WorkflowError {
    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::NotFound(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
