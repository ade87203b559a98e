//! Workflow error types for the entry lifecycle.

use tally_shared::AppError;
use thiserror::Error;

use crate::workflow::types::EntryStatus;

/// Errors that can occur during lifecycle operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: EntryStatus,
        /// The attempted target status.
        to: EntryStatus,
    },

    /// The entry already has a reversing entry.
    #[error("Journal entry has already been reversed")]
    AlreadyReversed,

    /// Only drafts can be updated.
    #[error("Only draft journal entries can be updated (status: {0})")]
    CannotModify(EntryStatus),

    /// Only drafts can be deleted.
    #[error("Only draft journal entries can be deleted (status: {0})")]
    CannotDelete(EntryStatus),
}

impl WorkflowError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::AlreadyReversed => "ALREADY_REVERSED",
            Self::CannotModify(_) => "CANNOT_MODIFY",
            Self::CannotDelete(_) => "CANNOT_DELETE",
        }
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::AlreadyReversed => Self::Conflict(err.to_string()),
            _ => Self::BusinessRule(err.to_string()),
        }
    }
}
