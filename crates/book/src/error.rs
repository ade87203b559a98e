//! Error type for book operations.

use tally_core::journal::{JournalError, SubmitError};
use tally_core::workflow::WorkflowError;
use tally_shared::AppError;
use tally_shared::types::JournalEntryId;
use thiserror::Error;

/// Errors returned by the in-memory chart and journal book.
#[derive(Debug, Error)]
pub enum BookError {
    /// No stored entry has this id.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),

    /// No account has this code.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// The entry failed journal validation.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// The lifecycle does not allow the operation.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// The ledger rules refused the entry.
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

impl BookError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::Journal(err) => err.error_code(),
            Self::Workflow(err) => err.error_code(),
            Self::Submit(err) => err.error_code(),
        }
    }
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::EntryNotFound(_) | BookError::AccountNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            BookError::Journal(inner) => inner.into(),
            BookError::Workflow(inner) => inner.into(),
            BookError::Submit(inner) => JournalError::Submission(inner).into(),
        }
    }
}
