//! Journal error types for editing and validation.
//!
//! Every rejection the editor can produce is a variant here. The four
//! validation families are structural (line count, unknown line),
//! missing account, imbalance, and missing header field.

use rust_decimal::Decimal;
use tally_shared::AppError;
use tally_shared::types::{JournalLineId, MAX_AMOUNT, within_limit};
use thiserror::Error;

use super::ports::{LookupError, SubmitError};

/// Header fields required before posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    /// Entry date.
    Date,
    /// Entry description.
    Description,
}

impl std::fmt::Display for HeaderField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Date => write!(f, "date"),
            Self::Description => write!(f, "description"),
        }
    }
}

/// Error family, used by hosts to pick a presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Line count or line identity problems.
    Structural,
    /// Lines without an account.
    MissingAccount,
    /// Debits and credits differ.
    Imbalance,
    /// Required header field absent.
    MissingHeaderField,
    /// Auto-balance needs the user to confirm first.
    Confirmation,
    /// A collaborator refused or failed.
    Collaborator,
}

/// Errors that can occur while editing, validating, or saving an entry.
#[derive(Debug, Error)]
pub enum JournalError {
    // ========== Structural Errors ==========
    /// The operation would leave fewer lines than the minimum.
    #[error("A journal entry must have at least {minimum} lines (would have {actual})")]
    TooFewLines {
        /// Minimum number of lines.
        minimum: usize,
        /// Line count the operation would produce.
        actual: usize,
    },

    /// No line with this id exists in the entry.
    #[error("Journal line not found: {0}")]
    LineNotFound(JournalLineId),

    /// A reorder target is outside `1..=N`.
    #[error("Line position {position} is outside 1..={len}")]
    InvalidPosition {
        /// Requested 1-based position.
        position: usize,
        /// Number of lines.
        len: usize,
    },

    /// A stored line carries a negative amount or both a debit and a credit.
    #[error("Line {line_number} must carry a non-negative debit or credit, not both")]
    InvalidLineAmounts {
        /// Offending line number.
        line_number: usize,
    },

    /// An amount exceeds the per-line ceiling.
    #[error("Amount {amount} on line {line_number} exceeds the maximum of {maximum}")]
    AmountTooLarge {
        /// Offending line number.
        line_number: usize,
        /// The rejected amount.
        amount: Decimal,
        /// The ceiling.
        maximum: Decimal,
    },

    // ========== Account Errors ==========
    /// One or more lines lack an account.
    #[error("All lines must have an account selected (missing on lines {line_numbers:?})")]
    MissingAccount {
        /// Line numbers without an account.
        line_numbers: Vec<usize>,
    },

    // ========== Balance Errors ==========
    /// Debits and credits differ by more than the tolerance.
    #[error(
        "Entry is not balanced. Debit: {debit}, Credit: {credit}, Difference: {difference}"
    )]
    Unbalanced {
        /// Total debits.
        debit: Decimal,
        /// Total credits.
        credit: Decimal,
        /// `debit - credit`.
        difference: Decimal,
    },

    // ========== Header Errors ==========
    /// A required header field is absent or blank.
    #[error("Journal entry {0} is required")]
    MissingHeaderField(HeaderField),

    // ========== Auto-Balance Errors ==========
    /// Auto-balance would overwrite a line that already holds an amount.
    #[error("Auto-balance would overwrite the amount on line {line_number}; confirmation required")]
    ConfirmationRequired {
        /// The line that would absorb the difference.
        line_number: usize,
    },

    // ========== Collaborator Errors ==========
    /// The ledger refused or failed to store the entry.
    #[error("Ledger submission failed: {0}")]
    Submission(#[from] SubmitError),

    /// The chart of accounts could not be searched.
    #[error("Account lookup failed: {0}")]
    Lookup(#[from] LookupError),
}

impl JournalError {
    /// Rejects `amount` on `line_number` if it exceeds [`MAX_AMOUNT`].
    pub(crate) fn check_amount(line_number: usize, amount: Decimal) -> Result<(), Self> {
        if within_limit(amount) {
            Ok(())
        } else {
            Err(Self::AmountTooLarge {
                line_number,
                amount,
                maximum: MAX_AMOUNT,
            })
        }
    }

    /// Returns the error code for display and logging.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TooFewLines { .. } => "TOO_FEW_LINES",
            Self::LineNotFound(_) => "LINE_NOT_FOUND",
            Self::InvalidPosition { .. } => "INVALID_POSITION",
            Self::InvalidLineAmounts { .. } => "INVALID_LINE_AMOUNTS",
            Self::AmountTooLarge { .. } => "AMOUNT_TOO_LARGE",
            Self::MissingAccount { .. } => "MISSING_ACCOUNT",
            Self::Unbalanced { .. } => "UNBALANCED_ENTRY",
            Self::MissingHeaderField(HeaderField::Date) => "MISSING_DATE",
            Self::MissingHeaderField(HeaderField::Description) => "MISSING_DESCRIPTION",
            Self::ConfirmationRequired { .. } => "CONFIRMATION_REQUIRED",
            Self::Submission(err) => err.error_code(),
            Self::Lookup(_) => "ACCOUNT_LOOKUP_FAILED",
        }
    }

    /// Returns the error family.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TooFewLines { .. }
            | Self::LineNotFound(_)
            | Self::InvalidPosition { .. }
            | Self::InvalidLineAmounts { .. }
            | Self::AmountTooLarge { .. } => ErrorCategory::Structural,
            Self::MissingAccount { .. } => ErrorCategory::MissingAccount,
            Self::Unbalanced { .. } => ErrorCategory::Imbalance,
            Self::MissingHeaderField(_) => ErrorCategory::MissingHeaderField,
            Self::ConfirmationRequired { .. } => ErrorCategory::Confirmation,
            Self::Submission(_) | Self::Lookup(_) => ErrorCategory::Collaborator,
        }
    }

    /// Returns true if the entry may still be saved as a draft.
    ///
    /// Only posting is gated on balance, accounts, and header fields.
    #[must_use]
    pub fn allows_draft(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::MissingAccount
                | ErrorCategory::Imbalance
                | ErrorCategory::MissingHeaderField
        )
    }
}

impl From<JournalError> for AppError {
    fn from(err: JournalError) -> Self {
        match err {
            JournalError::LineNotFound(_) => Self::NotFound(err.to_string()),
            JournalError::ConfirmationRequired { .. } => Self::BusinessRule(err.to_string()),
            JournalError::Submission(ref inner) if inner.is_conflict() => {
                Self::Conflict(err.to_string())
            }
            JournalError::Submission(ref inner) if inner.is_retryable() => {
                Self::ExternalService(err.to_string())
            }
            JournalError::Submission(_) => Self::BusinessRule(err.to_string()),
            JournalError::Lookup(_) => Self::ExternalService(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            JournalError::TooFewLines { minimum: 2, actual: 1 }.error_code(),
            "TOO_FEW_LINES"
        );
        assert_eq!(
            JournalError::MissingHeaderField(HeaderField::Date).error_code(),
            "MISSING_DATE"
        );
        assert_eq!(
            JournalError::Submission(SubmitError::DuplicateReference("INV-1".into())).error_code(),
            "DUPLICATE_REFERENCE"
        );
    }

    #[test]
    fn test_check_amount() {
        assert!(JournalError::check_amount(1, MAX_AMOUNT).is_ok());
        let err = JournalError::check_amount(3, MAX_AMOUNT + dec!(1)).unwrap_err();
        assert_eq!(err.error_code(), "AMOUNT_TOO_LARGE");
        assert_eq!(err.category(), ErrorCategory::Structural);
        assert!(!err.allows_draft());
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            JournalError::LineNotFound(JournalLineId::new()).category(),
            ErrorCategory::Structural
        );
        assert_eq!(
            JournalError::MissingAccount { line_numbers: vec![2] }.category(),
            ErrorCategory::MissingAccount
        );
        assert_eq!(
            JournalError::MissingHeaderField(HeaderField::Description).category(),
            ErrorCategory::MissingHeaderField
        );
    }

    #[test]
    fn test_allows_draft() {
        let unbalanced = JournalError::Unbalanced {
            debit: dec!(1000),
            credit: dec!(700),
            difference: dec!(300),
        };
        assert!(unbalanced.allows_draft());
        assert!(JournalError::MissingAccount { line_numbers: vec![1] }.allows_draft());
        assert!(!JournalError::TooFewLines { minimum: 2, actual: 1 }.allows_draft());
    }

    #[test]
    fn test_error_display() {
        let err = JournalError::Unbalanced {
            debit: dec!(1000.00),
            credit: dec!(700.00),
            difference: dec!(300.00),
        };
        assert_eq!(
            err.to_string(),
            "Entry is not balanced. Debit: 1000.00, Credit: 700.00, Difference: 300.00"
        );
        assert_eq!(
            JournalError::MissingHeaderField(HeaderField::Description).to_string(),
            "Journal entry description is required"
        );
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = JournalError::MissingAccount { line_numbers: vec![1] }.into();
        assert_eq!(app.error_code(), "VALIDATION_ERROR");

        let app: AppError =
            JournalError::Submission(SubmitError::DuplicateReference("R-1".into())).into();
        assert_eq!(app.error_code(), "CONFLICT");

        let app: AppError = JournalError::Submission(SubmitError::Unavailable("down".into())).into();
        assert!(app.is_retryable());
    }
}
