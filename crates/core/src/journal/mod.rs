//! Journal entry editing and balance validation.
//!
//! A [`JournalEntryDraft`] is edited through pure transitions. Totals are
//! derived on every read, [`BalancePolicy`] decides whether the entry is
//! balanced, and [`AutoBalancer`] can push an imbalance onto the last line.
//! Posting requires a complete, balanced entry; saving a draft does not.
//!
//! # Modules
//!
//! - `line` / `header` - Line and header value types
//! - `draft` - Immutable draft with line collection edits
//! - `totals` - Debit/credit totals
//! - `policy` - Balance tolerance and minimum line count
//! - `auto_balance` - Last-line auto-balance
//! - `validation` - Posting and draft checks
//! - `template` - Reusable line sets
//! - `submission` - Wire shape for collaborators
//! - `ports` - `AccountLookup` and `LedgerSubmitter` traits
//! - `editor` - Service tying the above to a ledger

pub mod auto_balance;
pub mod draft;
pub mod editor;
pub mod error;
pub mod header;
pub mod line;
pub mod policy;
pub mod ports;
pub mod submission;
pub mod template;
pub mod totals;
pub mod validation;

#[cfg(test)]
mod draft_props;

pub use auto_balance::{AutoBalanceOutcome, AutoBalancer, BalanceAdjustment, Confirmation};
pub use draft::JournalEntryDraft;
pub use editor::{EditorSnapshot, EditorStatus, JournalEditor};
pub use error::{ErrorCategory, HeaderField, JournalError};
pub use header::{JournalEntryHeader, JournalEntrySource, JournalEntryType};
pub use line::{AccountRef, JournalLine, LineSide};
pub use policy::{BalancePolicy, MIN_LINES};
pub use ports::{
    Account, AccountLookup, AccountType, LedgerSubmitter, LookupError, SubmissionReceipt,
    SubmitError,
};
pub use submission::{JournalEntrySubmission, SubmissionLine};
pub use template::{JournalTemplate, TemplateLine};
pub use totals::JournalTotals;
pub use validation::{
    check_line_amounts, posting_issues, validate_for_draft, validate_for_posting,
    validate_submission,
};
