//! Collaborator traits for account search and ledger submission.
//!
//! The journal core never stores entries or accounts itself. Hosts implement
//! these traits (the `tally-book` crate provides in-memory versions).

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::JournalEntryId;
use thiserror::Error;

use super::line::{AccountRef, LineSide};
use super::submission::JournalEntrySubmission;
use crate::workflow::EntryStatus;

/// Account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Asset account.
    Asset,
    /// Liability account.
    Liability,
    /// Equity account.
    Equity,
    /// Income account.
    Income,
    /// Expense account.
    Expense,
}

impl AccountType {
    /// The side on which the account's balance normally increases.
    #[must_use]
    pub fn normal_side(&self) -> LineSide {
        match self {
            Self::Asset | Self::Expense => LineSide::Debit,
            Self::Liability | Self::Equity | Self::Income => LineSide::Credit,
        }
    }

    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An account as returned by [`AccountLookup`]. Read-only to the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account code, e.g. `1000`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Classification.
    pub account_type: AccountType,
    /// Current balance as reported by the chart.
    pub balance: Decimal,
    /// Inactive accounts cannot be posted to.
    pub is_active: bool,
}

impl Account {
    /// Creates an active account with a zero balance.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            account_type,
            balance: Decimal::ZERO,
            is_active: true,
        }
    }

    /// Sets the reported balance.
    #[must_use]
    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = balance;
        self
    }

    /// The reference stored on a journal line.
    #[must_use]
    pub fn to_ref(&self) -> AccountRef {
        AccountRef::new(self.code.clone(), self.name.clone())
    }
}

/// Account search failures.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The chart could not be reached.
    #[error("Account lookup unavailable: {0}")]
    Unavailable(String),
}

/// Ledger submission failures.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Another entry already uses this reference number.
    #[error("Reference number already exists: {0}")]
    DuplicateReference(String),

    /// A line points at an inactive account.
    #[error("Account {0} is inactive")]
    InactiveAccount(String),

    /// A line points at an account the ledger does not know.
    #[error("Account {0} does not exist")]
    UnknownAccount(String),

    /// The ledger refused the entry for another reason.
    #[error("Entry rejected: {0}")]
    Rejected(String),

    /// The ledger could not be reached.
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

impl SubmitError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateReference(_) => "DUPLICATE_REFERENCE",
            Self::InactiveAccount(_) => "INACTIVE_ACCOUNT",
            Self::UnknownAccount(_) => "UNKNOWN_ACCOUNT",
            Self::Rejected(_) => "ENTRY_REJECTED",
            Self::Unavailable(_) => "LEDGER_UNAVAILABLE",
        }
    }

    /// Returns true if the entry clashes with existing ledger state.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::DuplicateReference(_))
    }

    /// Returns true if the same submission may succeed later.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// What the ledger hands back after accepting an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// Identifier assigned by the ledger.
    pub entry_id: JournalEntryId,
    /// Human-readable entry number, e.g. `JE-2024-0001`.
    pub entry_number: String,
    /// Status the entry was stored with.
    pub status: EntryStatus,
}

/// Account search collaborator.
pub trait AccountLookup: Send + Sync {
    /// Returns accounts matching `query`. An empty query lists everything.
    fn lookup(&self, query: &str) -> Result<Vec<Account>, LookupError>;
}

/// Ledger collaborator that receives finished entries.
pub trait LedgerSubmitter: Send + Sync {
    /// Records a validated entry for posting.
    fn submit(&self, entry: &JournalEntrySubmission) -> Result<SubmissionReceipt, SubmitError>;

    /// Stores an entry as a draft. No balance requirement applies.
    fn save_draft(&self, entry: &JournalEntrySubmission)
    -> Result<SubmissionReceipt, SubmitError>;
}

impl<T: AccountLookup + ?Sized> AccountLookup for Arc<T> {
    fn lookup(&self, query: &str) -> Result<Vec<Account>, LookupError> {
        (**self).lookup(query)
    }
}

impl<T: LedgerSubmitter + ?Sized> LedgerSubmitter for Arc<T> {
    fn submit(&self, entry: &JournalEntrySubmission) -> Result<SubmissionReceipt, SubmitError> {
        (**self).submit(entry)
    }

    fn save_draft(
        &self,
        entry: &JournalEntrySubmission,
    ) -> Result<SubmissionReceipt, SubmitError> {
        (**self).save_draft(entry)
    }
}
