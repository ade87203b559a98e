//! Lifecycle types for journal entries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a stored journal entry.
///
/// The valid transitions are:
/// - Draft → PendingApproval (submit)
/// - PendingApproval → Approved (approve)
/// - Approved → Posted (post)
/// - Posted → Reversed (reverse, once)
/// - Draft / PendingApproval / Approved → Cancelled (cancel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Being drafted; can be modified or deleted.
    Draft,
    /// Submitted for approval.
    PendingApproval,
    /// Approved and ready for posting.
    Approved,
    /// Posted to the ledger (immutable).
    Posted,
    /// Offset by a reversing entry (immutable).
    Reversed,
    /// Abandoned before posting (immutable).
    Cancelled,
}

impl EntryStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Draft,
        Self::PendingApproval,
        Self::Approved,
        Self::Posted,
        Self::Reversed,
        Self::Cancelled,
    ];

    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingApproval => "pending_approval",
            Self::Approved => "approved",
            Self::Posted => "posted",
            Self::Reversed => "reversed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "pending_approval" | "pending" => Some(Self::PendingApproval),
            "approved" => Some(Self::Approved),
            "posted" => Some(Self::Posted),
            "reversed" => Some(Self::Reversed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if the entry can still be edited or deleted.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the entry can be cancelled.
    #[must_use]
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::Draft | Self::PendingApproval | Self::Approved)
    }

    /// Returns true if no further transition exists except reversal.
    #[must_use]
    pub fn is_immutable(&self) -> bool {
        matches!(self, Self::Posted | Self::Reversed | Self::Cancelled)
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated state transition with its audit data.
#[derive(Debug, Clone)]
pub enum WorkflowAction {
    /// Draft submitted for approval.
    Submit {
        /// The new status after submission.
        new_status: EntryStatus,
        /// When the entry was submitted.
        submitted_at: DateTime<Utc>,
    },
    /// Pending entry approved.
    Approve {
        /// The new status after approval.
        new_status: EntryStatus,
        /// When the entry was approved.
        approved_at: DateTime<Utc>,
    },
    /// Approved entry posted.
    Post {
        /// The new status after posting.
        new_status: EntryStatus,
        /// When the entry was posted.
        posted_at: DateTime<Utc>,
    },
    /// Posted entry reversed.
    Reverse {
        /// The new status of the original entry.
        new_status: EntryStatus,
        /// Accounting date of the reversing entry.
        reversal_date: NaiveDate,
        /// When the reversal was recorded.
        reversed_at: DateTime<Utc>,
    },
    /// Entry cancelled before posting.
    Cancel {
        /// The new status after cancellation.
        new_status: EntryStatus,
        /// Optional reason, appended to the entry notes.
        reason: Option<String>,
        /// When the entry was cancelled.
        cancelled_at: DateTime<Utc>,
    },
}

impl WorkflowAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> EntryStatus {
        match self {
            Self::Submit { new_status, .. }
            | Self::Approve { new_status, .. }
            | Self::Post { new_status, .. }
            | Self::Reverse { new_status, .. }
            | Self::Cancel { new_status, .. } => *new_status,
        }
    }

    /// When the transition happened.
    #[must_use]
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::Submit { submitted_at: at, .. }
            | Self::Approve { approved_at: at, .. }
            | Self::Post { posted_at: at, .. }
            | Self::Reverse { reversed_at: at, .. }
            | Self::Cancel { cancelled_at: at, .. } => *at,
        }
    }
}
