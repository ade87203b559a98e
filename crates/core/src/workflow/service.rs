//! Workflow service for journal entry state transitions.
//!
//! This module implements the state machine that moves stored entries
//! from draft through approval to posting, reversal, or cancellation.

use chrono::{NaiveDate, Utc};

use crate::workflow::error::WorkflowError;
use crate::workflow::types::{EntryStatus, WorkflowAction};

/// Stateless service for managing entry lifecycle transitions.
///
/// All methods are associated functions that validate a transition and
/// return the resulting `WorkflowAction` with its timestamp.
pub struct WorkflowService;

impl WorkflowService {
    /// Submit a draft for approval.
    ///
    /// # Errors
    /// `InvalidTransition` unless the entry is a draft.
    pub fn submit(current_status: EntryStatus) -> Result<WorkflowAction, WorkflowError> {
        match current_status {
            EntryStatus::Draft => Ok(WorkflowAction::Submit {
                new_status: EntryStatus::PendingApproval,
                submitted_at: Utc::now(),
            }),
            _ => Err(WorkflowError::InvalidTransition {
                from: current_status,
                to: EntryStatus::PendingApproval,
            }),
        }
    }

    /// Approve a pending entry.
    ///
    /// # Errors
    /// `InvalidTransition` unless the entry is pending approval.
    pub fn approve(current_status: EntryStatus) -> Result<WorkflowAction, WorkflowError> {
        match current_status {
            EntryStatus::PendingApproval => Ok(WorkflowAction::Approve {
                new_status: EntryStatus::Approved,
                approved_at: Utc::now(),
            }),
            _ => Err(WorkflowError::InvalidTransition {
                from: current_status,
                to: EntryStatus::Approved,
            }),
        }
    }

    /// Post an approved entry.
    ///
    /// # Errors
    /// `InvalidTransition` unless the entry is approved.
    pub fn post(current_status: EntryStatus) -> Result<WorkflowAction, WorkflowError> {
        match current_status {
            EntryStatus::Approved => Ok(WorkflowAction::Post {
                new_status: EntryStatus::Posted,
                posted_at: Utc::now(),
            }),
            _ => Err(WorkflowError::InvalidTransition {
                from: current_status,
                to: EntryStatus::Posted,
            }),
        }
    }

    /// Reverse a posted entry. An entry can be reversed only once.
    ///
    /// # Errors
    /// `AlreadyReversed` if a reversing entry exists, otherwise
    /// `InvalidTransition` unless the entry is posted.
    pub fn reverse(
        current_status: EntryStatus,
        already_reversed: bool,
        reversal_date: NaiveDate,
    ) -> Result<WorkflowAction, WorkflowError> {
        if already_reversed || current_status == EntryStatus::Reversed {
            return Err(WorkflowError::AlreadyReversed);
        }

        match current_status {
            EntryStatus::Posted => Ok(WorkflowAction::Reverse {
                new_status: EntryStatus::Reversed,
                reversal_date,
                reversed_at: Utc::now(),
            }),
            _ => Err(WorkflowError::InvalidTransition {
                from: current_status,
                to: EntryStatus::Reversed,
            }),
        }
    }

    /// Cancel an entry that has not been posted.
    ///
    /// A blank reason is treated as no reason.
    ///
    /// # Errors
    /// `InvalidTransition` if the entry is posted, reversed, or cancelled.
    pub fn cancel(
        current_status: EntryStatus,
        reason: Option<String>,
    ) -> Result<WorkflowAction, WorkflowError> {
        if !current_status.is_cancellable() {
            return Err(WorkflowError::InvalidTransition {
                from: current_status,
                to: EntryStatus::Cancelled,
            });
        }

        Ok(WorkflowAction::Cancel {
            new_status: EntryStatus::Cancelled,
            reason: reason.filter(|r| !r.trim().is_empty()),
            cancelled_at: Utc::now(),
        })
    }

    /// Checks that an entry can be updated.
    ///
    /// # Errors
    /// `CannotModify` unless the entry is a draft.
    pub fn ensure_editable(current_status: EntryStatus) -> Result<(), WorkflowError> {
        if current_status.is_editable() {
            Ok(())
        } else {
            Err(WorkflowError::CannotModify(current_status))
        }
    }

    /// Checks that an entry can be deleted.
    ///
    /// # Errors
    /// `CannotDelete` unless the entry is a draft.
    pub fn ensure_deletable(current_status: EntryStatus) -> Result<(), WorkflowError> {
        if current_status.is_editable() {
            Ok(())
        } else {
            Err(WorkflowError::CannotDelete(current_status))
        }
    }
}
