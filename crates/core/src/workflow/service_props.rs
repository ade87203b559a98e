//! Property-based tests for WorkflowService.

use chrono::NaiveDate;
use proptest::prelude::*;

use crate::workflow::error::WorkflowError;
use crate::workflow::service::WorkflowService;
use crate::workflow::types::EntryStatus;

/// Strategy for generating random EntryStatus values.
fn arb_status() -> impl Strategy<Value = EntryStatus> {
    prop::sample::select(EntryStatus::ALL.to_vec())
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default())
}

/// The one status each action accepts, and the status it produces.
fn expected(action: &str) -> (EntryStatus, EntryStatus) {
    match action {
        "submit" => (EntryStatus::Draft, EntryStatus::PendingApproval),
        "approve" => (EntryStatus::PendingApproval, EntryStatus::Approved),
        "post" => (EntryStatus::Approved, EntryStatus::Posted),
        _ => unreachable!(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// submit/approve/post succeed from exactly one status each.
    #[test]
    fn prop_forward_transitions(
        status in arb_status(),
        action in prop::sample::select(vec!["submit", "approve", "post"]),
    ) {
        let result = match action {
            "submit" => WorkflowService::submit(status),
            "approve" => WorkflowService::approve(status),
            _ => WorkflowService::post(status),
        };
        let (from, to) = expected(action);

        if status == from {
            prop_assert_eq!(result.unwrap().new_status(), to);
        } else {
            let is_invalid = matches!(
                result,
                Err(WorkflowError::InvalidTransition { from: f, to: t }) if f == status && t == to
            );
            prop_assert!(is_invalid);
        }
    }

    /// Reversal only from Posted, and never twice.
    #[test]
    fn prop_reverse_only_posted(
        status in arb_status(),
        already in any::<bool>(),
        date in arb_date(),
    ) {
        let result = WorkflowService::reverse(status, already, date);
        prop_assert_eq!(
            result.is_ok(),
            status == EntryStatus::Posted && !already
        );
    }

    /// Cancel succeeds exactly for cancellable statuses.
    #[test]
    fn prop_cancel_matches_cancellable(
        status in arb_status(),
        reason in prop::option::of("[a-zA-Z ]{0,30}"),
    ) {
        let result = WorkflowService::cancel(status, reason);
        prop_assert_eq!(result.is_ok(), status.is_cancellable());
        if let Ok(action) = result {
            prop_assert_eq!(action.new_status(), EntryStatus::Cancelled);
        }
    }

    /// Immutable statuses accept no edits.
    #[test]
    fn prop_immutable_not_editable(status in arb_status()) {
        if status.is_immutable() {
            prop_assert!(WorkflowService::ensure_editable(status).is_err());
            prop_assert!(WorkflowService::ensure_deletable(status).is_err());
        }
    }
}
