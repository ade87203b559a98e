//! Posting and draft validation.
//!
//! Posting checks run in a fixed order and stop at the first failure:
//! date, description, line count, accounts, balance. Saving a draft only
//! checks the line count.

use rust_decimal::Decimal;

use super::draft::JournalEntryDraft;
use super::error::{HeaderField, JournalError};
use super::header::JournalEntryHeader;
use super::policy::BalancePolicy;
use super::submission::{JournalEntrySubmission, SubmissionLine};
use super::totals::JournalTotals;

/// Validates a draft for posting.
///
/// # Errors
///
/// Returns the first failed check as a [`JournalError`].
pub fn validate_for_posting(
    draft: &JournalEntryDraft,
    policy: &BalancePolicy,
) -> Result<(), JournalError> {
    check_header(draft.header())?;
    policy.ensure_line_count(draft.len())?;
    check_accounts(draft.lines_missing_account())?;
    policy.ensure_balanced(&draft.totals())
}

/// Validates a draft for saving. Balance and accounts are not required.
///
/// # Errors
///
/// Returns [`JournalError::TooFewLines`] if the draft is below the minimum.
pub fn validate_for_draft(
    draft: &JournalEntryDraft,
    policy: &BalancePolicy,
) -> Result<(), JournalError> {
    policy.ensure_line_count(draft.len())
}

/// Collects every posting problem instead of stopping at the first.
///
/// Order matches [`validate_for_posting`]. An empty list means the draft
/// can be posted.
#[must_use]
pub fn posting_issues(draft: &JournalEntryDraft, policy: &BalancePolicy) -> Vec<JournalError> {
    let header = draft.header();
    let mut issues = Vec::new();

    if header.date.is_none() {
        issues.push(JournalError::MissingHeaderField(HeaderField::Date));
    }
    if header.description.trim().is_empty() {
        issues.push(JournalError::MissingHeaderField(HeaderField::Description));
    }
    if let Err(err) = policy.ensure_line_count(draft.len()) {
        issues.push(err);
    }
    if let Err(err) = check_accounts(draft.lines_missing_account()) {
        issues.push(err);
    }
    if let Err(err) = policy.ensure_balanced(&draft.totals()) {
        issues.push(err);
    }
    issues
}

/// Validates a submission received from outside the editor.
///
/// Totals are recomputed from the lines; the `totals` field on the
/// submission is not trusted.
///
/// # Errors
///
/// Same checks and order as [`validate_for_posting`], plus the amount
/// checks of [`check_line_amounts`].
pub fn validate_submission(
    submission: &JournalEntrySubmission,
    policy: &BalancePolicy,
) -> Result<JournalTotals, JournalError> {
    check_header(&submission.header)?;
    policy.ensure_line_count(submission.lines.len())?;

    check_line_amounts(&submission.lines)?;

    let missing: Vec<usize> = submission
        .lines
        .iter()
        .filter(|line| {
            line.account
                .as_ref()
                .is_none_or(|account| account.code.trim().is_empty())
        })
        .map(|line| line.line_number)
        .collect();
    check_accounts(missing)?;

    let totals = submission.computed_totals();
    policy.ensure_balanced(&totals)?;
    Ok(totals)
}

/// Checks that every line carries one non-negative amount within
/// [`MAX_AMOUNT`](tally_shared::types::MAX_AMOUNT).
///
/// # Errors
///
/// [`JournalError::InvalidLineAmounts`] or [`JournalError::AmountTooLarge`]
/// for the first offending line.
pub fn check_line_amounts(lines: &[SubmissionLine]) -> Result<(), JournalError> {
    for line in lines {
        let negative = line.debit_amount < Decimal::ZERO || line.credit_amount < Decimal::ZERO;
        let two_sided = !line.debit_amount.is_zero() && !line.credit_amount.is_zero();
        if negative || two_sided {
            return Err(JournalError::InvalidLineAmounts {
                line_number: line.line_number,
            });
        }
        JournalError::check_amount(line.line_number, line.debit_amount.max(line.credit_amount))?;
    }
    Ok(())
}

fn check_header(header: &JournalEntryHeader) -> Result<(), JournalError> {
    if header.date.is_none() {
        return Err(JournalError::MissingHeaderField(HeaderField::Date));
    }
    if header.description.trim().is_empty() {
        return Err(JournalError::MissingHeaderField(HeaderField::Description));
    }
    Ok(())
}

fn check_accounts(line_numbers: Vec<usize>) -> Result<(), JournalError> {
    if line_numbers.is_empty() {
        Ok(())
    } else {
        Err(JournalError::MissingAccount { line_numbers })
    }
}
