//! In-memory journal book.
//!
//! Stores journal entries with their lifecycle status. Implements
//! [`LedgerSubmitter`] so the editor can hand entries to it directly.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use tally_core::journal::{
    BalancePolicy, JournalEntrySubmission, JournalTotals, LedgerSubmitter, SubmissionReceipt,
    SubmitError, check_line_amounts, validate_submission,
};
use tally_core::workflow::{
    EntryStatus, ReversalService, WorkflowAction, WorkflowError, WorkflowService,
};
use tally_shared::config::JournalConfig;
use tally_shared::types::JournalEntryId;
use tracing::{info, warn};

use super::account::InMemoryChart;
use crate::error::BookError;

/// A journal entry as kept by the book.
#[derive(Debug, Clone, Serialize)]
pub struct StoredEntry {
    /// Entry id.
    pub id: JournalEntryId,
    /// Entry number, e.g. `JE-2024-0001`.
    pub entry_number: String,
    /// Book-wide sequence the entry number was drawn from.
    pub sequence: u64,
    /// Lifecycle status.
    pub status: EntryStatus,
    /// Header, lines, and totals.
    pub entry: JournalEntrySubmission,
    /// For reversing entries, the entry being reversed.
    pub reversal_of: Option<JournalEntryId>,
    /// For reversed entries, the reversing entry.
    pub reversed_by: Option<JournalEntryId>,
    /// Date of the reversing entry.
    pub reversal_date: Option<NaiveDate>,
    /// Created.
    pub created_at: DateTime<Utc>,
    /// Last changed.
    pub updated_at: DateTime<Utc>,
    /// Submitted for approval.
    pub submitted_at: Option<DateTime<Utc>>,
    /// Approved.
    pub approved_at: Option<DateTime<Utc>>,
    /// Posted.
    pub posted_at: Option<DateTime<Utc>>,
    /// Cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl StoredEntry {
    /// Entry date from the header.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.entry.header.date
    }

    /// Returns true if the entry's amounts count toward account balances.
    ///
    /// A reversed entry still counts; its reversing entry offsets it.
    #[must_use]
    pub fn affects_ledger(&self) -> bool {
        matches!(self.status, EntryStatus::Posted | EntryStatus::Reversed)
    }

    fn receipt(&self) -> SubmissionReceipt {
        SubmissionReceipt {
            entry_id: self.id,
            entry_number: self.entry_number.clone(),
            status: self.status,
        }
    }

    fn apply(&mut self, action: &WorkflowAction) {
        self.status = action.new_status();
        self.updated_at = action.occurred_at();
        match action {
            WorkflowAction::Submit { submitted_at, .. } => self.submitted_at = Some(*submitted_at),
            WorkflowAction::Approve { approved_at, .. } => self.approved_at = Some(*approved_at),
            WorkflowAction::Post { posted_at, .. } => self.posted_at = Some(*posted_at),
            WorkflowAction::Reverse { reversal_date, .. } => {
                self.reversal_date = Some(*reversal_date);
            }
            WorkflowAction::Cancel {
                reason,
                cancelled_at,
                ..
            } => {
                if let Some(reason) = reason {
                    self.entry
                        .header
                        .append_note(&format!("Cancellation reason: {reason}"));
                }
                self.cancelled_at = Some(*cancelled_at);
            }
        }
    }
}

/// In-memory store of journal entries.
pub struct JournalBook {
    entries: DashMap<JournalEntryId, StoredEntry>,
    references: DashMap<String, JournalEntryId>,
    sequence: AtomicU64,
    chart: Option<Arc<InMemoryChart>>,
    policy: BalancePolicy,
    prefix: String,
}

impl JournalBook {
    /// Creates an empty book using the journal configuration.
    #[must_use]
    pub fn new(config: &JournalConfig) -> Self {
        Self {
            entries: DashMap::new(),
            references: DashMap::new(),
            sequence: AtomicU64::new(0),
            chart: None,
            policy: BalancePolicy::from_config(config),
            prefix: config.entry_number_prefix.clone(),
        }
    }

    /// Checks posted accounts against `chart`.
    #[must_use]
    pub fn with_chart(mut self, chart: Arc<InMemoryChart>) -> Self {
        self.chart = Some(chart);
        self
    }

    /// Continues numbering after `last`.
    #[cfg(test)]
    pub(crate) fn with_sequence_start(self, last: u64) -> Self {
        self.sequence.store(last, Ordering::SeqCst);
        self
    }

    /// The attached chart, if any.
    #[must_use]
    pub fn chart(&self) -> Option<&Arc<InMemoryChart>> {
        self.chart.as_ref()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fetches an entry.
    pub fn get(&self, id: JournalEntryId) -> Result<StoredEntry, BookError> {
        self.entries
            .get(&id)
            .map(|stored| stored.clone())
            .ok_or(BookError::EntryNotFound(id))
    }

    /// Replaces the content of a draft.
    pub fn update_draft(
        &self,
        id: JournalEntryId,
        entry: &JournalEntrySubmission,
    ) -> Result<StoredEntry, BookError> {
        self.policy.ensure_line_count(entry.lines.len())?;
        check_line_amounts(&entry.lines)?;

        let mut stored = self.entries.get_mut(&id).ok_or(BookError::EntryNotFound(id))?;
        WorkflowService::ensure_editable(stored.status)?;

        self.reserve_reference(entry, id)?;
        if stored.entry.header.reference() != entry.header.reference() {
            self.release_reference(&stored.entry, id);
        }

        stored.entry = with_computed_totals(entry);
        stored.updated_at = Utc::now();
        info!(entry_number = %stored.entry_number, "journal draft updated");
        Ok(stored.clone())
    }

    /// Deletes a draft.
    pub fn delete(&self, id: JournalEntryId) -> Result<(), BookError> {
        let status = self.get(id)?.status;
        WorkflowService::ensure_deletable(status).inspect_err(|err| {
            warn!(entry_id = %id, error = %err, "journal entry delete rejected");
        })?;

        if let Some((_, removed)) = self
            .entries
            .remove_if(&id, |_, stored| stored.status.is_editable())
        {
            self.release_reference(&removed.entry, id);
            info!(entry_number = %removed.entry_number, "journal draft deleted");
        }
        Ok(())
    }

    /// Submits a draft for approval. The entry must pass posting validation.
    pub fn submit_for_approval(&self, id: JournalEntryId) -> Result<StoredEntry, BookError> {
        self.transition(id, |stored| {
            let action = WorkflowService::submit(stored.status)?;
            self.validate_for_ledger(&stored.entry)?;
            Ok(action)
        })
    }

    /// Approves a pending entry.
    pub fn approve(&self, id: JournalEntryId) -> Result<StoredEntry, BookError> {
        self.transition(id, |stored| {
            WorkflowService::approve(stored.status).map_err(BookError::from)
        })
    }

    /// Posts an approved entry.
    pub fn post(&self, id: JournalEntryId) -> Result<StoredEntry, BookError> {
        self.transition(id, |stored| {
            let action = WorkflowService::post(stored.status)?;
            self.validate_for_ledger(&stored.entry)?;
            Ok(action)
        })
    }

    /// Cancels an entry that has not been posted. The reason is appended to
    /// the notes.
    pub fn cancel(
        &self,
        id: JournalEntryId,
        reason: Option<String>,
    ) -> Result<StoredEntry, BookError> {
        self.transition(id, |stored| {
            WorkflowService::cancel(stored.status, reason).map_err(BookError::from)
        })
    }

    /// Reverses a posted entry, returning the new reversing entry.
    ///
    /// The reversing entry is stored as posted. The original becomes
    /// `Reversed` and cannot be reversed again.
    pub fn reverse(
        &self,
        id: JournalEntryId,
        reversal_date: NaiveDate,
    ) -> Result<StoredEntry, BookError> {
        let original = self.get(id)?;
        WorkflowService::reverse(original.status, original.reversed_by.is_some(), reversal_date)?;

        let entry = ReversalService::create_reversing_entry(
            &original.entry,
            &original.entry_number,
            reversal_date,
        );
        let reversal_id = JournalEntryId::new();
        self.reserve_reference(&entry, reversal_id)?;

        // Re-check under the entry lock so two callers cannot both reverse.
        let action = {
            let Some(mut stored) = self.entries.get_mut(&id) else {
                self.release_reference(&entry, reversal_id);
                return Err(BookError::EntryNotFound(id));
            };
            let action = WorkflowService::reverse(
                stored.status,
                stored.reversed_by.is_some(),
                reversal_date,
            )
            .inspect_err(|_| self.release_reference(&entry, reversal_id))?;
            stored.apply(&action);
            stored.reversed_by = Some(reversal_id);
            action
        };

        let now = action.occurred_at();
        let mut reversal = self.new_stored(reversal_id, entry, EntryStatus::Posted, now);
        reversal.posted_at = Some(now);
        reversal.reversal_of = Some(id);
        self.entries.insert(reversal_id, reversal.clone());

        info!(
            original = %original.entry_number,
            reversal = %reversal.entry_number,
            "journal entry reversed"
        );
        Ok(reversal)
    }

    /// Copies of every stored entry.
    pub(crate) fn snapshot(&self) -> Vec<StoredEntry> {
        self.entries.iter().map(|stored| stored.value().clone()).collect()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn transition(
        &self,
        id: JournalEntryId,
        decide: impl FnOnce(&StoredEntry) -> Result<WorkflowAction, BookError>,
    ) -> Result<StoredEntry, BookError> {
        let mut stored = self.entries.get_mut(&id).ok_or(BookError::EntryNotFound(id))?;
        let from = stored.status;
        let action = decide(&*stored).inspect_err(|err| {
            warn!(
                entry_number = %stored.entry_number,
                status = %from,
                code = err.error_code(),
                error = %err,
                "journal entry transition rejected"
            );
        })?;

        stored.apply(&action);
        info!(
            entry_number = %stored.entry_number,
            from = %from,
            to = %stored.status,
            "journal entry transitioned"
        );
        Ok(stored.clone())
    }

    fn validate_for_ledger(&self, entry: &JournalEntrySubmission) -> Result<JournalTotals, BookError> {
        let totals = validate_submission(entry, &self.policy)?;
        self.check_accounts(entry)?;
        Ok(totals)
    }

    fn check_accounts(&self, entry: &JournalEntrySubmission) -> Result<(), SubmitError> {
        if let Some(chart) = &self.chart {
            for code in entry.account_codes() {
                chart.ensure_postable(code)?;
            }
        }
        Ok(())
    }

    fn reserve_reference(
        &self,
        entry: &JournalEntrySubmission,
        owner: JournalEntryId,
    ) -> Result<(), SubmitError> {
        let Some(reference) = entry.header.reference() else {
            return Ok(());
        };
        match self.references.entry(reference.to_string()) {
            Entry::Occupied(existing) if *existing.get() != owner => {
                Err(SubmitError::DuplicateReference(reference.to_string()))
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(owner);
                Ok(())
            }
        }
    }

    fn release_reference(&self, entry: &JournalEntrySubmission, owner: JournalEntryId) {
        if let Some(reference) = entry.header.reference() {
            self.references
                .remove_if(reference, |_, existing| *existing == owner);
        }
    }

    fn next_entry_number(&self, date: Option<NaiveDate>) -> (u64, String) {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let year = date.map_or_else(|| Utc::now().year(), |d| d.year());
        (sequence, format!("{}-{year}-{sequence:04}", self.prefix))
    }

    fn new_stored(
        &self,
        id: JournalEntryId,
        entry: JournalEntrySubmission,
        status: EntryStatus,
        now: DateTime<Utc>,
    ) -> StoredEntry {
        let (sequence, entry_number) = self.next_entry_number(entry.header.date);
        StoredEntry {
            id,
            entry_number,
            sequence,
            status,
            entry,
            reversal_of: None,
            reversed_by: None,
            reversal_date: None,
            created_at: now,
            updated_at: now,
            submitted_at: None,
            approved_at: None,
            posted_at: None,
            cancelled_at: None,
        }
    }

    fn store(
        &self,
        entry: &JournalEntrySubmission,
        status: EntryStatus,
    ) -> Result<StoredEntry, SubmitError> {
        let id = JournalEntryId::new();
        self.reserve_reference(entry, id)?;

        let now = Utc::now();
        let mut stored = self.new_stored(id, with_computed_totals(entry), status, now);
        if status == EntryStatus::Posted {
            stored.posted_at = Some(now);
        }
        self.entries.insert(id, stored.clone());
        Ok(stored)
    }
}

impl LedgerSubmitter for JournalBook {
    fn submit(&self, entry: &JournalEntrySubmission) -> Result<SubmissionReceipt, SubmitError> {
        match self.validate_for_ledger(entry) {
            Ok(_) => {}
            Err(BookError::Submit(err)) => return Err(err),
            Err(err) => return Err(SubmitError::Rejected(err.to_string())),
        }

        let stored = self.store(entry, EntryStatus::Posted).inspect_err(|err| {
            warn!(code = err.error_code(), error = %err, "journal entry refused");
        })?;
        info!(
            entry_number = %stored.entry_number,
            total_debit = %stored.entry.totals.total_debit,
            "journal entry recorded as posted"
        );
        Ok(stored.receipt())
    }

    fn save_draft(
        &self,
        entry: &JournalEntrySubmission,
    ) -> Result<SubmissionReceipt, SubmitError> {
        self.policy
            .ensure_line_count(entry.lines.len())
            .and_then(|()| check_line_amounts(&entry.lines))
            .map_err(|err| SubmitError::Rejected(err.to_string()))?;

        let stored = self.store(entry, EntryStatus::Draft)?;
        info!(entry_number = %stored.entry_number, "journal draft recorded");
        Ok(stored.receipt())
    }
}

fn with_computed_totals(entry: &JournalEntrySubmission) -> JournalEntrySubmission {
    let mut entry = entry.clone();
    entry.totals = entry.computed_totals();
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tally_core::journal::{
        AccountRef, JournalEntryHeader, JournalEntryType, SubmissionLine,
    };
    use tally_shared::types::{Currency, JournalLineId};

    fn line(number: usize, code: &str, debit: Decimal, credit: Decimal) -> SubmissionLine {
        SubmissionLine {
            id: JournalLineId::new(),
            line_number: number,
            account: Some(AccountRef::new(code, code)),
            description: String::new(),
            debit_amount: debit,
            credit_amount: credit,
            cost_center: None,
            dimension1: None,
            dimension2: None,
        }
    }

    fn entry(reference: Option<&str>, credit: Decimal) -> JournalEntrySubmission {
        let mut header = JournalEntryHeader::new(NaiveDate::from_ymd_opt(2024, 1, 15), Currency::Usd)
            .with_description("Office rent");
        header.reference_number = reference.map(str::to_string);
        JournalEntrySubmission::new(
            header,
            vec![
                line(1, "5300", dec!(600), Decimal::ZERO),
                line(2, "1000", Decimal::ZERO, credit),
            ],
        )
    }

    fn book() -> JournalBook {
        JournalBook::new(&JournalConfig::default())
    }

    #[test]
    fn test_entry_numbers_are_sequential() {
        let book = book();
        let first = book.submit(&entry(None, dec!(600))).unwrap();
        let second = book.save_draft(&entry(None, dec!(1))).unwrap();
        assert_eq!(first.entry_number, "JE-2024-0001");
        assert_eq!(second.entry_number, "JE-2024-0002");
        assert_eq!(first.status, EntryStatus::Posted);
        assert_eq!(second.status, EntryStatus::Draft);
    }

    #[test]
    fn test_submit_rejects_unbalanced() {
        let err = book().submit(&entry(None, dec!(500))).unwrap_err();
        assert!(matches!(err, SubmitError::Rejected(_)));
    }

    #[test]
    fn test_draft_amount_above_ceiling_rejected() {
        let book = book();
        let mut draft = entry(None, dec!(1));
        draft.lines[0].debit_amount = Decimal::MAX;
        let err = book.save_draft(&draft).unwrap_err();
        assert!(matches!(err, SubmitError::Rejected(message) if message.contains("exceeds the maximum")));
        assert!(book.is_empty());

        let receipt = book.save_draft(&entry(None, dec!(1))).unwrap();
        let err = book.update_draft(receipt.entry_id, &draft).unwrap_err();
        assert_eq!(err.error_code(), "AMOUNT_TOO_LARGE");
    }

    #[test]
    fn test_duplicate_reference_rejected() {
        let book = book();
        book.submit(&entry(Some("INV-1"), dec!(600))).unwrap();
        let err = book.save_draft(&entry(Some(" INV-1 "), dec!(1))).unwrap_err();
        assert!(matches!(err, SubmitError::DuplicateReference(r) if r == "INV-1"));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_deleted_draft_frees_reference() {
        let book = book();
        let receipt = book.save_draft(&entry(Some("INV-2"), dec!(1))).unwrap();
        book.delete(receipt.entry_id).unwrap();
        assert!(book.is_empty());
        assert!(book.save_draft(&entry(Some("INV-2"), dec!(1))).is_ok());
    }

    #[test]
    fn test_chart_checks_accounts() {
        let chart = Arc::new(InMemoryChart::from_accounts([
            tally_core::journal::Account::new("1000", "Cash", tally_core::journal::AccountType::Asset),
        ]));
        let book = book().with_chart(chart);
        let err = book.submit(&entry(None, dec!(600))).unwrap_err();
        assert!(matches!(err, SubmitError::UnknownAccount(code) if code == "5300"));
    }

    #[test]
    fn test_cancel_appends_reason() {
        let book = book();
        let receipt = book.save_draft(&entry(None, dec!(1))).unwrap();
        let cancelled = book
            .cancel(receipt.entry_id, Some("Entered twice".to_string()))
            .unwrap();
        assert_eq!(cancelled.status, EntryStatus::Cancelled);
        assert_eq!(
            cancelled.entry.header.notes.as_deref(),
            Some("Cancellation reason: Entered twice")
        );
        assert!(cancelled.cancelled_at.is_some());
    }

    #[test]
    fn test_reverse_marks_original() {
        let book = book();
        let receipt = book.submit(&entry(None, dec!(600))).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

        let reversal = book.reverse(receipt.entry_id, date).unwrap();
        assert_eq!(reversal.status, EntryStatus::Posted);
        assert_eq!(reversal.reversal_of, Some(receipt.entry_id));
        assert_eq!(reversal.entry.header.entry_type, JournalEntryType::Reversal);

        let original = book.get(receipt.entry_id).unwrap();
        assert_eq!(original.status, EntryStatus::Reversed);
        assert_eq!(original.reversed_by, Some(reversal.id));
        assert_eq!(original.reversal_date, Some(date));

        assert!(matches!(
            book.reverse(receipt.entry_id, date),
            Err(BookError::Workflow(WorkflowError::AlreadyReversed))
        ));
    }

    #[test]
    fn test_update_only_drafts() {
        let book = book();
        let receipt = book.submit(&entry(None, dec!(600))).unwrap();
        assert!(matches!(
            book.update_draft(receipt.entry_id, &entry(None, dec!(600))),
            Err(BookError::Workflow(WorkflowError::CannotModify(EntryStatus::Posted)))
        ));
    }

    #[test]
    fn test_update_draft_recomputes_totals() {
        let book = book();
        let receipt = book.save_draft(&entry(Some("A"), dec!(1))).unwrap();
        let mut changed = entry(Some("B"), dec!(600));
        changed.totals = JournalTotals::zero();

        let updated = book.update_draft(receipt.entry_id, &changed).unwrap();
        assert_eq!(updated.entry.totals.total_credit, dec!(600));
        assert!(book.save_draft(&entry(Some("A"), dec!(1))).is_ok());
    }
}
