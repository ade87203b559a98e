//! Editor service: validation, auto-balance, and hand-off to the ledger.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tally_shared::config::JournalConfig;
use tally_shared::types::{Currency, JournalLineId};
use tracing::{info, warn};

use super::auto_balance::{AutoBalanceOutcome, AutoBalancer, Confirmation};
use super::draft::JournalEntryDraft;
use super::error::JournalError;
use super::header::JournalEntryHeader;
use super::policy::BalancePolicy;
use super::ports::{Account, AccountLookup, LedgerSubmitter, SubmissionReceipt};
use super::totals::JournalTotals;
use super::validation::{posting_issues, validate_for_draft, validate_for_posting};
use crate::workflow::EntryStatus;

/// Status shown by the editor: either still a draft or posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorStatus {
    /// Not yet posted.
    Draft,
    /// Posted to the ledger.
    Posted,
}

impl From<EntryStatus> for EditorStatus {
    fn from(status: EntryStatus) -> Self {
        match status {
            EntryStatus::Posted | EntryStatus::Reversed => Self::Posted,
            _ => Self::Draft,
        }
    }
}

/// Live view of a draft: totals and whether it can be posted.
#[derive(Debug)]
pub struct EditorSnapshot {
    /// Current totals.
    pub totals: JournalTotals,
    /// `total_debit - total_credit`.
    pub difference: Decimal,
    /// Within tolerance.
    pub is_balanced: bool,
    /// Every posting problem, in validation order.
    pub issues: Vec<JournalError>,
}

impl EditorSnapshot {
    /// True when nothing blocks posting.
    #[must_use]
    pub fn can_post(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Orchestrates editing actions against a ledger collaborator.
pub struct JournalEditor<S: LedgerSubmitter> {
    submitter: Arc<S>,
    policy: BalancePolicy,
    balancer: AutoBalancer,
    currency: Currency,
}

impl<S: LedgerSubmitter> JournalEditor<S> {
    /// Creates an editor using the journal configuration.
    #[must_use]
    pub fn new(submitter: Arc<S>, config: &JournalConfig) -> Self {
        Self {
            submitter,
            policy: BalancePolicy::from_config(config),
            balancer: AutoBalancer::from_config(config),
            currency: config.currency,
        }
    }

    /// The active balance policy.
    #[must_use]
    pub fn policy(&self) -> &BalancePolicy {
        &self.policy
    }

    /// Opens a new draft with empty lines.
    #[must_use]
    pub fn open(&self, date: Option<NaiveDate>) -> JournalEntryDraft {
        JournalEntryDraft::with_policy(JournalEntryHeader::new(date, self.currency), &self.policy)
    }

    /// Totals, balance, and outstanding posting problems.
    #[must_use]
    pub fn snapshot(&self, draft: &JournalEntryDraft) -> EditorSnapshot {
        let totals = draft.totals();
        EditorSnapshot {
            totals,
            difference: totals.difference(),
            is_balanced: self.policy.is_balanced(&totals),
            issues: posting_issues(draft, &self.policy),
        }
    }

    /// Validates the draft and submits it for posting.
    ///
    /// Nothing reaches the ledger unless every posting check passes.
    pub fn post(&self, draft: &JournalEntryDraft) -> Result<SubmissionReceipt, JournalError> {
        if let Err(err) = validate_for_posting(draft, &self.policy) {
            warn!(code = err.error_code(), error = %err, "journal entry rejected for posting");
            return Err(err);
        }

        let submission = draft.to_submission();
        match self.submitter.submit(&submission) {
            Ok(receipt) => {
                info!(
                    entry_number = %receipt.entry_number,
                    total_debit = %submission.totals.total_debit,
                    lines = submission.lines.len(),
                    "journal entry posted"
                );
                Ok(receipt)
            }
            Err(err) => {
                warn!(code = err.error_code(), error = %err, "ledger refused journal entry");
                Err(err.into())
            }
        }
    }

    /// Saves the draft regardless of balance or missing accounts.
    pub fn save_draft(&self, draft: &JournalEntryDraft) -> Result<SubmissionReceipt, JournalError> {
        validate_for_draft(draft, &self.policy)?;

        let submission = draft.to_submission();
        let receipt = self.submitter.save_draft(&submission).inspect_err(|err| {
            warn!(code = err.error_code(), error = %err, "ledger refused draft");
        })?;
        info!(
            entry_number = %receipt.entry_number,
            balanced = self.policy.is_balanced(&submission.totals),
            "journal draft saved"
        );
        Ok(receipt)
    }

    /// Pushes the whole imbalance onto the last line.
    pub fn auto_balance(
        &self,
        draft: &JournalEntryDraft,
        confirmation: Confirmation,
    ) -> Result<(JournalEntryDraft, AutoBalanceOutcome), JournalError> {
        self.balancer.apply(draft, confirmation)
    }

    /// Searches the chart, returning only active accounts.
    pub fn search_accounts(
        &self,
        lookup: &impl AccountLookup,
        query: &str,
    ) -> Result<Vec<Account>, JournalError> {
        let mut accounts = lookup.lookup(query)?;
        accounts.retain(|account| account.is_active);
        Ok(accounts)
    }

    /// Assigns a looked-up account to a line.
    pub fn assign_account(
        &self,
        draft: &JournalEntryDraft,
        line_id: JournalLineId,
        account: &Account,
    ) -> Result<JournalEntryDraft, JournalError> {
        draft.set_account(line_id, account.to_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use rust_decimal_macros::dec;
    use tally_shared::types::JournalEntryId;

    use crate::journal::ports::{AccountType, LookupError, SubmitError};
    use crate::journal::submission::JournalEntrySubmission;

    #[derive(Default)]
    struct RecordingLedger {
        posted: Mutex<Vec<JournalEntrySubmission>>,
        drafts: Mutex<Vec<JournalEntrySubmission>>,
        refuse: bool,
    }

    impl RecordingLedger {
        fn receipt(status: EntryStatus) -> SubmissionReceipt {
            SubmissionReceipt {
                entry_id: JournalEntryId::new(),
                entry_number: "JE-2024-0001".to_string(),
                status,
            }
        }
    }

    impl LedgerSubmitter for RecordingLedger {
        fn submit(&self, entry: &JournalEntrySubmission) -> Result<SubmissionReceipt, SubmitError> {
            if self.refuse {
                return Err(SubmitError::DuplicateReference("INV-1".to_string()));
            }
            self.posted.lock().unwrap().push(entry.clone());
            Ok(Self::receipt(EntryStatus::Posted))
        }

        fn save_draft(
            &self,
            entry: &JournalEntrySubmission,
        ) -> Result<SubmissionReceipt, SubmitError> {
            self.drafts.lock().unwrap().push(entry.clone());
            Ok(Self::receipt(EntryStatus::Draft))
        }
    }

    struct FixedChart(Vec<Account>);

    impl AccountLookup for FixedChart {
        fn lookup(&self, query: &str) -> Result<Vec<Account>, LookupError> {
            Ok(self
                .0
                .iter()
                .filter(|a| a.code.contains(query) || a.name.contains(query))
                .cloned()
                .collect())
        }
    }

    fn editor(ledger: RecordingLedger) -> (JournalEditor<RecordingLedger>, Arc<RecordingLedger>) {
        let ledger = Arc::new(ledger);
        (
            JournalEditor::new(Arc::clone(&ledger), &JournalConfig::default()),
            ledger,
        )
    }

    fn filled(editor: &JournalEditor<RecordingLedger>, debit: Decimal, credit: Decimal) -> JournalEntryDraft {
        let draft = editor
            .open(NaiveDate::from_ymd_opt(2024, 1, 15))
            .update_header(|h| h.description = "Office rent".to_string());
        let (first, second) = (draft.lines()[0].id(), draft.lines()[1].id());
        draft
            .set_account(first, crate::journal::line::AccountRef::new("5300", "Rent Expense"))
            .and_then(|d| d.set_debit(first, debit))
            .and_then(|d| {
                d.set_account(second, crate::journal::line::AccountRef::new("1000", "Cash"))
            })
            .and_then(|d| d.set_credit(second, credit))
            .unwrap()
    }

    #[test]
    fn test_post_balanced_entry() {
        let (editor, ledger) = editor(RecordingLedger::default());
        let receipt = editor.post(&filled(&editor, dec!(600), dec!(600))).unwrap();
        assert_eq!(EditorStatus::from(receipt.status), EditorStatus::Posted);
        assert_eq!(ledger.posted.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_unbalanced_entry_never_reaches_ledger() {
        let (editor, ledger) = editor(RecordingLedger::default());
        let err = editor.post(&filled(&editor, dec!(600), dec!(500))).unwrap_err();
        assert!(matches!(err, JournalError::Unbalanced { .. }));
        assert!(ledger.posted.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unbalanced_draft_can_be_saved() {
        let (editor, ledger) = editor(RecordingLedger::default());
        let receipt = editor.save_draft(&filled(&editor, dec!(600), dec!(500))).unwrap();
        assert_eq!(EditorStatus::from(receipt.status), EditorStatus::Draft);
        assert_eq!(ledger.drafts.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_ledger_refusal_is_surfaced() {
        let (editor, _) = editor(RecordingLedger {
            refuse: true,
            ..RecordingLedger::default()
        });
        let err = editor.post(&filled(&editor, dec!(600), dec!(600))).unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_REFERENCE");
    }

    #[test]
    fn test_snapshot_reports_issues() {
        let (editor, _) = editor(RecordingLedger::default());
        let snapshot = editor.snapshot(&editor.open(None));
        assert!(snapshot.is_balanced);
        assert!(!snapshot.can_post());
        assert_eq!(snapshot.difference, Decimal::ZERO);

        let ready = editor.snapshot(&filled(&editor, dec!(10), dec!(10)));
        assert!(ready.can_post());
    }

    #[test]
    fn test_auto_balance_then_post() {
        let (editor, ledger) = editor(RecordingLedger::default());
        let draft = filled(&editor, dec!(600), dec!(450));
        let (balanced, outcome) = editor.auto_balance(&draft, Confirmation::Unconfirmed).unwrap();
        assert!(outcome.is_adjusted());
        editor.post(&balanced).unwrap();
        assert_eq!(ledger.posted.lock().unwrap()[0].totals.total_credit, dec!(600));
    }

    #[test]
    fn test_search_skips_inactive_accounts() {
        let (editor, _) = editor(RecordingLedger::default());
        let mut closed = Account::new("1010", "Cash - Petty", AccountType::Asset);
        closed.is_active = false;
        let chart = FixedChart(vec![Account::new("1000", "Cash", AccountType::Asset), closed]);

        let found = editor.search_accounts(&chart, "Cash").unwrap();
        assert_eq!(found.len(), 1);

        let draft = editor.open(None);
        let first = draft.lines()[0].id();
        let draft = editor.assign_account(&draft, first, &found[0]).unwrap();
        assert_eq!(draft.lines()[0].account().unwrap().code, "1000");
    }
}
