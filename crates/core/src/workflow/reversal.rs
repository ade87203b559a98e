//! Reversing entry creation for posted journal entries.
//!
//! A reversal swaps debits and credits on every line so that the pair of
//! entries nets to zero on every account.

use chrono::NaiveDate;
use tally_shared::types::JournalLineId;

use crate::journal::header::{JournalEntryHeader, JournalEntrySource, JournalEntryType};
use crate::journal::submission::{JournalEntrySubmission, SubmissionLine};

/// Stateless service for creating reversing entries.
pub struct ReversalService;

impl ReversalService {
    /// Builds the reversing entry for a posted entry.
    ///
    /// For each original line:
    /// - Debits become credits and credits become debits
    /// - The description is prefixed with "Reversal: "
    /// - Account and classification are preserved
    ///
    /// The header becomes a `Reversal` entry dated `reversal_date`, with
    /// description `Reversal of {entry_number}: {description}` and reference
    /// `REV-{entry_number}`.
    #[must_use]
    pub fn create_reversing_entry(
        original: &JournalEntrySubmission,
        entry_number: &str,
        reversal_date: NaiveDate,
    ) -> JournalEntrySubmission {
        let lines = original
            .lines
            .iter()
            .map(|line| SubmissionLine {
                id: JournalLineId::new(),
                line_number: line.line_number,
                account: line.account.clone(),
                description: format!("Reversal: {}", line.description),
                debit_amount: line.credit_amount,
                credit_amount: line.debit_amount,
                cost_center: line.cost_center.clone(),
                dimension1: line.dimension1.clone(),
                dimension2: line.dimension2.clone(),
            })
            .collect();

        let header = JournalEntryHeader {
            date: Some(reversal_date),
            entry_type: JournalEntryType::Reversal,
            source: JournalEntrySource::System,
            description: format!(
                "Reversal of {entry_number}: {}",
                original.header.description
            ),
            reference_number: Some(format!("REV-{entry_number}")),
            source_document: Some(entry_number.to_string()),
            notes: None,
            currency: original.header.currency,
        };

        JournalEntrySubmission::new(header, lines)
    }
}
