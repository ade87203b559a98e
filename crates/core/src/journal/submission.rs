//! Wire shape handed to the ledger collaborator: header plus ordered lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::JournalLineId;

use super::header::JournalEntryHeader;
use super::line::{AccountRef, JournalLine};
use super::totals::JournalTotals;

/// One line as sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionLine {
    /// Line id from the editing session.
    pub id: JournalLineId,
    /// 1-based position.
    pub line_number: usize,
    /// Assigned account.
    #[serde(default)]
    pub account: Option<AccountRef>,
    /// Line description.
    #[serde(default)]
    pub description: String,
    /// Debit amount.
    #[serde(default)]
    pub debit_amount: Decimal,
    /// Credit amount.
    #[serde(default)]
    pub credit_amount: Decimal,
    /// Cost center tag.
    #[serde(default)]
    pub cost_center: Option<String>,
    /// First dimension tag.
    #[serde(default)]
    pub dimension1: Option<String>,
    /// Second dimension tag.
    #[serde(default)]
    pub dimension2: Option<String>,
}

impl From<&JournalLine> for SubmissionLine {
    fn from(line: &JournalLine) -> Self {
        let (dimension1, dimension2) = line.dimensions();
        Self {
            id: line.id(),
            line_number: line.line_number(),
            account: line.account().cloned(),
            description: line.description().to_string(),
            debit_amount: line.debit_amount(),
            credit_amount: line.credit_amount(),
            cost_center: line.cost_center().map(str::to_string),
            dimension1: dimension1.map(str::to_string),
            dimension2: dimension2.map(str::to_string),
        }
    }
}

/// A complete entry as accepted by [`LedgerSubmitter`](super::ports::LedgerSubmitter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntrySubmission {
    /// Entry header.
    pub header: JournalEntryHeader,
    /// Lines ordered by line number.
    pub lines: Vec<SubmissionLine>,
    /// Totals at the time of submission.
    pub totals: JournalTotals,
}

impl JournalEntrySubmission {
    /// Builds a submission, deriving the totals from the lines.
    #[must_use]
    pub fn new(header: JournalEntryHeader, lines: Vec<SubmissionLine>) -> Self {
        let totals = Self::totals_of(&lines);
        Self {
            header,
            lines,
            totals,
        }
    }

    /// Recomputes totals from the lines, ignoring the stored `totals` field.
    #[must_use]
    pub fn computed_totals(&self) -> JournalTotals {
        Self::totals_of(&self.lines)
    }

    fn totals_of(lines: &[SubmissionLine]) -> JournalTotals {
        lines.iter().fold(JournalTotals::zero(), |mut totals, line| {
            totals.add(line.debit_amount, line.credit_amount);
            totals
        })
    }

    /// Account codes referenced by the lines, in line order.
    pub fn account_codes(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter_map(|line| line.account.as_ref().map(|a| a.code.as_str()))
    }

    /// Serializes to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
