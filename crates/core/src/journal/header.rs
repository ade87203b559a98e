//! Journal entry header.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tally_shared::types::Currency;

/// Kind of journal entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalEntryType {
    /// Entered by hand.
    #[default]
    Manual,
    /// Generated by another module.
    System,
    /// Period-end adjustment.
    Adjustment,
    /// Closing entry.
    Closing,
    /// Opening balance entry.
    Opening,
    /// Reversal of a posted entry.
    Reversal,
}

impl JournalEntryType {
    /// Returns the string representation of the type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::System => "system",
            Self::Adjustment => "adjustment",
            Self::Closing => "closing",
            Self::Opening => "opening",
            Self::Reversal => "reversal",
        }
    }
}

impl std::fmt::Display for JournalEntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a journal entry originated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalEntrySource {
    /// Keyed in by a user.
    #[default]
    Manual,
    /// Sales or purchase invoice.
    Invoice,
    /// Payment received or made.
    Payment,
    /// Payroll run.
    Payroll,
    /// Depreciation schedule.
    Depreciation,
    /// Inventory movement.
    Inventory,
    /// Period-end accrual.
    Accrual,
    /// Generated by the system, e.g. reversals.
    System,
}

impl JournalEntrySource {
    /// Returns the string representation of the source.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Invoice => "invoice",
            Self::Payment => "payment",
            Self::Payroll => "payroll",
            Self::Depreciation => "depreciation",
            Self::Inventory => "inventory",
            Self::Accrual => "accrual",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for JournalEntrySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header data of a journal entry.
///
/// No invariants are enforced here; completeness is checked only when posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntryHeader {
    /// Entry date.
    pub date: Option<NaiveDate>,
    /// Entry type.
    #[serde(default)]
    pub entry_type: JournalEntryType,
    /// Originating module.
    #[serde(default)]
    pub source: JournalEntrySource,
    /// Description (required to post).
    #[serde(default)]
    pub description: String,
    /// External reference number.
    #[serde(default)]
    pub reference_number: Option<String>,
    /// Source document.
    #[serde(default)]
    pub source_document: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// The entry's single currency.
    pub currency: Currency,
}

impl JournalEntryHeader {
    /// Creates a manual entry header for the given date.
    #[must_use]
    pub fn new(date: Option<NaiveDate>, currency: Currency) -> Self {
        Self {
            date,
            entry_type: JournalEntryType::Manual,
            source: JournalEntrySource::Manual,
            description: String::new(),
            reference_number: None,
            source_document: None,
            notes: None,
            currency,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the entry type.
    #[must_use]
    pub fn with_type(mut self, entry_type: JournalEntryType) -> Self {
        self.entry_type = entry_type;
        self
    }

    /// Sets the originating module.
    #[must_use]
    pub fn with_source(mut self, source: JournalEntrySource) -> Self {
        self.source = source;
        self
    }

    /// Sets the reference number.
    #[must_use]
    pub fn with_reference(mut self, reference_number: impl Into<String>) -> Self {
        self.reference_number = Some(reference_number.into());
        self
    }

    /// Returns the reference number if it is not blank.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.reference_number
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    /// Appends a line to the notes.
    pub fn append_note(&mut self, note: &str) {
        self.notes = Some(match self.notes.take() {
            Some(existing) if !existing.is_empty() => format!("{existing}\n{note}"),
            _ => note.to_string(),
        });
    }
}
