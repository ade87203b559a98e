//! Journal lines and account references.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{JournalLineId, non_negative};

/// Reference to a chart-of-accounts entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountRef {
    /// Account code (e.g. "1000").
    pub code: String,
    /// Display name (e.g. "Cash - Operating Account").
    pub name: String,
}

impl AccountRef {
    /// Creates an account reference.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Side of a journal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineSide {
    /// Debit side.
    Debit,
    /// Credit side.
    Credit,
}

impl LineSide {
    /// Returns the other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

/// A single debit or credit line of a journal entry.
///
/// Amounts are never negative and at most one of them is nonzero; the
/// setters are the only way to change them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalLine {
    id: JournalLineId,
    line_number: usize,
    account: Option<AccountRef>,
    description: String,
    debit_amount: Decimal,
    credit_amount: Decimal,
    cost_center: Option<String>,
    dimension1: Option<String>,
    dimension2: Option<String>,
}

impl JournalLine {
    /// Creates an empty line with zero amounts and a fresh id.
    #[must_use]
    pub fn blank(line_number: usize) -> Self {
        Self {
            id: JournalLineId::new(),
            line_number,
            account: None,
            description: String::new(),
            debit_amount: Decimal::ZERO,
            credit_amount: Decimal::ZERO,
            cost_center: None,
            dimension1: None,
            dimension2: None,
        }
    }

    /// Copies this line's content under a fresh id and a new number.
    #[must_use]
    pub fn duplicate(&self, line_number: usize) -> Self {
        Self {
            id: JournalLineId::new(),
            line_number,
            ..self.clone()
        }
    }

    /// The line id.
    #[must_use]
    pub fn id(&self) -> JournalLineId {
        self.id
    }

    /// The 1-based line number.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// The assigned account, if any.
    #[must_use]
    pub fn account(&self) -> Option<&AccountRef> {
        self.account.as_ref()
    }

    /// Returns true if an account with a non-blank code is assigned.
    #[must_use]
    pub fn has_account(&self) -> bool {
        self.account
            .as_ref()
            .is_some_and(|account| !account.code.trim().is_empty())
    }

    /// The line description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Debit amount (zero for credit lines).
    #[must_use]
    pub fn debit_amount(&self) -> Decimal {
        self.debit_amount
    }

    /// Credit amount (zero for debit lines).
    #[must_use]
    pub fn credit_amount(&self) -> Decimal {
        self.credit_amount
    }

    /// Cost center tag.
    #[must_use]
    pub fn cost_center(&self) -> Option<&str> {
        self.cost_center.as_deref()
    }

    /// Dimension tags.
    #[must_use]
    pub fn dimensions(&self) -> (Option<&str>, Option<&str>) {
        (self.dimension1.as_deref(), self.dimension2.as_deref())
    }

    /// The side holding a nonzero amount, if any.
    #[must_use]
    pub fn side(&self) -> Option<LineSide> {
        if self.debit_amount > Decimal::ZERO {
            Some(LineSide::Debit)
        } else if self.credit_amount > Decimal::ZERO {
            Some(LineSide::Credit)
        } else {
            None
        }
    }

    /// The nonzero amount, or zero for an empty line.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.debit_amount.max(self.credit_amount)
    }

    /// `debit - credit`.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.debit_amount - self.credit_amount
    }

    /// Returns true if neither amount is set.
    #[must_use]
    pub fn is_empty_amount(&self) -> bool {
        self.side().is_none()
    }

    pub(crate) fn set_line_number(&mut self, line_number: usize) {
        self.line_number = line_number;
    }

    pub(crate) fn set_id(&mut self, id: JournalLineId) {
        self.id = id;
    }

    /// Sets the debit (clamped to zero) and clears the credit.
    pub(crate) fn set_debit(&mut self, amount: Decimal) {
        self.debit_amount = non_negative(amount);
        self.credit_amount = Decimal::ZERO;
    }

    /// Sets the credit (clamped to zero) and clears the debit.
    pub(crate) fn set_credit(&mut self, amount: Decimal) {
        self.credit_amount = non_negative(amount);
        self.debit_amount = Decimal::ZERO;
    }

    pub(crate) fn set_amount(&mut self, side: LineSide, amount: Decimal) {
        match side {
            LineSide::Debit => self.set_debit(amount),
            LineSide::Credit => self.set_credit(amount),
        }
    }

    pub(crate) fn clear_amounts(&mut self) {
        self.debit_amount = Decimal::ZERO;
        self.credit_amount = Decimal::ZERO;
    }

    pub(crate) fn set_account(&mut self, account: Option<AccountRef>) {
        self.account = account;
    }

    pub(crate) fn set_description(&mut self, description: String) {
        self.description = description;
    }

    pub(crate) fn set_cost_center(&mut self, cost_center: Option<String>) {
        self.cost_center = cost_center;
    }

    pub(crate) fn set_dimensions(&mut self, dimension1: Option<String>, dimension2: Option<String>) {
        self.dimension1 = dimension1;
        self.dimension2 = dimension2;
    }
}
