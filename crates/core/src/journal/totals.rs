//! Totals over a set of journal lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::line::JournalLine;

/// Debit and credit totals of an entry.
///
/// Always derived from the current lines; never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalTotals {
    /// Sum of debit amounts.
    pub total_debit: Decimal,
    /// Sum of credit amounts.
    pub total_credit: Decimal,
    /// Number of lines holding a debit.
    pub debit_lines: usize,
    /// Number of lines holding a credit.
    pub credit_lines: usize,
}

impl JournalTotals {
    /// Computes totals from lines.
    #[must_use]
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a JournalLine>) -> Self {
        lines.into_iter().fold(Self::zero(), |mut totals, line| {
            totals.add(line.debit_amount(), line.credit_amount());
            totals
        })
    }

    /// Totals of an empty set.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            total_debit: Decimal::ZERO,
            total_credit: Decimal::ZERO,
            debit_lines: 0,
            credit_lines: 0,
        }
    }

    /// Adds one line's amounts.
    ///
    /// Sums saturate at `Decimal::MAX` instead of panicking. Lines built by
    /// the editor are capped well below that; only unchecked submissions can
    /// saturate, and validation rejects those.
    pub fn add(&mut self, debit: Decimal, credit: Decimal) {
        self.total_debit = self.total_debit.saturating_add(debit);
        self.total_credit = self.total_credit.saturating_add(credit);
        if debit > Decimal::ZERO {
            self.debit_lines += 1;
        }
        if credit > Decimal::ZERO {
            self.credit_lines += 1;
        }
    }

    /// `total_debit - total_credit`. Positive means debits exceed credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.total_debit.saturating_sub(self.total_credit)
    }

    /// Returns true if no line holds an amount.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.debit_lines == 0 && self.credit_lines == 0
    }
}
