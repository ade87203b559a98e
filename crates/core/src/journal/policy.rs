//! Balance policy: when an entry counts as balanced, and what posting needs.

use rust_decimal::Decimal;
use tally_shared::config::JournalConfig;

use super::error::JournalError;
use super::totals::JournalTotals;

/// Double-entry minimum line count.
pub const MIN_LINES: usize = 2;

/// Balance tolerance and line-count floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalancePolicy {
    tolerance: Decimal,
    min_lines: usize,
}

impl Default for BalancePolicy {
    fn default() -> Self {
        Self {
            tolerance: Decimal::new(1, 2),
            min_lines: MIN_LINES,
        }
    }
}

impl BalancePolicy {
    /// Creates a policy. The line floor never drops below two and a negative
    /// tolerance is treated as zero.
    #[must_use]
    pub fn new(tolerance: Decimal, min_lines: usize) -> Self {
        Self {
            tolerance: tolerance.max(Decimal::ZERO),
            min_lines: min_lines.max(MIN_LINES),
        }
    }

    /// Builds the policy from configuration.
    #[must_use]
    pub fn from_config(config: &JournalConfig) -> Self {
        Self::new(config.balance_tolerance, config.min_lines)
    }

    /// Exclusive tolerance on `|difference|`.
    #[must_use]
    pub fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    /// Minimum number of lines.
    #[must_use]
    pub fn min_lines(&self) -> usize {
        self.min_lines
    }

    /// `|difference| < tolerance`.
    #[must_use]
    pub fn is_balanced(&self, totals: &JournalTotals) -> bool {
        self.is_within_tolerance(totals.difference())
    }

    /// Returns true if the amount counts as zero under this policy.
    ///
    /// A zero tolerance demands an exact match.
    #[must_use]
    pub fn is_within_tolerance(&self, difference: Decimal) -> bool {
        if self.tolerance.is_zero() {
            return difference.is_zero();
        }
        difference.abs() < self.tolerance
    }

    /// Fails with [`JournalError::Unbalanced`] unless balanced.
    pub fn ensure_balanced(&self, totals: &JournalTotals) -> Result<(), JournalError> {
        if self.is_balanced(totals) {
            Ok(())
        } else {
            Err(JournalError::Unbalanced {
                debit: totals.total_debit,
                credit: totals.total_credit,
                difference: totals.difference(),
            })
        }
    }

    /// Fails with [`JournalError::TooFewLines`] if `count` is below the floor.
    pub fn ensure_line_count(&self, count: usize) -> Result<(), JournalError> {
        if count < self.min_lines {
            return Err(JournalError::TooFewLines {
                minimum: self.min_lines,
                actual: count,
            });
        }
        Ok(())
    }
}
