//! Auto-balance: force the last line to absorb the whole imbalance.
//!
//! The last line (highest line number) is the only line ever touched. Its
//! new amount is the net of all other lines, placed on the side that
//! offsets it. When the last line is empty or already on the absorbing side
//! this is exactly `existing + |difference|`. When it sits on the opposite
//! side the line flips sides, which is reported as `inverted`.
//!
//! No attempt is made to spread the adjustment across lines.

use rust_decimal::Decimal;
use tally_shared::config::JournalConfig;
use tally_shared::types::JournalLineId;
use tracing::debug;

use super::draft::JournalEntryDraft;
use super::error::JournalError;
use super::line::LineSide;
use super::policy::BalancePolicy;

/// Whether the user has confirmed overwriting a non-empty last line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Confirmation {
    /// Not confirmed.
    #[default]
    Unconfirmed,
    /// Confirmed.
    Confirmed,
}

/// What changed on the absorbing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceAdjustment {
    /// The adjusted line.
    pub line_id: JournalLineId,
    /// Its line number.
    pub line_number: usize,
    /// `total_debit - total_credit` before the adjustment.
    pub difference: Decimal,
    /// Debit before.
    pub previous_debit: Decimal,
    /// Credit before.
    pub previous_credit: Decimal,
    /// Debit after.
    pub new_debit: Decimal,
    /// Credit after.
    pub new_credit: Decimal,
    /// True if the line moved from one side to the other.
    pub inverted: bool,
}

/// Result of an auto-balance request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoBalanceOutcome {
    /// Nothing to do.
    AlreadyBalanced,
    /// The last line was adjusted.
    Adjusted(BalanceAdjustment),
}

impl AutoBalanceOutcome {
    /// Returns true if a line changed.
    #[must_use]
    pub fn is_adjusted(&self) -> bool {
        matches!(self, Self::Adjusted(_))
    }
}

/// Applies the last-line auto-balance rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoBalancer {
    policy: BalancePolicy,
    require_confirmation: bool,
}

impl AutoBalancer {
    /// Creates a balancer.
    #[must_use]
    pub fn new(policy: BalancePolicy, require_confirmation: bool) -> Self {
        Self {
            policy,
            require_confirmation,
        }
    }

    /// Builds the balancer from configuration.
    #[must_use]
    pub fn from_config(config: &JournalConfig) -> Self {
        Self::new(
            BalancePolicy::from_config(config),
            config.auto_balance.require_confirmation,
        )
    }

    /// Computes the adjustment without applying it.
    #[must_use]
    pub fn plan(&self, draft: &JournalEntryDraft) -> AutoBalanceOutcome {
        let totals = draft.totals();
        let difference = totals.difference();
        let Some(last) = draft.last_line() else {
            return AutoBalanceOutcome::AlreadyBalanced;
        };
        if self.policy.is_within_tolerance(difference) {
            return AutoBalanceOutcome::AlreadyBalanced;
        }

        let others_net = difference - last.net();
        let (new_debit, new_credit) = if others_net > Decimal::ZERO {
            (Decimal::ZERO, others_net)
        } else {
            (-others_net, Decimal::ZERO)
        };

        let new_side = if new_debit > Decimal::ZERO {
            Some(LineSide::Debit)
        } else if new_credit > Decimal::ZERO {
            Some(LineSide::Credit)
        } else {
            None
        };
        let inverted = matches!(
            (last.side(), new_side),
            (Some(before), Some(after)) if before != after
        );

        AutoBalanceOutcome::Adjusted(BalanceAdjustment {
            line_id: last.id(),
            line_number: last.line_number(),
            difference,
            previous_debit: last.debit_amount(),
            previous_credit: last.credit_amount(),
            new_debit,
            new_credit,
            inverted,
        })
    }

    /// Balances the draft by adjusting its last line.
    ///
    /// With confirmation required, a last line that already holds an amount
    /// is only overwritten when `confirmation` is [`Confirmation::Confirmed`].
    pub fn apply(
        &self,
        draft: &JournalEntryDraft,
        confirmation: Confirmation,
    ) -> Result<(JournalEntryDraft, AutoBalanceOutcome), JournalError> {
        let outcome = self.plan(draft);
        let AutoBalanceOutcome::Adjusted(adjustment) = &outcome else {
            debug!("auto-balance skipped, entry already balanced");
            return Ok((draft.clone(), outcome));
        };

        let holds_amount = !adjustment.previous_debit.is_zero() || !adjustment.previous_credit.is_zero();
        if self.require_confirmation && holds_amount && confirmation != Confirmation::Confirmed {
            return Err(JournalError::ConfirmationRequired {
                line_number: adjustment.line_number,
            });
        }

        let (new_debit, new_credit) = (adjustment.new_debit, adjustment.new_credit);
        JournalError::check_amount(adjustment.line_number, new_debit.max(new_credit))?;
        let balanced = draft.update_line(adjustment.line_id, |line| {
            if new_credit > Decimal::ZERO {
                line.set_credit(new_credit);
            } else if new_debit > Decimal::ZERO {
                line.set_debit(new_debit);
            } else {
                line.clear_amounts();
            }
        })?;

        debug!(
            line_number = adjustment.line_number,
            difference = %adjustment.difference,
            new_debit = %new_debit,
            new_credit = %new_credit,
            inverted = adjustment.inverted,
            "auto-balance adjusted last line"
        );

        Ok((balanced, outcome))
    }
}
