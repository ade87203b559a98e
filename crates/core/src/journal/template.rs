//! Reusable journal entry templates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::line::{AccountRef, JournalLine, LineSide};

/// One line of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateLine {
    /// Account to post to.
    pub account: AccountRef,
    /// Line description.
    pub description: String,
    /// Debit or credit.
    pub side: LineSide,
    /// Default amount.
    pub amount: Decimal,
}

impl TemplateLine {
    /// Materializes the line with a fresh id.
    #[must_use]
    pub fn to_line(&self, line_number: usize) -> JournalLine {
        let mut line = JournalLine::blank(line_number);
        line.set_account(Some(self.account.clone()));
        line.set_description(self.description.clone());
        line.set_amount(self.side, self.amount);
        line
    }
}

/// A named set of lines that can replace a draft's lines in one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalTemplate {
    /// Template id (e.g. "TPL-001").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description copied onto the entry header.
    pub description: String,
    /// Template lines in order.
    pub lines: Vec<TemplateLine>,
}

impl JournalTemplate {
    /// Returns true if the template's debits equal its credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        let net: Decimal = self
            .lines
            .iter()
            .map(|line| match line.side {
                LineSide::Debit => line.amount,
                LineSide::Credit => -line.amount,
            })
            .sum();
        net.is_zero()
    }
}
