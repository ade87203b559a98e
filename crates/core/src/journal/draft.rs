//! The journal entry being edited.
//!
//! `JournalEntryDraft` is an immutable value. Every edit returns a new draft
//! and leaves the original untouched, so a rejected edit never changes
//! anything and callers can keep the previous version for undo.
//!
//! Invariants held by every draft:
//! - at least `min_lines` (never fewer than two) lines
//! - line numbers are exactly `1..=N` in order
//! - on each line at most one of debit/credit is nonzero, neither negative

use rust_decimal::Decimal;
use tally_shared::types::{JournalLineId, MAX_AMOUNT, parse_amount};

use super::error::JournalError;
use super::header::JournalEntryHeader;
use super::line::{AccountRef, JournalLine, LineSide};
use super::policy::{BalancePolicy, MIN_LINES};
use super::submission::{JournalEntrySubmission, SubmissionLine};
use super::template::JournalTemplate;
use super::totals::JournalTotals;

/// A journal entry under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntryDraft {
    header: JournalEntryHeader,
    lines: Vec<JournalLine>,
    min_lines: usize,
}

impl JournalEntryDraft {
    /// Opens a draft with two empty lines.
    #[must_use]
    pub fn new(header: JournalEntryHeader) -> Self {
        Self::with_min_lines(header, MIN_LINES)
    }

    /// Opens a draft with as many empty lines as the policy requires.
    #[must_use]
    pub fn with_policy(header: JournalEntryHeader, policy: &BalancePolicy) -> Self {
        Self::with_min_lines(header, policy.min_lines())
    }

    fn with_min_lines(header: JournalEntryHeader, min_lines: usize) -> Self {
        let min_lines = min_lines.max(MIN_LINES);
        Self {
            header,
            lines: (1..=min_lines).map(JournalLine::blank).collect(),
            min_lines,
        }
    }

    /// Restores a draft from a saved submission.
    ///
    /// Lines are renumbered in the order given. Negative amounts and lines
    /// carrying both a debit and a credit are rejected rather than silently
    /// fixed, since they cannot come from this editor.
    pub fn from_submission(
        submission: &JournalEntrySubmission,
        policy: &BalancePolicy,
    ) -> Result<Self, JournalError> {
        policy.ensure_line_count(submission.lines.len())?;

        let mut lines = Vec::with_capacity(submission.lines.len());
        for (index, stored) in submission.lines.iter().enumerate() {
            let line_number = index + 1;
            lines.push(Self::restore_line(stored, line_number)?);
        }

        Ok(Self {
            header: submission.header.clone(),
            lines,
            min_lines: policy.min_lines(),
        })
    }

    fn restore_line(stored: &SubmissionLine, line_number: usize) -> Result<JournalLine, JournalError> {
        let negative = stored.debit_amount < Decimal::ZERO || stored.credit_amount < Decimal::ZERO;
        let both = stored.debit_amount > Decimal::ZERO && stored.credit_amount > Decimal::ZERO;
        if negative || both {
            return Err(JournalError::InvalidLineAmounts { line_number });
        }
        JournalError::check_amount(line_number, stored.debit_amount.max(stored.credit_amount))?;

        let mut line = JournalLine::blank(line_number);
        line.set_id(stored.id);
        line.set_account(stored.account.clone());
        line.set_description(stored.description.clone());
        if stored.credit_amount > Decimal::ZERO {
            line.set_credit(stored.credit_amount);
        } else {
            line.set_debit(stored.debit_amount);
        }
        line.set_cost_center(stored.cost_center.clone());
        line.set_dimensions(stored.dimension1.clone(), stored.dimension2.clone());
        Ok(line)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// The header.
    #[must_use]
    pub fn header(&self) -> &JournalEntryHeader {
        &self.header
    }

    /// Lines in line-number order.
    #[must_use]
    pub fn lines(&self) -> &[JournalLine] {
        &self.lines
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always false; a draft holds at least two lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Minimum number of lines this draft keeps.
    #[must_use]
    pub fn min_lines(&self) -> usize {
        self.min_lines
    }

    /// Looks up a line by id.
    #[must_use]
    pub fn line(&self, id: JournalLineId) -> Option<&JournalLine> {
        self.lines.iter().find(|line| line.id() == id)
    }

    /// The line with the highest line number.
    #[must_use]
    pub fn last_line(&self) -> Option<&JournalLine> {
        self.lines.last()
    }

    /// Current totals, recomputed on every call.
    #[must_use]
    pub fn totals(&self) -> JournalTotals {
        JournalTotals::from_lines(&self.lines)
    }

    /// Line numbers of lines without an account.
    #[must_use]
    pub fn lines_missing_account(&self) -> Vec<usize> {
        self.lines
            .iter()
            .filter(|line| !line.has_account())
            .map(JournalLine::line_number)
            .collect()
    }

    /// Converts to the wire shape.
    #[must_use]
    pub fn to_submission(&self) -> JournalEntrySubmission {
        JournalEntrySubmission::new(
            self.header.clone(),
            self.lines.iter().map(SubmissionLine::from).collect(),
        )
    }

    // ------------------------------------------------------------------
    // Line collection edits
    // ------------------------------------------------------------------

    /// Appends an empty line with the next number.
    #[must_use]
    pub fn add_line(&self) -> Self {
        let mut next = self.clone();
        next.lines.push(JournalLine::blank(self.lines.len() + 1));
        next
    }

    /// Removes a line and renumbers the rest.
    ///
    /// Rejected if it would leave fewer than the minimum number of lines.
    pub fn remove_line(&self, id: JournalLineId) -> Result<Self, JournalError> {
        let index = self.index_of(id)?;
        if self.lines.len() <= self.min_lines {
            return Err(JournalError::TooFewLines {
                minimum: self.min_lines,
                actual: self.lines.len() - 1,
            });
        }

        let mut next = self.clone();
        next.lines.remove(index);
        next.renumber();
        Ok(next)
    }

    /// Appends a copy of a line with a fresh id and the next number.
    pub fn duplicate_line(&self, id: JournalLineId) -> Result<Self, JournalError> {
        let index = self.index_of(id)?;
        let mut next = self.clone();
        let copy = self.lines[index].duplicate(self.lines.len() + 1);
        next.lines.push(copy);
        Ok(next)
    }

    /// Moves a line to a 1-based position and renumbers.
    pub fn move_line(&self, id: JournalLineId, position: usize) -> Result<Self, JournalError> {
        let index = self.index_of(id)?;
        if position == 0 || position > self.lines.len() {
            return Err(JournalError::InvalidPosition {
                position,
                len: self.lines.len(),
            });
        }

        let mut next = self.clone();
        let line = next.lines.remove(index);
        next.lines.insert(position - 1, line);
        next.renumber();
        Ok(next)
    }

    // ------------------------------------------------------------------
    // Line field edits
    // ------------------------------------------------------------------

    /// Sets the debit to `max(amount, 0)` and clears the credit.
    ///
    /// Amounts above [`MAX_AMOUNT`] are rejected with
    /// [`JournalError::AmountTooLarge`].
    pub fn set_debit(&self, id: JournalLineId, amount: Decimal) -> Result<Self, JournalError> {
        self.set_side_amount(id, LineSide::Debit, amount)
    }

    /// Sets the credit to `max(amount, 0)` and clears the debit.
    ///
    /// Amounts above [`MAX_AMOUNT`] are rejected with
    /// [`JournalError::AmountTooLarge`].
    pub fn set_credit(&self, id: JournalLineId, amount: Decimal) -> Result<Self, JournalError> {
        self.set_side_amount(id, LineSide::Credit, amount)
    }

    /// Parses typed text then behaves like [`Self::set_debit`]. Garbage is zero.
    pub fn set_debit_text(&self, id: JournalLineId, text: &str) -> Result<Self, JournalError> {
        self.set_debit(id, parse_amount(text))
    }

    /// Parses typed text then behaves like [`Self::set_credit`]. Garbage is zero.
    pub fn set_credit_text(&self, id: JournalLineId, text: &str) -> Result<Self, JournalError> {
        self.set_credit(id, parse_amount(text))
    }

    /// Assigns an account.
    pub fn set_account(&self, id: JournalLineId, account: AccountRef) -> Result<Self, JournalError> {
        self.update_line(id, |line| line.set_account(Some(account)))
    }

    /// Removes the account from a line.
    pub fn clear_account(&self, id: JournalLineId) -> Result<Self, JournalError> {
        self.update_line(id, |line| line.set_account(None))
    }

    /// Sets the line description.
    pub fn set_description(
        &self,
        id: JournalLineId,
        description: impl Into<String>,
    ) -> Result<Self, JournalError> {
        let description = description.into();
        self.update_line(id, |line| line.set_description(description))
    }

    /// Sets or clears the cost center.
    pub fn set_cost_center(
        &self,
        id: JournalLineId,
        cost_center: Option<String>,
    ) -> Result<Self, JournalError> {
        self.update_line(id, |line| line.set_cost_center(cost_center))
    }

    /// Sets or clears both dimension tags.
    pub fn set_dimensions(
        &self,
        id: JournalLineId,
        dimension1: Option<String>,
        dimension2: Option<String>,
    ) -> Result<Self, JournalError> {
        self.update_line(id, |line| line.set_dimensions(dimension1, dimension2))
    }

    // ------------------------------------------------------------------
    // Header and templates
    // ------------------------------------------------------------------

    /// Replaces the header.
    #[must_use]
    pub fn with_header(&self, header: JournalEntryHeader) -> Self {
        Self {
            header,
            ..self.clone()
        }
    }

    /// Edits the header in place on a copy.
    #[must_use]
    pub fn update_header(&self, edit: impl FnOnce(&mut JournalEntryHeader)) -> Self {
        let mut next = self.clone();
        edit(&mut next.header);
        next
    }

    /// Replaces all lines with the template's and takes its description.
    ///
    /// Short templates are padded with empty lines up to the minimum.
    /// A template amount above [`MAX_AMOUNT`] rejects the whole template.
    pub fn apply_template(&self, template: &JournalTemplate) -> Result<Self, JournalError> {
        let mut lines = Vec::with_capacity(template.lines.len().max(self.min_lines));
        for (index, template_line) in template.lines.iter().enumerate() {
            let line_number = index + 1;
            JournalError::check_amount(line_number, template_line.amount)?;
            lines.push(template_line.to_line(line_number));
        }
        while lines.len() < self.min_lines {
            lines.push(JournalLine::blank(lines.len() + 1));
        }

        let mut next = self.clone();
        next.lines = lines;
        next.header.description.clone_from(&template.description);
        Ok(next)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn set_side_amount(
        &self,
        id: JournalLineId,
        side: LineSide,
        amount: Decimal,
    ) -> Result<Self, JournalError> {
        let index = self.index_of(id)?;
        JournalError::check_amount(self.lines[index].line_number(), amount)?;
        let mut next = self.clone();
        next.lines[index].set_amount(side, amount);
        Ok(next)
    }

    fn index_of(&self, id: JournalLineId) -> Result<usize, JournalError> {
        self.lines
            .iter()
            .position(|line| line.id() == id)
            .ok_or(JournalError::LineNotFound(id))
    }

    pub(crate) fn update_line(
        &self,
        id: JournalLineId,
        edit: impl FnOnce(&mut JournalLine),
    ) -> Result<Self, JournalError> {
        let index = self.index_of(id)?;
        let mut next = self.clone();
        edit(&mut next.lines[index]);
        Ok(next)
    }

    fn renumber(&mut self) {
        for (index, line) in self.lines.iter_mut().enumerate() {
            line.set_line_number(index + 1);
        }
    }
}
