//! Read-side queries over the journal book.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tally_core::journal::{JournalEntrySource, JournalEntryType};
use tally_core::workflow::EntryStatus;
use tally_shared::types::{PageRequest, PageResponse};

use super::journal::{JournalBook, StoredEntry};

/// Criteria for listing entries. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Entry type.
    pub entry_type: Option<JournalEntryType>,
    /// Originating module.
    pub source: Option<JournalEntrySource>,
    /// Lifecycle status.
    pub status: Option<EntryStatus>,
    /// Entries with at least one line on this account code.
    pub account_code: Option<String>,
    /// Entries dated on or after.
    pub from_date: Option<NaiveDate>,
    /// Entries dated on or before.
    pub to_date: Option<NaiveDate>,
    /// Case-insensitive text in entry number, description, or reference.
    pub search: Option<String>,
}

impl EntryFilter {
    /// Returns true if `stored` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, stored: &StoredEntry) -> bool {
        let header = &stored.entry.header;

        if self.entry_type.is_some_and(|t| t != header.entry_type) {
            return false;
        }
        if self.source.is_some_and(|s| s != header.source) {
            return false;
        }
        if self.status.is_some_and(|s| s != stored.status) {
            return false;
        }
        if let Some(code) = &self.account_code
            && !stored.entry.account_codes().any(|c| c == code)
        {
            return false;
        }
        if !in_range(stored.date(), self.from_date, self.to_date) {
            return false;
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let hit = stored.entry_number.to_lowercase().contains(&needle)
                || header.description.to_lowercase().contains(&needle)
                || header
                    .reference()
                    .is_some_and(|r| r.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }
}

/// One posting in an account register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRow {
    /// Entry date.
    pub date: NaiveDate,
    /// Entry number.
    pub entry_number: String,
    /// Line description, or the entry description when the line has none.
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Running balance (debits minus credits).
    pub balance: Decimal,
}

/// Postings to one account with a running balance.
#[derive(Debug, Clone, Serialize)]
pub struct AccountRegister {
    /// Account code.
    pub account_code: String,
    /// Account name, from the chart or the first posting.
    pub account_name: String,
    /// Balance before the first row. Always zero.
    pub opening_balance: Decimal,
    /// Balance after the last row.
    pub closing_balance: Decimal,
    /// Rows in date order.
    pub rows: Vec<RegisterRow>,
}

/// Aggregate counts and totals.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JournalStatistics {
    /// All stored entries.
    pub total_entries: usize,
    /// Entries in `Posted` status.
    pub posted_entries: usize,
    /// Entries in `Draft` status.
    pub draft_entries: usize,
    /// Entries awaiting approval.
    pub pending_approval: usize,
    /// Debits of entries that count toward balances.
    pub total_debits: Decimal,
    /// Credits of entries that count toward balances.
    pub total_credits: Decimal,
    /// Entry count per type.
    pub by_type: HashMap<JournalEntryType, usize>,
    /// Entry count per source.
    pub by_source: HashMap<JournalEntrySource, usize>,
    /// Entry count per status.
    pub by_status: HashMap<EntryStatus, usize>,
}

impl JournalBook {
    /// Lists entries matching `filter`, newest first.
    #[must_use]
    pub fn list(&self, filter: &EntryFilter, page: &PageRequest) -> PageResponse<StoredEntry> {
        let mut entries: Vec<StoredEntry> = self
            .snapshot()
            .into_iter()
            .filter(|stored| filter.matches(stored))
            .collect();
        entries.sort_by(|a, b| {
            b.date()
                .cmp(&a.date())
                .then_with(|| b.sequence.cmp(&a.sequence))
        });
        page.paginate(entries)
    }

    /// Postings to `account_code` in ledger entries between `from` and `to`
    /// (inclusive), sorted by date with a running balance.
    #[must_use]
    pub fn account_register(
        &self,
        account_code: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AccountRegister {
        let mut entries: Vec<StoredEntry> = self
            .snapshot()
            .into_iter()
            .filter(|stored| stored.affects_ledger() && in_range(stored.date(), from, to))
            .collect();
        entries.sort_by_key(|stored| (stored.date(), stored.sequence));

        let mut account_name = self
            .chart()
            .and_then(|chart| chart.find_by_code(account_code))
            .map(|account| account.name);
        let mut balance = Decimal::ZERO;
        let mut rows = Vec::new();

        for stored in &entries {
            let Some(date) = stored.date() else { continue };
            for line in &stored.entry.lines {
                let Some(account) = line.account.as_ref().filter(|a| a.code == account_code)
                else {
                    continue;
                };
                if account_name.is_none() {
                    account_name = Some(account.name.clone());
                }

                balance = balance.saturating_add(line.debit_amount - line.credit_amount);
                let description = if line.description.trim().is_empty() {
                    stored.entry.header.description.clone()
                } else {
                    line.description.clone()
                };
                rows.push(RegisterRow {
                    date,
                    entry_number: stored.entry_number.clone(),
                    description,
                    debit: line.debit_amount,
                    credit: line.credit_amount,
                    balance,
                });
            }
        }

        AccountRegister {
            account_code: account_code.to_string(),
            account_name: account_name.unwrap_or_default(),
            opening_balance: Decimal::ZERO,
            closing_balance: balance,
            rows,
        }
    }

    /// Counts by status, type, and source, plus ledger debit/credit totals.
    #[must_use]
    pub fn statistics(&self) -> JournalStatistics {
        let mut stats = JournalStatistics::default();
        for stored in self.snapshot() {
            stats.total_entries += 1;
            *stats.by_status.entry(stored.status).or_default() += 1;
            *stats
                .by_type
                .entry(stored.entry.header.entry_type)
                .or_default() += 1;
            *stats
                .by_source
                .entry(stored.entry.header.source)
                .or_default() += 1;

            match stored.status {
                EntryStatus::Posted => stats.posted_entries += 1,
                EntryStatus::Draft => stats.draft_entries += 1,
                EntryStatus::PendingApproval => stats.pending_approval += 1,
                _ => {}
            }
            if stored.affects_ledger() {
                stats.total_debits = stats
                    .total_debits
                    .saturating_add(stored.entry.totals.total_debit);
                stats.total_credits = stats
                    .total_credits
                    .saturating_add(stored.entry.totals.total_credit);
            }
        }
        stats
    }
}

fn in_range(date: Option<NaiveDate>, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    if from.is_none() && to.is_none() {
        return true;
    }
    date.is_some_and(|d| from.is_none_or(|f| d >= f) && to.is_none_or(|t| d <= t))
}
