//! In-memory chart of accounts.

use dashmap::DashMap;
use tally_core::journal::{Account, AccountLookup, LookupError, SubmitError};
use tracing::info;

use crate::error::BookError;

/// Chart of accounts keyed by account code.
#[derive(Debug, Default)]
pub struct InMemoryChart {
    accounts: DashMap<String, Account>,
}

impl InMemoryChart {
    /// Creates an empty chart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chart holding `accounts`. Later duplicates replace earlier ones.
    #[must_use]
    pub fn from_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        let chart = Self::new();
        for account in accounts {
            chart.insert(account);
        }
        chart
    }

    /// Adds or replaces an account.
    pub fn insert(&self, account: Account) {
        self.accounts.insert(account.code.clone(), account);
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if the chart holds no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Exact lookup by code.
    #[must_use]
    pub fn find_by_code(&self, code: &str) -> Option<Account> {
        self.accounts.get(code).map(|account| account.clone())
    }

    /// Marks an account inactive so it can no longer be posted to.
    pub fn deactivate(&self, code: &str) -> Result<(), BookError> {
        let mut account = self
            .accounts
            .get_mut(code)
            .ok_or_else(|| BookError::AccountNotFound(code.to_string()))?;
        account.is_active = false;
        info!(account_code = code, "account deactivated");
        Ok(())
    }

    /// Checks that `code` names an active account.
    pub(crate) fn ensure_postable(&self, code: &str) -> Result<(), SubmitError> {
        match self.accounts.get(code) {
            None => Err(SubmitError::UnknownAccount(code.to_string())),
            Some(account) if !account.is_active => {
                Err(SubmitError::InactiveAccount(code.to_string()))
            }
            Some(_) => Ok(()),
        }
    }
}

impl AccountLookup for InMemoryChart {
    /// Case-insensitive substring match on code or name, sorted by code.
    fn lookup(&self, query: &str) -> Result<Vec<Account>, LookupError> {
        let needle = query.trim().to_lowercase();
        let mut found: Vec<Account> = self
            .accounts
            .iter()
            .filter(|entry| {
                let account = entry.value();
                needle.is_empty()
                    || account.code.to_lowercase().contains(&needle)
                    || account.name.to_lowercase().contains(&needle)
            })
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(found)
    }
}
