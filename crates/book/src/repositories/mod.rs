//! In-memory repositories.
//!
//! - `account` - Chart of accounts
//! - `journal` - Stored journal entries and their lifecycle
//! - `query` - Listing filters, account register, statistics

pub mod account;
pub mod journal;
pub mod query;
