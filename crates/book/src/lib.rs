//! In-memory collaborators for Tally.
//!
//! - [`InMemoryChart`] implements `AccountLookup`
//! - [`JournalBook`] implements `LedgerSubmitter` and keeps stored entries
//!   with their lifecycle, listing, account register, and statistics
//!
//! Nothing here is persisted; state lives for the life of the value.

pub mod error;
pub mod repositories;
pub mod seed;

pub use error::BookError;
pub use repositories::account::InMemoryChart;
pub use repositories::journal::{JournalBook, StoredEntry};
pub use repositories::query::{AccountRegister, EntryFilter, JournalStatistics, RegisterRow};
