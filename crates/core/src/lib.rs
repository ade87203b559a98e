//! Journal entry logic for Tally.
//!
//! This crate contains pure business logic with ZERO storage dependencies.
//! Persistence and account search sit behind the traits in
//! [`journal::ports`].
//!
//! # Modules
//!
//! - `journal` - Line editing, totals, balance policy, auto-balance, validation
//! - `workflow` - Entry status lifecycle and reversing entries

pub mod journal;
pub mod workflow;
