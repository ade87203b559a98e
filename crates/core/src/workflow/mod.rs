//! Journal entry lifecycle for Tally.
//!
//! This module implements the entry status state machine and the
//! creation of reversing entries.
//!
//! # Modules
//!
//! - `types` - Lifecycle types (EntryStatus, WorkflowAction)
//! - `error` - Workflow-specific error types
//! - `service` - State transition logic
//! - `reversal` - Reversing entry creation

pub mod error;
pub mod reversal;
pub mod service;
pub mod types;

#[cfg(test)]
mod reversal_props;
#[cfg(test)]
mod service_props;

pub use error::WorkflowError;
pub use reversal::ReversalService;
pub use service::WorkflowService;
pub use types::{EntryStatus, WorkflowAction};
