//! Common types used across the application.

pub mod id;
pub mod money;
pub mod pagination;

pub use id::*;
pub use money::{Currency, MAX_AMOUNT, non_negative, parse_amount, within_limit};
pub use pagination::{PageMeta, PageRequest, PageResponse};
