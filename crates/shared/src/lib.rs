//! Inkpost Shared Types and Utilities
//!
//! This crate contains the domain records, input validation and the record
//! store shared by the Inkpost binaries.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod error;
pub mod store;
pub mod types;

pub use error::*;
pub use store::MemoryStore;
pub use types::*;
