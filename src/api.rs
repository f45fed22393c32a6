//! Public API surface for explorer consumers.
//!
//! Groups the reader facade with the error and data types it produces, so
//! callers can read a store without touching the client boundary directly.

pub mod error;
pub mod facade;
pub mod types;

pub mod prelude {
    pub use super::error::{ReaderError, ReaderResult};
    pub use super::facade::{Filter, ImmuDbReader, ReaderConfig, TransactionReader};
    pub use super::types::*;
}
