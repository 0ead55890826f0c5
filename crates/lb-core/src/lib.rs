//! lb-core: shared types, IDs, money, errors and configuration.
//!
//! This crate is the foundational dependency for the other lb-* crates,
//! providing type-safe row identifiers, an integer-cents money type, a
//! unified error type and application configuration.

pub mod config;
pub mod error;
pub mod ids;
pub mod money;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::*;
pub use money::Cents;
