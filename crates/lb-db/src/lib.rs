//! lb-db: database access and persistence layer.
//!
//! This crate provides SQLite-backed storage with connection pooling,
//! embedded migrations, typed models, the filtered property search and
//! query modules for users, properties, reservations and reviews. The
//! async [`Database`] handle is what application code holds on to.

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod search;
pub mod service;

pub use search::{PriceRange, PropertyFilter, SearchOptions, SearchStatement, DEFAULT_LIMIT};
pub use service::Database;
