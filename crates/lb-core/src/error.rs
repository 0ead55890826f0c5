//! Unified error type for the LightBnB data layer.
//!
//! Every query and service call funnels its failures into [`Error`]. A
//! failed statement is always an `Err`; an absent row is `Ok(None)` and an
//! empty result set is `Ok(vec![])`, so callers can tell them apart. Callers
//! that require a row turn `None` into [`Error::not_found`].

use std::fmt;

/// Unified error type covering all failure modes of the data layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "user", "property").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// Request data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A uniqueness or foreign key constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The database could not be reached or rejected the statement.
    #[error("Database error: {source}")]
    Database {
        /// The underlying database error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Reading a file (such as the config) failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Database`].
    pub fn database(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Database {
            source: source.into(),
        }
    }

    /// Whether the failure came from the execution service rather than the
    /// caller's input.
    pub fn is_database(&self) -> bool {
        matches!(self, Error::Database { .. })
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
