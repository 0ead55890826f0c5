//! Database query modules.

pub mod properties;
pub mod reservations;
pub mod reviews;
pub mod users;

use lb_core::Error;

/// Classify a failed write: constraint failures are the caller's problem,
/// everything else is reported as a database error.
pub(crate) fn write_error(e: rusqlite::Error) -> Error {
    match e.sqlite_error_code() {
        Some(rusqlite::ErrorCode::ConstraintViolation) => {
            let msg = e.to_string();
            if msg.contains("CHECK constraint failed") {
                Error::Validation(msg)
            } else {
                Error::Conflict(msg)
            }
        }
        _ => Error::database(e.to_string()),
    }
}
