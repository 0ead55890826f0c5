//! User lookup and registration.

use lb_core::{Error, Result, UserId};
use rusqlite::Connection;

use crate::models::{NewUser, User};

/// Register a new user and return it. `password` is stored as given, so
/// callers hash it first.
pub fn add_user(conn: &Connection, user: &NewUser) -> Result<User> {
    let result = conn.query_row(
        "INSERT INTO users (name, email, password) VALUES (?1, ?2, ?3)
         RETURNING id, name, email, password",
        rusqlite::params![user.name, user.email, user.password],
        User::from_row,
    );
    match result {
        Ok(u) => Ok(u),
        Err(e) if e.to_string().contains("UNIQUE constraint failed") => Err(Error::Conflict(
            format!("Email '{}' is already registered", user.email),
        )),
        Err(e) => Err(super::write_error(e)),
    }
}

/// Get a user by email address.
pub fn get_user_with_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    let result = conn.query_row(
        "SELECT id, name, email, password FROM users WHERE email = ?1",
        [email],
        User::from_row,
    );
    match result {
        Ok(u) => Ok(Some(u)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Get a user by primary key.
pub fn get_user_with_id(conn: &Connection, id: UserId) -> Result<Option<User>> {
    let result = conn.query_row(
        "SELECT id, name, email, password FROM users WHERE id = ?1",
        [id.get()],
        User::from_row,
    );
    match result {
        Ok(u) => Ok(Some(u)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;

    fn alice() -> NewUser {
        NewUser {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password: "hash".into(),
        }
    }

    #[test]
    fn add_and_get_by_id() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let u = add_user(&conn, &alice()).unwrap();
        assert_eq!(u.name, "Alice");

        let found = get_user_with_id(&conn, u.id).unwrap().unwrap();
        assert_eq!(found.email, "alice@example.com");
        assert_eq!(found.password, "hash");
    }

    #[test]
    fn get_by_email() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let u = add_user(&conn, &alice()).unwrap();
        let found = get_user_with_email(&conn, "alice@example.com").unwrap();
        assert_eq!(found.map(|f| f.id), Some(u.id));
    }

    #[test]
    fn missing_user_is_none() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        assert!(get_user_with_id(&conn, UserId::from(99)).unwrap().is_none());
        assert!(get_user_with_email(&conn, "nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_conflicts() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        add_user(&conn, &alice()).unwrap();
        let err = add_user(&conn, &alice()).unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert!(err.to_string().contains("already registered"));
    }

    #[test]
    fn broken_connection_is_an_error_not_none() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        conn.execute_batch("DROP TABLE property_reviews; DROP TABLE reservations; DROP TABLE properties; DROP TABLE users;")
            .unwrap();
        let err = get_user_with_email(&conn, "alice@example.com").unwrap_err();
        assert!(err.is_database());
    }
}
