//! Async database handle.
//!
//! [`Database`] owns the connection pool and is created once at startup,
//! then cloned into whatever needs it. Each call checks out one connection
//! on tokio's blocking pool, runs a single query function and hands the
//! connection back. Dropping the last clone (or calling
//! [`Database::close`]) closes every pooled connection.

use lb_core::config::DatabaseConfig;
use lb_core::{Error, PropertyId, Result, UserId};
use rusqlite::Connection;

use crate::models::{
    NewProperty, NewReservation, NewReview, NewUser, Property, PropertyListing, Reservation,
    ReservationSummary, Review, User,
};
use crate::pool::{self, DbPool};
use crate::queries::{properties, reservations, reviews, users};
use crate::search::SearchOptions;

/// Cheaply cloneable handle to the pooled database.
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Open (and migrate) the on-disk database described by `config`.
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        Ok(Self {
            pool: pool::init_pool(config)?,
        })
    }

    /// Open a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            pool: pool::init_memory_pool()?,
        })
    }

    /// Release this handle. Connections close once every clone is gone.
    pub fn close(self) {
        let state = self.pool.state();
        tracing::debug!(
            connections = state.connections,
            idle = state.idle_connections,
            "Closing database handle"
        );
    }

    /// Run `f` against a pooled connection without blocking the runtime.
    async fn run<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool::get_conn(&pool)?;
            f(&*conn)
        })
        .await
        .map_err(|e| Error::Internal(format!("spawn_blocking join error: {e}")))?
    }

    /// Filtered property search. See [`crate::search`].
    pub async fn search_properties(
        &self,
        options: SearchOptions,
        limit: u32,
    ) -> Result<Vec<PropertyListing>> {
        self.run(move |conn| properties::search_properties(conn, &options, limit))
            .await
    }

    pub async fn get_property(&self, id: PropertyId) -> Result<Option<Property>> {
        self.run(move |conn| properties::get_property(conn, id)).await
    }

    pub async fn add_property(&self, property: NewProperty) -> Result<Property> {
        self.run(move |conn| properties::add_property(conn, &property))
            .await
    }

    pub async fn get_user_with_email(&self, email: impl Into<String>) -> Result<Option<User>> {
        let email = email.into();
        self.run(move |conn| users::get_user_with_email(conn, &email))
            .await
    }

    pub async fn get_user_with_id(&self, id: UserId) -> Result<Option<User>> {
        self.run(move |conn| users::get_user_with_id(conn, id)).await
    }

    pub async fn add_user(&self, user: NewUser) -> Result<User> {
        self.run(move |conn| users::add_user(conn, &user)).await
    }

    pub async fn get_all_reservations(
        &self,
        guest_id: UserId,
        limit: u32,
    ) -> Result<Vec<ReservationSummary>> {
        self.run(move |conn| reservations::get_all_reservations(conn, guest_id, limit))
            .await
    }

    pub async fn add_reservation(&self, reservation: NewReservation) -> Result<Reservation> {
        self.run(move |conn| reservations::add_reservation(conn, &reservation))
            .await
    }

    pub async fn add_review(&self, review: NewReview) -> Result<Review> {
        self.run(move |conn| reviews::add_review(conn, &review)).await
    }
}
