//! Rust structs mapping to database tables.
//!
//! Each model implements `from_row` for constructing itself from a
//! `rusqlite::Row`. The `New*` structs are the insert payloads callers
//! hand to the query modules.

use chrono::NaiveDate;
use lb_core::{Cents, PropertyId, ReservationId, ReviewId, UserId};
use serde::{Deserialize, Serialize};

/// Storage format of `start_date` / `end_date` columns.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Property column list, table-qualified so it survives joins. The order
/// matches [`Property::from_row`].
pub const PROPERTY_COLS: &str = "properties.id, properties.owner_id, properties.title,
    properties.description, properties.thumbnail_photo_url, properties.cover_photo_url,
    properties.cost_per_night, properties.street, properties.city, properties.province,
    properties.post_code, properties.country, properties.parking_spaces,
    properties.number_of_bathrooms, properties.number_of_bedrooms";

/// Number of columns in [`PROPERTY_COLS`].
const PROPERTY_COL_COUNT: usize = 15;

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

fn parse_id<T: From<i64>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T> {
    row.get::<_, i64>(idx).map(T::from)
}

fn parse_date(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let s: String = row.get(idx)?;
    NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Render a date the way it is stored.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Stored password hash. Never serialized.
    #[serde(skip_serializing)]
    pub password: String,
}

impl User {
    /// Build from a row selected as: id, name, email, password
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            password: row.get(3)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// Property
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub id: PropertyId,
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub cost_per_night: Cents,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub country: String,
    pub parking_spaces: i64,
    pub number_of_bathrooms: i64,
    pub number_of_bedrooms: i64,
}

impl Property {
    /// Build from a row whose leading columns are [`PROPERTY_COLS`].
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            owner_id: parse_id(row, 1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            thumbnail_photo_url: row.get(4)?,
            cover_photo_url: row.get(5)?,
            cost_per_night: Cents::new(row.get(6)?),
            street: row.get(7)?,
            city: row.get(8)?,
            province: row.get(9)?,
            post_code: row.get(10)?,
            country: row.get(11)?,
            parking_spaces: row.get(12)?,
            number_of_bathrooms: row.get(13)?,
            number_of_bedrooms: row.get(14)?,
        })
    }
}

/// Insert payload for a property. `cost_per_night` is in dollars and is
/// rounded to the cent on insert.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProperty {
    pub owner_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub cost_per_night: f64,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub country: String,
    #[serde(default)]
    pub parking_spaces: i64,
    #[serde(default)]
    pub number_of_bathrooms: i64,
    #[serde(default)]
    pub number_of_bedrooms: i64,
}

/// A property together with the average rating of its reviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyListing {
    #[serde(flatten)]
    pub property: Property,
    pub average_rating: f64,
}

impl PropertyListing {
    /// Build from a row selected as: [`PROPERTY_COLS`], average_rating
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            property: Property::from_row(row)?,
            average_rating: row.get(PROPERTY_COL_COUNT)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Reservation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub property_id: PropertyId,
    pub guest_id: UserId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Reservation {
    /// Build from a row selected as:
    /// id, property_id, guest_id, start_date, end_date
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            property_id: parse_id(row, 1)?,
            guest_id: parse_id(row, 2)?,
            start_date: parse_date(row, 3)?,
            end_date: parse_date(row, 4)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReservation {
    pub property_id: PropertyId,
    pub guest_id: UserId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A guest's reservation with the reserved property's headline details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservationSummary {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub title: String,
    pub cost_per_night: Cents,
    pub average_rating: f64,
}

impl ReservationSummary {
    /// Build from a row selected as:
    /// id, property_id, guest_id, start_date, end_date, title,
    /// cost_per_night, average_rating
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            reservation: Reservation::from_row(row)?,
            title: row.get(5)?,
            cost_per_night: Cents::new(row.get(6)?),
            average_rating: row.get(7)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Review
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub id: ReviewId,
    pub guest_id: UserId,
    pub property_id: PropertyId,
    pub reservation_id: ReservationId,
    pub rating: i64,
    pub message: Option<String>,
}

impl Review {
    /// Build from a row selected as:
    /// id, guest_id, property_id, reservation_id, rating, message
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            guest_id: parse_id(row, 1)?,
            property_id: parse_id(row, 2)?,
            reservation_id: parse_id(row, 3)?,
            rating: row.get(4)?,
            message: row.get(5)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    pub guest_id: UserId,
    pub property_id: PropertyId,
    pub reservation_id: ReservationId,
    pub rating: i64,
    #[serde(default)]
    pub message: Option<String>,
}
