//! Property insert, lookup, and filtered search.

use lb_core::{Cents, Error, PropertyId, Result};
use rusqlite::Connection;

use crate::models::{NewProperty, Property, PropertyListing, PROPERTY_COLS};
use crate::search::{SearchOptions, SearchStatement};

/// Insert a property. The nightly cost arrives in dollars and is stored in
/// cents.
pub fn add_property(conn: &Connection, property: &NewProperty) -> Result<Property> {
    let cost = Cents::from_dollars(property.cost_per_night)?;
    let q = format!(
        "INSERT INTO properties (owner_id, title, description, thumbnail_photo_url,
            cover_photo_url, cost_per_night, street, city, province, post_code, country,
            parking_spaces, number_of_bathrooms, number_of_bedrooms)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14)
         RETURNING {}",
        PROPERTY_COLS.replace("properties.", "")
    );
    conn.query_row(
        &q,
        rusqlite::params![
            property.owner_id.get(),
            property.title,
            property.description,
            property.thumbnail_photo_url,
            property.cover_photo_url,
            cost.get(),
            property.street,
            property.city,
            property.province,
            property.post_code,
            property.country,
            property.parking_spaces,
            property.number_of_bathrooms,
            property.number_of_bedrooms,
        ],
        Property::from_row,
    )
    .map_err(super::write_error)
}

/// Get a property by ID.
pub fn get_property(conn: &Connection, id: PropertyId) -> Result<Option<Property>> {
    let q = format!("SELECT {PROPERTY_COLS} FROM properties WHERE properties.id = ?1");
    let result = conn.query_row(&q, [id.get()], Property::from_row);
    match result {
        Ok(p) => Ok(Some(p)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Search reviewed properties matching `options`, cheapest first, at most
/// `limit` rows.
///
/// Properties without any review never match: the rating is an inner-join
/// aggregate.
pub fn search_properties(
    conn: &Connection,
    options: &SearchOptions,
    limit: u32,
) -> Result<Vec<PropertyListing>> {
    let stmt = SearchStatement::build(options, limit)?;
    tracing::debug!(sql = %stmt.sql, params = ?stmt.params, "Searching properties");

    let mut prepared = conn
        .prepare(&stmt.sql)
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = prepared
        .query_map(
            rusqlite::params_from_iter(stmt.params.iter()),
            PropertyListing::from_row,
        )
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}
