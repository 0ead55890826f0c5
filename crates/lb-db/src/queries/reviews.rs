//! Property reviews. Ratings feed the `average_rating` aggregate.

use lb_core::Result;
use rusqlite::Connection;

use crate::models::{NewReview, Review};

/// Record a guest's review of a stay. Ratings outside 1..=5 are rejected
/// by the schema and surface as a validation error.
pub fn add_review(conn: &Connection, review: &NewReview) -> Result<Review> {
    conn.query_row(
        "INSERT INTO property_reviews (guest_id, property_id, reservation_id, rating, message)
         VALUES (?1, ?2, ?3, ?4, ?5)
         RETURNING id, guest_id, property_id, reservation_id, rating, message",
        rusqlite::params![
            review.guest_id.get(),
            review.property_id.get(),
            review.reservation_id.get(),
            review.rating,
            review.message,
        ],
        Review::from_row,
    )
    .map_err(super::write_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use crate::queries::properties::tests::{reviewed, user};
    use lb_core::{Error, ReservationId};

    #[test]
    fn rating_out_of_range_is_validation_error() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let owner = user(&conn, "owner@example.com");
        let guest = user(&conn, "guest@example.com");
        let property = reviewed(&conn, owner, guest, "Loft", "Vancouver", 100, &[5]);

        let err = add_review(
            &conn,
            &NewReview {
                guest_id: guest,
                property_id: property,
                reservation_id: ReservationId::from(1),
                rating: 6,
                message: Some("too good".into()),
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "got {err:?}");
    }

    #[test]
    fn review_roundtrips_message() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let owner = user(&conn, "owner@example.com");
        let guest = user(&conn, "guest@example.com");
        let property = reviewed(&conn, owner, guest, "Loft", "Vancouver", 100, &[4]);

        let review = add_review(
            &conn,
            &NewReview {
                guest_id: guest,
                property_id: property,
                reservation_id: ReservationId::from(1),
                rating: 3,
                message: Some("Quiet street".into()),
            },
        )
        .unwrap();
        assert_eq!(review.rating, 3);
        assert_eq!(review.message.as_deref(), Some("Quiet street"));
        assert_eq!(review.property_id, property);
    }
}
