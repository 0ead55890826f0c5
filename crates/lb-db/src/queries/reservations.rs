//! Reservation insert and per-guest listing.

use lb_core::{Error, Result, UserId};
use rusqlite::Connection;

use crate::models::{format_date, NewReservation, Reservation, ReservationSummary};

/// Book a property for a guest.
pub fn add_reservation(conn: &Connection, reservation: &NewReservation) -> Result<Reservation> {
    if reservation.end_date < reservation.start_date {
        return Err(Error::Validation(format!(
            "reservation ends ({}) before it starts ({})",
            reservation.end_date, reservation.start_date
        )));
    }

    conn.query_row(
        "INSERT INTO reservations (start_date, end_date, property_id, guest_id)
         VALUES (?1, ?2, ?3, ?4)
         RETURNING id, property_id, guest_id, start_date, end_date",
        rusqlite::params![
            format_date(reservation.start_date),
            format_date(reservation.end_date),
            reservation.property_id.get(),
            reservation.guest_id.get(),
        ],
        Reservation::from_row,
    )
    .map_err(super::write_error)
}

/// List a guest's reservations, earliest start date first, with the
/// property's title, nightly cost and average rating.
pub fn get_all_reservations(
    conn: &Connection,
    guest_id: UserId,
    limit: u32,
) -> Result<Vec<ReservationSummary>> {
    if limit == 0 {
        return Err(Error::Validation("reservation limit must be positive".into()));
    }

    let mut stmt = conn
        .prepare(
            "SELECT reservations.id, reservations.property_id, reservations.guest_id,
                reservations.start_date, reservations.end_date,
                properties.title, properties.cost_per_night,
                avg(property_reviews.rating) AS average_rating
             FROM reservations
             JOIN properties ON reservations.property_id = properties.id
             JOIN property_reviews ON properties.id = property_reviews.property_id
             WHERE reservations.guest_id = ?1
             GROUP BY properties.id, reservations.id
             ORDER BY reservations.start_date ASC
             LIMIT ?2",
        )
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map(
            rusqlite::params![guest_id.get(), i64::from(limit)],
            ReservationSummary::from_row,
        )
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use crate::queries::properties::tests::{reviewed, user};
    use chrono::NaiveDate;
    use lb_core::PropertyId;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    #[test]
    fn lists_by_start_date_with_property_details() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let owner = user(&conn, "owner@example.com");
        let reviewer = user(&conn, "reviewer@example.com");
        let guest = user(&conn, "guest@example.com");
        let loft = reviewed(&conn, owner, reviewer, "Loft", "Vancouver", 120, &[4, 5]);
        let cabin = reviewed(&conn, owner, reviewer, "Cabin", "Whistler", 80, &[3]);

        for (property, start) in [(loft, date(6, 10)), (cabin, date(3, 1)), (loft, date(4, 15))] {
            add_reservation(
                &conn,
                &NewReservation {
                    property_id: property,
                    guest_id: guest,
                    start_date: start,
                    end_date: start + chrono::Days::new(3),
                },
            )
            .unwrap();
        }

        let rows = get_all_reservations(&conn, guest, 10).unwrap();
        let starts: Vec<NaiveDate> = rows.iter().map(|r| r.reservation.start_date).collect();
        assert_eq!(starts, [date(3, 1), date(4, 15), date(6, 10)]);
        assert_eq!(rows[0].title, "Cabin");
        assert_eq!(rows[0].cost_per_night.get(), 8000);
        assert!((rows[1].average_rating - 4.5).abs() < f64::EPSILON);
        assert!(rows.iter().all(|r| r.reservation.guest_id == guest));

        let capped = get_all_reservations(&conn, guest, 2).unwrap();
        assert_eq!(capped.len(), 2);
    }

    #[test]
    fn guest_without_reservations_is_empty() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let guest = user(&conn, "guest@example.com");
        assert!(get_all_reservations(&conn, guest, 10).unwrap().is_empty());
    }

    #[test]
    fn end_before_start_is_rejected() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let err = add_reservation(
            &conn,
            &NewReservation {
                property_id: PropertyId::from(1),
                guest_id: UserId::from(1),
                start_date: date(5, 2),
                end_date: date(5, 1),
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn unknown_property_conflicts() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let guest = user(&conn, "guest@example.com");
        let err = add_reservation(
            &conn,
            &NewReservation {
                property_id: PropertyId::from(404),
                guest_id: guest,
                start_date: date(5, 1),
                end_date: date(5, 3),
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }
}
