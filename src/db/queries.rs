use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{Booking, BookingId, NewBooking};

// ── Bookings ──

pub fn find_booking_at(conn: &Connection, date: &str, time: &str) -> rusqlite::Result<Option<i64>> {
    conn.query_row(
        "SELECT id FROM bookings WHERE date = ?1 AND time = ?2",
        params![date, time],
        |row| row.get(0),
    )
    .optional()
}

/// Single INSERT; the UNIQUE(date, time) index decides who wins a slot.
pub fn insert_booking(conn: &Connection, booking: &NewBooking) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO bookings (name, phone, service, date, time) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            booking.name,
            booking.phone,
            booking.service,
            booking.date,
            booking.time,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_booking_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Booking>> {
    conn.query_row(
        "SELECT id, name, phone, service, date, time, created_at FROM bookings WHERE id = ?1",
        params![id],
        parse_booking_row,
    )
    .optional()
}

pub fn get_all_bookings(conn: &Connection) -> rusqlite::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, phone, service, date, time, created_at
         FROM bookings ORDER BY date ASC, time ASC",
    )?;

    let rows = stmt.query_map([], parse_booking_row)?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

/// True when SQLite rejected a write because of a UNIQUE index.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn parse_booking_row(row: &rusqlite::Row) -> rusqlite::Result<Booking> {
    Ok(Booking {
        id: BookingId::Int(row.get(0)?),
        name: row.get(1)?,
        phone: row.get(2)?,
        service: row.get(3)?,
        date: row.get(4)?,
        time: row.get(5)?,
        status: None,
        created_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn booking(date: &str, time: &str) -> NewBooking {
        NewBooking {
            name: "Achieng".to_string(),
            phone: "0712345678".to_string(),
            service: "gel-manicure".to_string(),
            date: date.to_string(),
            time: time.to_string(),
        }
    }

    #[test]
    fn test_insert_and_find() {
        let conn = setup_db();
        assert_eq!(find_booking_at(&conn, "2026-11-02", "10:00").unwrap(), None);

        let id = insert_booking(&conn, &booking("2026-11-02", "10:00")).unwrap();
        assert_eq!(
            find_booking_at(&conn, "2026-11-02", "10:00").unwrap(),
            Some(id)
        );
        assert_eq!(find_booking_at(&conn, "2026-11-02", "11:00").unwrap(), None);

        let stored = get_booking_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(stored.name, "Achieng");
        assert!(stored.created_at.is_some());
    }

    #[test]
    fn test_duplicate_slot_is_unique_violation() {
        let conn = setup_db();
        insert_booking(&conn, &booking("2026-11-02", "10:00")).unwrap();

        let err = insert_booking(&conn, &booking("2026-11-02", "10:00")).unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[test]
    fn test_other_errors_are_not_unique_violations() {
        let conn = setup_db();
        let err = conn
            .execute(
                "INSERT INTO bookings (name, phone, service, date, time) VALUES (NULL, 'x', 'y', 'z', 'w')",
                [],
            )
            .unwrap_err();
        assert!(!is_unique_violation(&err));
    }

    #[test]
    fn test_get_all_bookings_ordered_by_date_then_time() {
        let conn = setup_db();
        insert_booking(&conn, &booking("2026-11-03", "09:00")).unwrap();
        insert_booking(&conn, &booking("2026-11-02", "14:00")).unwrap();
        insert_booking(&conn, &booking("2026-11-02", "10:00")).unwrap();

        let slots: Vec<(String, String)> = get_all_bookings(&conn)
            .unwrap()
            .into_iter()
            .map(|b| (b.date, b.time))
            .collect();
        assert_eq!(
            slots,
            vec![
                ("2026-11-02".to_string(), "10:00".to_string()),
                ("2026-11-02".to_string(), "14:00".to_string()),
                ("2026-11-03".to_string(), "09:00".to_string()),
            ]
        );
    }
}
