//! Reservation export: CSV, iCalendar and Google Calendar links.
//!
//! These are pure formatting functions; writing files is left to the caller.

use crate::error::{Result, StoreError};
use crate::format::{date_or_today, parse_date};
use crate::model::{Reservation, ReservationStatus};
use chrono::NaiveDate;
use icalendar::{Calendar, Component, EventLike};
use url::Url;

pub const CSV_HEADER: &str =
    "ID,Guest,Email,Listing,Location,Check-in,Check-out,Guests,Price,Status,Created";
const UID_DOMAIN: &str = "staykeep";
const GOOGLE_CALENDAR_RENDER: &str = "https://calendar.google.com/calendar/render";

/// One header line and one fully quoted row per reservation.
pub fn reservations_csv(reservations: &[Reservation]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for r in reservations {
        let fields = [
            r.id.clone(),
            r.guest_name.clone(),
            r.guest_email.clone(),
            r.listing_title.clone(),
            r.listing_location.clone(),
            r.check_in.clone(),
            r.check_out.clone(),
            r.guests.to_string(),
            r.total_price.to_string(),
            r.status.to_string(),
            r.created_at.clone(),
        ];
        let row: Vec<String> = fields.iter().map(|f| csv_quote(f)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

pub fn csv_filename(date: NaiveDate) -> String {
    format!("reservations_export_{}.csv", date.format("%Y-%m-%d"))
}

/// A calendar holding one all-day event for the stay.
///
/// Unparseable dates fall back to today, so the event is always produced.
pub fn ical_event(reservation: &Reservation) -> String {
    let start = date_or_today(&reservation.check_in);
    let end = date_or_today(&reservation.check_out);
    let status = match reservation.status {
        ReservationStatus::Cancelled => "CANCELLED",
        ReservationStatus::Pending => "TENTATIVE",
        ReservationStatus::Confirmed | ReservationStatus::Other => "CONFIRMED",
    };

    let event = icalendar::Event::new()
        .uid(&format!("{}@{}", reservation.id, UID_DOMAIN))
        .summary(&format!("Stay at {}", reservation.listing_title))
        .description(&format!(
            "Reservation #{} for {} guest(s)\nAddress: {}",
            reservation.id, reservation.guests, reservation.listing_location
        ))
        .location(&reservation.listing_location)
        .starts(start)
        .ends(end)
        .add_property("STATUS", status)
        .done();

    let mut cal = Calendar::new();
    cal.push(event);
    cal.done().to_string()
}

pub fn ical_filename(reservation: &Reservation) -> String {
    format!("reservation-{}.ics", reservation.id)
}

/// Link that opens Google Calendar's "new event" form prefilled with the stay.
pub fn google_calendar_url(reservation: &Reservation) -> Result<String> {
    let start = parse_date(&reservation.check_in)
        .ok_or_else(|| StoreError::InvalidDate(reservation.check_in.clone()))?;
    let end = parse_date(&reservation.check_out)
        .ok_or_else(|| StoreError::InvalidDate(reservation.check_out.clone()))?;

    let dates = format!("{}/{}", start.format("%Y%m%d"), end.format("%Y%m%d"));
    let text = format!("Stay at {}", reservation.listing_title);
    let details = format!(
        "Reservation #{} for {} guest(s)",
        reservation.id, reservation.guests
    );

    let url = Url::parse_with_params(
        GOOGLE_CALENDAR_RENDER,
        &[
            ("action", "TEMPLATE"),
            ("text", text.as_str()),
            ("dates", dates.as_str()),
            ("details", details.as_str()),
            ("location", reservation.listing_location.as_str()),
        ],
    )
    .map_err(|e| StoreError::Api(format!("Could not build calendar link: {}", e)))?;
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reservation() -> Reservation {
        Reservation {
            id: "r-42".into(),
            guest_name: "Ama \"Mimi\" Mensah".into(),
            guest_email: "ama@example.com".into(),
            listing_title: "Lagoon bungalow".into(),
            listing_location: "Baguida, Lomé, Togo".into(),
            check_in: "2024-07-10".into(),
            check_out: "2024-07-13".into(),
            guests: 2,
            total_price: 285.5,
            status: ReservationStatus::Confirmed,
            created_at: "2024-06-01T09:30:00Z".into(),
        }
    }

    #[test]
    fn csv_has_header_and_quoted_rows() {
        let csv = reservations_csv(&[reservation()]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[1].starts_with("\"r-42\",\"Ama \"\"Mimi\"\" Mensah\","));
        assert!(lines[1].contains("\"2\",\"285.5\",\"confirmed\""));
    }

    #[test]
    fn csv_of_nothing_is_just_the_header() {
        assert_eq!(reservations_csv(&[]), format!("{}\n", CSV_HEADER));
    }

    #[test]
    fn csv_filename_uses_date() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        assert_eq!(csv_filename(date), "reservations_export_2024-07-01.csv");
    }

    #[test]
    fn ical_contains_all_day_event() {
        let ics = ical_event(&reservation());
        assert!(ics.contains("BEGIN:VCALENDAR"));
        assert!(ics.contains("BEGIN:VEVENT"));
        assert!(ics.contains("20240710"));
        assert!(ics.contains("20240713"));
        assert!(ics.contains("UID:r-42@staykeep"));
        assert!(ics.contains("SUMMARY:Stay at Lagoon bungalow"));
        assert!(ics.contains("STATUS:CONFIRMED"));
    }

    #[test]
    fn ical_status_follows_reservation() {
        let mut r = reservation();
        r.status = ReservationStatus::Cancelled;
        assert!(ical_event(&r).contains("STATUS:CANCELLED"));
        r.status = ReservationStatus::Pending;
        assert!(ical_event(&r).contains("STATUS:TENTATIVE"));
    }

    #[test]
    fn ical_tolerates_bad_dates() {
        let mut r = reservation();
        r.check_in = "whenever".into();
        let ics = ical_event(&r);
        let today = chrono::Utc::now().date_naive().format("%Y%m%d").to_string();
        assert!(ics.contains(&today));
    }

    #[test]
    fn google_link_encodes_fields() {
        let url = google_calendar_url(&reservation()).unwrap();
        assert!(url.starts_with("https://calendar.google.com/calendar/render?action=TEMPLATE"));
        assert!(url.contains("dates=20240710%2F20240713"));
        assert!(url.contains("text=Stay+at+Lagoon+bungalow"));
    }

    #[test]
    fn google_link_rejects_bad_dates() {
        let mut r = reservation();
        r.check_out = "later".into();
        assert!(matches!(
            google_calendar_url(&r),
            Err(StoreError::InvalidDate(d)) if d == "later"
        ));
    }

    #[test]
    fn ical_filename_uses_id() {
        assert_eq!(ical_filename(&reservation()), "reservation-r-42.ics");
    }
}
