use crate::catalog::Catalog;
use crate::commands::helpers::resolve_reservation_id;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, StoreError};
use crate::export::{csv_filename, google_calendar_url, ical_event, ical_filename, reservations_csv};
use crate::format::format_ical_date;
use crate::store::KvStore;
use chrono::Utc;
use rand::Rng;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportFormat {
    /// All reservations as one CSV file.
    Csv,
    /// One reservation as an .ics file.
    Ical(String),
    /// One reservation as a Google Calendar link.
    GoogleCalendar(String),
}

pub fn run<S: KvStore, R: Rng>(
    catalog: &Catalog<S, R>,
    format: ExportFormat,
    out_dir: &Path,
) -> Result<CmdResult> {
    let loaded = catalog.load_reservations();
    let mut result = CmdResult::default();
    result.extend_messages(loaded.messages);
    let reservations = loaded.items;

    match format {
        ExportFormat::Csv => {
            if reservations.is_empty() {
                result.add_message(CmdMessage::warning("No reservations to export."));
                return Ok(result);
            }
            let path = out_dir.join(csv_filename(Utc::now().date_naive()));
            fs::write(&path, reservations_csv(&reservations)).map_err(StoreError::Io)?;
            result.add_message(CmdMessage::success(format!(
                "Exported {} reservation(s) to {}",
                reservations.len(),
                path.display()
            )));
            result.written_files.push(path);
        }
        ExportFormat::Ical(id) => {
            let id = resolve_reservation_id(&reservations, &id)?;
            let Some(reservation) = reservations.iter().find(|r| r.id == id) else {
                return Err(StoreError::ReservationNotFound(id));
            };
            let path = out_dir.join(ical_filename(reservation));
            fs::write(&path, ical_event(reservation)).map_err(StoreError::Io)?;
            result.add_message(CmdMessage::success(format!(
                "Exported stay {} - {} to {}",
                format_ical_date(&reservation.check_in),
                format_ical_date(&reservation.check_out),
                path.display()
            )));
            result.written_files.push(path);
        }
        ExportFormat::GoogleCalendar(id) => {
            let id = resolve_reservation_id(&reservations, &id)?;
            let Some(reservation) = reservations.iter().find(|r| r.id == id) else {
                return Err(StoreError::ReservationNotFound(id));
            };
            result.links.push(google_calendar_url(reservation)?);
        }
    }

    Ok(result)
}
