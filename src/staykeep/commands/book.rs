use crate::catalog::Catalog;
use crate::commands::helpers::find_listing;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, StoreError};
use crate::format::nights_between;
use crate::model::{Reservation, ReservationStatus};
use crate::store::KvStore;
use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub listing_id: String,
    pub guest_name: String,
    pub guest_email: String,
    pub check_in: String,
    pub check_out: String,
    pub guests: u32,
}

/// Create a pending reservation for a listing.
///
/// The total is the nightly price times the number of nights, rounded to
/// cents. The listing's title and location are copied into the reservation.
pub fn run<S: KvStore, R: Rng>(
    catalog: &mut Catalog<S, R>,
    request: BookingRequest,
) -> Result<CmdResult> {
    if request.guest_name.trim().is_empty() {
        return Err(StoreError::Api("Guest name cannot be empty".into()));
    }
    if request.guests == 0 {
        return Err(StoreError::Api("A booking needs at least one guest".into()));
    }
    let nights = nights_between(&request.check_in, &request.check_out).ok_or_else(|| {
        StoreError::InvalidDate(format!(
            "{} → {} (check-out must be a date after check-in)",
            request.check_in, request.check_out
        ))
    })?;

    let loaded_listings = catalog.load_listings();
    let listing = find_listing(&loaded_listings.items, &request.listing_id)?;

    let reservation = Reservation {
        id: Uuid::new_v4().to_string(),
        guest_name: request.guest_name,
        guest_email: request.guest_email,
        listing_title: listing.title.clone(),
        listing_location: listing.location.clone(),
        check_in: request.check_in,
        check_out: request.check_out,
        guests: request.guests,
        total_price: ((listing.price * nights as f64) * 100.0).round() / 100.0,
        status: ReservationStatus::Pending,
        created_at: Utc::now().to_rfc3339(),
    };

    let mut loaded = catalog.load_reservations();
    let mut result = CmdResult::default();
    result.extend_messages(loaded.messages.drain(..));

    let mut reservations = std::mem::take(&mut loaded.items);
    reservations.push(reservation.clone());
    catalog.update_reservations(&reservations, &loaded)?;

    result.add_message(CmdMessage::success(format!(
        "Booked {} for {} night(s): {:.2}",
        reservation.listing_title, nights, reservation.total_price
    )));
    Ok(result.with_reservations(vec![reservation]))
}
