use crate::catalog::Catalog;
use crate::commands::helpers::{find_reservation_mut, resolve_reservation_id};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::ReservationStatus;
use crate::store::KvStore;
use rand::Rng;

pub fn run<S: KvStore, R: Rng>(
    catalog: &Catalog<S, R>,
    id: &str,
    status: ReservationStatus,
) -> Result<CmdResult> {
    let mut loaded = catalog.load_reservations();
    let mut result = CmdResult::default();
    result.extend_messages(loaded.messages.drain(..));

    let mut reservations = std::mem::take(&mut loaded.items);
    let id = resolve_reservation_id(&reservations, id)?;
    let reservation = find_reservation_mut(&mut reservations, &id)?;

    if reservation.status == status {
        result.add_message(CmdMessage::info(format!(
            "Reservation {} is already {}.",
            id, status
        )));
        return Ok(result.with_reservations(vec![reservation.clone()]));
    }

    reservation.status = status;
    let updated = reservation.clone();
    catalog.update_reservations(&reservations, &loaded)?;

    result.add_message(CmdMessage::success(format!(
        "Reservation {} is now {}.",
        id, status
    )));
    Ok(result.with_reservations(vec![updated]))
}
