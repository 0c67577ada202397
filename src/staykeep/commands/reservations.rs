use crate::catalog::Catalog;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::ReservationStatus;
use crate::store::KvStore;
use rand::Rng;

pub fn run<S: KvStore, R: Rng>(
    catalog: &Catalog<S, R>,
    status: Option<ReservationStatus>,
) -> Result<CmdResult> {
    let loaded = catalog.load_reservations();
    let reservations = match status {
        Some(status) => loaded
            .items
            .into_iter()
            .filter(|r| r.status == status)
            .collect(),
        None => loaded.items,
    };

    let mut result = CmdResult::default()
        .with_reservations(reservations)
        .with_source(loaded.source);
    result.extend_messages(loaded.messages);
    Ok(result)
}
