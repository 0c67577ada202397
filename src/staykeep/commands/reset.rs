use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::images::clear_side_keys;
use crate::store::{KvStore, LISTINGS_BACKUP_KEY, LISTINGS_KEY, RESERVATIONS_KEY};
use rand::Rng;

/// Remove everything staykeep stored. The next read seeds defaults again.
pub fn run<S: KvStore, R: Rng>(
    catalog: &Catalog<S, R>,
    skip_confirm: bool,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    if !skip_confirm {
        result.add_message(CmdMessage::warning(
            "This removes all listings, reservations and image snapshots. Re-run with --yes to confirm.",
        ));
        return Ok(result);
    }

    let store = catalog.store();
    for key in [LISTINGS_KEY, LISTINGS_BACKUP_KEY, RESERVATIONS_KEY] {
        store.remove(key)?;
    }
    let snapshots = clear_side_keys(store)?;

    result.add_message(CmdMessage::success(format!(
        "Store reset ({} image snapshot(s) removed).",
        snapshots
    )));
    Ok(result)
}
