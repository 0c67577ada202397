use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::images::prune_side_keys;
use crate::model::json_kind;
use crate::store::{KvStore, LISTINGS_BACKUP_KEY, LISTINGS_KEY, RESERVATIONS_KEY};
use rand::Rng;
use serde_json::Value;

/// State of one persisted copy of a collection.
#[derive(Debug, Clone, PartialEq)]
enum CopyState {
    Missing,
    Corrupt(String),
    Valid { raw: String, value: Value },
}

impl CopyState {
    fn describe(&self) -> String {
        match self {
            CopyState::Missing => "missing".to_string(),
            CopyState::Corrupt(why) => format!("unreadable ({})", why),
            CopyState::Valid { .. } => "valid".to_string(),
        }
    }
}

fn inspect<S: KvStore>(store: &S, key: &str) -> CopyState {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return CopyState::Missing,
        Err(e) => return CopyState::Corrupt(e.to_string()),
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(value @ Value::Array(_)) => CopyState::Valid { raw, value },
        Ok(other) => CopyState::Corrupt(format!("{}, not an array", json_kind(&other))),
        Err(e) => CopyState::Corrupt(e.to_string()),
    }
}

/// Detect and repair divergence between the primary and backup listing copies,
/// then enforce the image snapshot limit.
pub fn run<S: KvStore, R: Rng>(catalog: &mut Catalog<S, R>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let primary = inspect(catalog.store(), LISTINGS_KEY);
    let backup = inspect(catalog.store(), LISTINGS_BACKUP_KEY);
    let mut issues = 0;

    match (&primary, &backup) {
        (CopyState::Valid { value: p, .. }, CopyState::Valid { value: b, .. }) if p == b => {}
        (CopyState::Valid { raw, .. }, other) => {
            issues += 1;
            catalog.store().set(LISTINGS_BACKUP_KEY, raw)?;
            result.add_message(CmdMessage::warning(format!(
                "Backup copy was {}; rewritten from the primary copy.",
                match other {
                    CopyState::Valid { .. } => "out of date".to_string(),
                    state => state.describe(),
                }
            )));
        }
        (state, CopyState::Valid { value, .. }) => {
            issues += 1;
            let report = catalog.save_listings_value(value)?;
            result.add_message(CmdMessage::warning(format!(
                "Primary copy was {}; restored {} listing(s) from the backup copy.",
                state.describe(),
                report.saved
            )));
        }
        (CopyState::Missing, CopyState::Missing) => {
            result.add_message(CmdMessage::info("No listings stored yet."));
        }
        (p, b) => {
            issues += 1;
            result.add_message(CmdMessage::warning(format!(
                "Primary copy is {} and backup copy is {}.",
                p.describe(),
                b.describe()
            )));
            catalog.store().remove(LISTINGS_KEY)?;
            let loaded = catalog.load_listings();
            result.add_message(CmdMessage::warning(format!(
                "Reseeded {} default listing(s).",
                loaded.items.len()
            )));
        }
    }

    let limit = catalog.config().image_history_limit;
    let pruned = prune_side_keys(catalog.store(), limit)?;
    if pruned > 0 {
        issues += 1;
        result.add_message(CmdMessage::info(format!(
            "Removed {} image snapshot(s) beyond the limit of {} per listing.",
            pruned, limit
        )));
    }

    if let CopyState::Corrupt(why) = inspect(catalog.store(), RESERVATIONS_KEY) {
        issues += 1;
        result.add_message(CmdMessage::error(format!(
            "Reservations are unreadable ({}); bookings and status changes are refused until they are fixed. Left untouched.",
            why
        )));
    }

    if issues == 0 {
        result.add_message(CmdMessage::success("No inconsistencies found."));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LoadSource;
    use crate::config::StoreConfig;
    use crate::images::{count_side_keys, side_key};
    use crate::model::Listing;
    use crate::store::memory::MemoryStore;

    #[test]
    fn consistent_store_reports_nothing() {
        let store = MemoryStore::new();
        let mut catalog = Catalog::new(&store);
        catalog.save_listings(&[Listing::new("a", "A", 1.0)]).unwrap();

        let result = run(&mut catalog).unwrap();
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].content, "No inconsistencies found.");
    }

    #[test]
    fn stale_backup_is_rewritten() {
        let store = MemoryStore::new();
        let mut catalog = Catalog::new(&store);
        catalog.save_listings(&[Listing::new("a", "A", 1.0)]).unwrap();
        store.set(LISTINGS_BACKUP_KEY, "[]").unwrap();

        run(&mut catalog).unwrap();
        assert_eq!(store.get(LISTINGS_BACKUP_KEY).unwrap(), store.get(LISTINGS_KEY).unwrap());
    }

    #[test]
    fn corrupt_primary_is_restored_from_backup() {
        let store = MemoryStore::new();
        store.set(LISTINGS_KEY, "{oops").unwrap();
        store
            .set(LISTINGS_BACKUP_KEY, r#"[{"id":"b","images":["b1"]}]"#)
            .unwrap();
        let mut catalog = Catalog::new(&store);

        run(&mut catalog).unwrap();
        let loaded = catalog.load_listings();
        assert_eq!(loaded.source, LoadSource::Primary);
        assert_eq!(loaded.items[0].image, "b1");
    }

    #[test]
    fn unreadable_copies_are_reseeded() {
        let store = MemoryStore::new();
        store.set(LISTINGS_KEY, "{oops").unwrap();
        let mut catalog = Catalog::new(&store);

        run(&mut catalog).unwrap();
        assert_eq!(catalog.load_listings().source, LoadSource::Primary);
    }

    #[test]
    fn prunes_snapshots_beyond_limit() {
        let store = MemoryStore::new();
        for ts in 1..=4 {
            store.set(&side_key("a", ts), r#"["x"]"#).unwrap();
        }
        let config = StoreConfig {
            image_history_limit: 1,
            ..StoreConfig::default()
        };
        let mut catalog = Catalog::new(&store).with_config(config);

        run(&mut catalog).unwrap();
        assert_eq!(count_side_keys(&store).unwrap(), 1);
    }

    #[test]
    fn flags_corrupt_reservations() {
        let store = MemoryStore::new();
        store.set(RESERVATIONS_KEY, "nope").unwrap();
        let mut catalog = Catalog::new(&store);

        let result = run(&mut catalog).unwrap();
        assert!(result
            .messages
            .iter()
            .any(|m| m.content.starts_with("Reservations are unreadable")));
        assert_eq!(store.get(RESERVATIONS_KEY).unwrap().as_deref(), Some("nope"));
    }
}
