//! Per-listing image snapshots ("side keys").
//!
//! Every save batch writes each listing's image array under
//! `listing_images_{id}_{timestamp}`. The timestamp is shared by the whole batch.
//! Snapshots beyond the configured limit are pruned oldest first.

use crate::error::Result;
use crate::store::{KvStore, IMAGE_KEY_PREFIX};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ImageSnapshot {
    pub key: String,
    pub listing_id: String,
    pub timestamp: i64,
    pub images: Vec<String>,
}

impl ImageSnapshot {
    pub fn written_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

pub fn side_key(listing_id: &str, timestamp: i64) -> String {
    format!("{}{}_{}", IMAGE_KEY_PREFIX, listing_id, timestamp)
}

/// Split a side key into listing id and timestamp.
///
/// The timestamp is everything after the last underscore, so ids may contain
/// underscores themselves.
pub fn parse_side_key(key: &str) -> Option<(&str, i64)> {
    let rest = key.strip_prefix(IMAGE_KEY_PREFIX)?;
    let (id, ts) = rest.rsplit_once('_')?;
    if id.is_empty() {
        return None;
    }
    Some((id, ts.parse().ok()?))
}

/// All side keys grouped by listing id, each group sorted oldest first.
fn side_keys_by_listing<S: KvStore>(store: &S) -> Result<HashMap<String, Vec<(i64, String)>>> {
    let mut groups: HashMap<String, Vec<(i64, String)>> = HashMap::new();
    for key in store.keys()? {
        if let Some((id, ts)) = parse_side_key(&key) {
            groups
                .entry(id.to_string())
                .or_default()
                .push((ts, key.clone()));
        }
    }
    for keys in groups.values_mut() {
        keys.sort();
    }
    Ok(groups)
}

/// Snapshots for one listing, oldest first. Values that no longer decode
/// are skipped.
pub fn image_history<S: KvStore>(store: &S, listing_id: &str) -> Result<Vec<ImageSnapshot>> {
    let groups = side_keys_by_listing(store)?;
    let Some(keys) = groups.get(listing_id) else {
        return Ok(Vec::new());
    };

    let mut history = Vec::with_capacity(keys.len());
    for (timestamp, key) in keys {
        let Some(raw) = store.get(key)? else {
            continue;
        };
        if let Ok(images) = serde_json::from_str::<Vec<String>>(&raw) {
            history.push(ImageSnapshot {
                key: key.clone(),
                listing_id: listing_id.to_string(),
                timestamp: *timestamp,
                images,
            });
        }
    }
    Ok(history)
}

/// Number of side keys currently stored, across all listings.
pub fn count_side_keys<S: KvStore>(store: &S) -> Result<usize> {
    Ok(store
        .keys()?
        .iter()
        .filter(|k| parse_side_key(k).is_some())
        .count())
}

/// Keep only the newest `keep` snapshots of every listing. Returns how many
/// keys were removed.
pub fn prune_side_keys<S: KvStore>(store: &S, keep: usize) -> Result<usize> {
    let mut removed = 0;
    for keys in side_keys_by_listing(store)?.values() {
        let excess = keys.len().saturating_sub(keep);
        for (_, key) in &keys[..excess] {
            store.remove(key)?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Remove every side key. Returns how many were removed.
pub fn clear_side_keys<S: KvStore>(store: &S) -> Result<usize> {
    prune_side_keys(store, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn put(store: &MemoryStore, id: &str, ts: i64, images: &[&str]) {
        store
            .set(&side_key(id, ts), &serde_json::to_string(images).unwrap())
            .unwrap();
    }

    #[test]
    fn side_key_format() {
        assert_eq!(side_key("a", 1700000000000), "listing_images_a_1700000000000");
    }

    #[test]
    fn parse_handles_underscored_ids() {
        assert_eq!(parse_side_key("listing_images_a_b_12"), Some(("a_b", 12)));
        assert_eq!(parse_side_key("listing_images_x_notanumber"), None);
        assert_eq!(parse_side_key("listing_images__12"), None);
        assert_eq!(parse_side_key("listings"), None);
    }

    #[test]
    fn history_is_sorted_oldest_first() {
        let store = MemoryStore::new();
        put(&store, "a", 30, &["c"]);
        put(&store, "a", 10, &["a"]);
        put(&store, "a", 20, &["b"]);
        put(&store, "b", 15, &["other"]);

        let history = image_history(&store, "a").unwrap();
        let stamps: Vec<i64> = history.iter().map(|s| s.timestamp).collect();
        assert_eq!(stamps, vec![10, 20, 30]);
        assert_eq!(history[2].images, vec!["c"]);
    }

    #[test]
    fn history_skips_corrupt_snapshots() {
        let store = MemoryStore::new();
        put(&store, "a", 1, &["ok"]);
        store.set(&side_key("a", 2), "{not json").unwrap();
        assert_eq!(image_history(&store, "a").unwrap().len(), 1);
    }

    #[test]
    fn prune_keeps_newest_per_listing() {
        let store = MemoryStore::new();
        for ts in 1..=4 {
            put(&store, "a", ts, &["x"]);
        }
        put(&store, "b", 9, &["y"]);

        let removed = prune_side_keys(&store, 2).unwrap();
        assert_eq!(removed, 2);

        let stamps: Vec<i64> = image_history(&store, "a")
            .unwrap()
            .iter()
            .map(|s| s.timestamp)
            .collect();
        assert_eq!(stamps, vec![3, 4]);
        assert_eq!(image_history(&store, "b").unwrap().len(), 1);
    }

    #[test]
    fn clear_removes_only_side_keys() {
        let store = MemoryStore::new();
        put(&store, "a", 1, &["x"]);
        store.set("listings", "[]").unwrap();

        assert_eq!(clear_side_keys(&store).unwrap(), 1);
        assert_eq!(count_side_keys(&store).unwrap(), 0);
        assert!(store.get("listings").unwrap().is_some());
    }
}
