use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, StoreError};
use crate::store::KvStore;
use rand::Rng;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Replace the listing collection with the records in a JSON file.
pub fn run<S: KvStore, R: Rng>(
    catalog: &mut Catalog<S, R>,
    path: &Path,
) -> Result<CmdResult> {
    let content = fs::read_to_string(path).map_err(StoreError::Io)?;
    let value: Value = serde_json::from_str(&content).map_err(StoreError::Serialization)?;

    let report = catalog.save_listings_value(&value)?;

    let mut result = CmdResult::default();
    result.extend_messages(report.messages);
    if report.dropped > 0 {
        result.add_message(CmdMessage::warning(format!(
            "{} record(s) in {} were not listings and were skipped.",
            report.dropped,
            path.display()
        )));
    }
    if report.side_keys_written > 0 || report.side_keys_pruned > 0 {
        result.add_message(CmdMessage::info(format!(
            "Image snapshots: {} written, {} pruned.",
            report.side_keys_written, report.side_keys_pruned
        )));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[test]
    fn imports_and_normalizes_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.json");
        fs::write(
            &path,
            r#"[{"id": "x", "title": "Loft", "images": ["i1", "i2"]}, null]"#,
        )
        .unwrap();

        let store = MemoryStore::new();
        let mut catalog = Catalog::new(&store);
        let result = run(&mut catalog, &path).unwrap();
        assert!(result
            .messages
            .iter()
            .any(|m| m.content.contains("1 record(s)")));

        let loaded = catalog.load_listings();
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0].image, "i1");
    }

    #[test]
    fn rejects_non_array_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listing.json");
        fs::write(&path, r#"{"id": "x"}"#).unwrap();

        let store = MemoryStore::new();
        let mut catalog = Catalog::new(&store);
        assert!(matches!(
            run(&mut catalog, &path),
            Err(StoreError::NotASequence(_))
        ));
        assert!(store.is_empty());
    }
}
