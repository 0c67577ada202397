use crate::catalog::Catalog;
use crate::commands::helpers::find_listing;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::KvStore;
use rand::Rng;

/// A single listing together with its image snapshots.
pub fn run<S: KvStore, R: Rng>(catalog: &mut Catalog<S, R>, id: &str) -> Result<CmdResult> {
    let loaded = catalog.load_listings();
    let listing = find_listing(&loaded.items, id)?.clone();

    let mut result = CmdResult::default().with_source(loaded.source);
    result.extend_messages(loaded.messages);

    match catalog.image_history(id) {
        Ok(snapshots) => result = result.with_snapshots(snapshots),
        Err(e) => result.add_message(CmdMessage::warning(format!(
            "Could not read image history: {}",
            e
        ))),
    }

    Ok(result.with_listings(vec![listing]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::model::Listing;
    use crate::store::memory::MemoryStore;

    #[test]
    fn shows_listing_with_history() {
        let store = MemoryStore::new();
        let mut catalog = Catalog::new(&store);
        let listing = Listing::new("a", "A", 10.0).with_images(vec!["a1".into()]);
        catalog.save_listings(&[listing.clone()]).unwrap();
        catalog
            .save_listings(&[listing.with_images(vec!["a2".into()])])
            .unwrap();

        let result = run(&mut catalog, "a").unwrap();
        assert_eq!(result.listings[0].image, "a2");
        assert_eq!(result.snapshots.len(), 2);
        assert_eq!(result.snapshots[0].images, vec!["a1"]);
    }

    #[test]
    fn unknown_listing_is_an_error() {
        let store = MemoryStore::new();
        let mut catalog = Catalog::new(&store);
        assert!(matches!(
            run(&mut catalog, "nope"),
            Err(StoreError::ListingNotFound(_))
        ));
    }
}
