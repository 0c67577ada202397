use crate::catalog::Catalog;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::KvStore;
use rand::Rng;

pub fn run<S: KvStore, R: Rng>(
    catalog: &mut Catalog<S, R>,
    search: Option<&str>,
) -> Result<CmdResult> {
    let loaded = catalog.load_listings();

    let listings = match search {
        Some(term) => {
            let term = term.to_lowercase();
            loaded
                .items
                .into_iter()
                .filter(|l| {
                    l.title.to_lowercase().contains(&term)
                        || l.location.to_lowercase().contains(&term)
                })
                .collect()
        }
        None => loaded.items,
    };

    let mut result = CmdResult::default()
        .with_listings(listings)
        .with_source(loaded.source);
    result.extend_messages(loaded.messages);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LoadSource;
    use crate::model::Listing;
    use crate::store::memory::MemoryStore;

    #[test]
    fn lists_seeded_listings_on_empty_store() {
        let store = MemoryStore::new();
        let mut catalog = Catalog::new(&store);

        let result = run(&mut catalog, None).unwrap();
        assert_eq!(result.source, Some(LoadSource::Defaults));
        assert!(!result.listings.is_empty());
    }

    #[test]
    fn search_matches_title_and_location() {
        let store = MemoryStore::new();
        let mut catalog = Catalog::new(&store);
        catalog
            .save_listings(&[
                Listing::new("a", "Beach villa", 100.0).with_location("Bè, Lomé, Togo"),
                Listing::new("b", "Studio", 40.0).with_location("Tokoin, Lomé, Togo"),
            ])
            .unwrap();

        let result = run(&mut catalog, Some("VILLA")).unwrap();
        assert_eq!(result.listings.len(), 1);
        assert_eq!(result.listings[0].id, "a");

        let result = run(&mut catalog, Some("tokoin")).unwrap();
        assert_eq!(result.listings[0].id, "b");
    }
}
