//! # Storage Layer
//!
//! Everything staykeep persists is a JSON string under a string key. The
//! [`KvStore`] trait is that key-value space; the catalog decides what goes into
//! it, the backend only decides how bytes reach the medium.
//!
//! ## Implementations
//!
//! - [`fs::FileKvStore`]: Production storage, one file per key.
//! - [`memory::MemoryStore`]: In-process storage for tests, with quota and
//!   failure simulation.
//!
//! ## Key Layout
//!
//! ```text
//! listings                            # Primary listing collection
//! listings_last_backup                # Backup copy, written right after the primary
//! reservations                        # Reservation collection
//! listing_images_{id}_{timestamp}     # Image snapshot per listing per save batch
//! ```
//!
//! There is no transaction spanning keys. A failure between the primary and the
//! backup write leaves them divergent; `doctor` detects and repairs that.

use crate::error::Result;

pub mod fs;
pub mod memory;

pub const LISTINGS_KEY: &str = "listings";
pub const LISTINGS_BACKUP_KEY: &str = "listings_last_backup";
pub const RESERVATIONS_KEY: &str = "reservations";
pub const IMAGE_KEY_PREFIX: &str = "listing_images_";

/// Abstract interface for string-keyed storage.
///
/// All methods take `&self`: implementations use interior mutability since
/// staykeep is single-threaded.
pub trait KvStore {
    /// Returns Ok(None) if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Create or overwrite a key.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys currently stored, in no particular order.
    fn keys(&self) -> Result<Vec<String>>;
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}
