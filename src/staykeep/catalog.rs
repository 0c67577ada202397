//! # Catalog
//!
//! The catalog is the persistence layer proper: it reads and writes the listing
//! and reservation collections through a [`KvStore`].
//!
//! ## Read Path
//!
//! Reading listings never fails. It walks a recovery chain and reports which link
//! produced the data:
//!
//! 1. **Primary** (`listings`): parsed, every record normalized.
//! 2. **Backup** (`listings_last_backup`): consulted only when the primary exists
//!    but cannot be read, is unparseable or is not an array. Any array is
//!    returned as stored unless `normalize_backup` is set; records that do not
//!    decode as listings get their fields coerced, `image` is left alone.
//! 3. **Defaults**: the seed dataset, persisted before it is returned so the next
//!    read sees the same data. Keys that exist but could not be read are never
//!    overwritten by defaults.
//!
//! ## Write Path
//!
//! Writes validate first, then store the same JSON under the primary and the
//! backup key, then write one image snapshot per listing (see [`crate::images`]).
//! A failed snapshot is a warning; a failed primary or backup write is an error.

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::images::{self, side_key, ImageSnapshot};
use crate::message::CmdMessage;
use crate::model::{json_kind, Listing, Reservation};
use crate::normalize::{
    coerce_fields, fill_primary_image, listing_from_object, normalize_listing, placeholder_listing,
};
use crate::seed::SeedData;
use crate::store::{KvStore, LISTINGS_BACKUP_KEY, LISTINGS_KEY, RESERVATIONS_KEY};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

/// Which link of the recovery chain produced a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Primary,
    Backup,
    Defaults,
    /// Nothing was stored and there is no default (reservations).
    Empty,
    /// Something is stored but could not be read (reservations). Saving over it
    /// is refused.
    Unreadable,
}

impl std::fmt::Display for LoadSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LoadSource::Primary => "primary copy",
            LoadSource::Backup => "backup copy",
            LoadSource::Defaults => "default dataset",
            LoadSource::Empty => "nothing stored",
            LoadSource::Unreadable => "unreadable data",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub items: Vec<T>,
    pub source: LoadSource,
    pub messages: Vec<CmdMessage>,
    /// Stored records that did not decode into `T`, kept so an edit can write
    /// them back.
    pub undecoded: Vec<Value>,
}

impl<T> Loaded<T> {
    fn new(items: Vec<T>, source: LoadSource, messages: Vec<CmdMessage>) -> Self {
        Self {
            items,
            source,
            messages,
            undecoded: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct SaveReport {
    pub saved: usize,
    pub dropped: usize,
    pub side_keys_written: usize,
    pub side_keys_failed: usize,
    pub side_keys_pruned: usize,
    pub messages: Vec<CmdMessage>,
}

pub struct Catalog<S: KvStore, R: Rng = StdRng> {
    store: S,
    rng: R,
    config: StoreConfig,
    seed: SeedData,
    last_batch: i64,
}

impl<S: KvStore> Catalog<S, StdRng> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            rng: StdRng::from_entropy(),
            config: StoreConfig::default(),
            seed: SeedData::builtin(),
            last_batch: 0,
        }
    }
}

impl<S: KvStore, R: Rng> Catalog<S, R> {
    /// Replace the random source used for seeding and fallback ids.
    pub fn with_rng<R2: Rng>(self, rng: R2) -> Catalog<S, R2> {
        Catalog {
            store: self.store,
            rng,
            config: self.config,
            seed: self.seed,
            last_batch: self.last_batch,
        }
    }

    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_seed(mut self, seed: SeedData) -> Self {
        self.seed = seed;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // --- Listings: read ---

    pub fn load_listings(&mut self) -> Loaded<Listing> {
        let mut messages = Vec::new();

        let raw = match self.store.get(LISTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                messages.push(CmdMessage::info("No saved listings found."));
                return self.load_defaults(messages, &[]);
            }
            Err(e) => {
                messages.push(CmdMessage::error(format!("Could not read listings: {}", e)));
                return self.load_backup(messages, &[LISTINGS_KEY]);
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(records)) => {
                let items = self.normalize_all(&records, &mut messages);
                messages.push(CmdMessage::info(format!(
                    "Loaded {} listing(s) from the primary copy.",
                    items.len()
                )));
                Loaded::new(items, LoadSource::Primary, messages)
            }
            Ok(other) => {
                messages.push(CmdMessage::error(format!(
                    "Saved listings are {}, not an array.",
                    json_kind(&other)
                )));
                self.load_backup(messages, &[])
            }
            Err(e) => {
                messages.push(CmdMessage::error(format!(
                    "Could not parse saved listings: {}",
                    e
                )));
                self.load_backup(messages, &[])
            }
        }
    }

    /// `unreadable` lists keys that exist but could not be read so far.
    fn load_backup(
        &mut self,
        mut messages: Vec<CmdMessage>,
        unreadable: &[&str],
    ) -> Loaded<Listing> {
        let raw = match self.store.get(LISTINGS_BACKUP_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                messages.push(CmdMessage::warning("No backup copy available."));
                return self.load_defaults(messages, unreadable);
            }
            Err(e) => {
                messages.push(CmdMessage::error(format!("Could not read backup: {}", e)));
                let mut keys = unreadable.to_vec();
                keys.push(LISTINGS_BACKUP_KEY);
                return self.load_defaults(messages, &keys);
            }
        };

        let records = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(records)) => records,
            Ok(other) => {
                messages.push(CmdMessage::error(format!(
                    "Backup is {}, not an array.",
                    json_kind(&other)
                )));
                return self.load_defaults(messages, unreadable);
            }
            Err(e) => {
                messages.push(CmdMessage::error(format!("Could not parse backup: {}", e)));
                return self.load_defaults(messages, unreadable);
            }
        };

        let items = if self.config.normalize_backup {
            self.normalize_all(&records, &mut messages)
        } else {
            self.decode_backup(records, &mut messages)
        };

        messages.push(CmdMessage::warning(format!(
            "Restored {} listing(s) from the backup copy.",
            items.len()
        )));
        Loaded::new(items, LoadSource::Backup, messages)
    }

    /// Backup records as stored. Records with loosely typed fields are coerced
    /// without deriving `image`; non-objects become placeholders.
    fn decode_backup(
        &mut self,
        records: Vec<Value>,
        messages: &mut Vec<CmdMessage>,
    ) -> Vec<Listing> {
        records
            .into_iter()
            .enumerate()
            .map(|(i, record)| {
                if let Value::Object(obj) = &record {
                    if let Ok(listing) = serde_json::from_value::<Listing>(record.clone()) {
                        return listing;
                    }
                    messages.push(CmdMessage::info(format!(
                        "Backup record {} had fields of the wrong type; coerced.",
                        i
                    )));
                    return coerce_fields(obj);
                }
                let listing = placeholder_listing(&mut self.rng);
                messages.push(CmdMessage::warning(format!(
                    "Backup record {} is {}; replaced with placeholder {}.",
                    i,
                    json_kind(&record),
                    listing.id
                )));
                listing
            })
            .collect()
    }

    /// Seed defaults and persist them, except under keys in `keep`.
    fn load_defaults(
        &mut self,
        mut messages: Vec<CmdMessage>,
        keep: &[&str],
    ) -> Loaded<Listing> {
        let items = self.seed.generate(&mut self.rng);

        match serde_json::to_string(&items) {
            Ok(json) => {
                for key in [LISTINGS_KEY, LISTINGS_BACKUP_KEY] {
                    if keep.contains(&key) {
                        messages.push(CmdMessage::warning(format!(
                            "Left '{}' untouched: it exists but could not be read.",
                            key
                        )));
                        continue;
                    }
                    if let Err(e) = self.store.set(key, &json) {
                        messages.push(CmdMessage::warning(format!(
                            "Could not persist default listings under '{}': {}",
                            key, e
                        )));
                    }
                }
            }
            Err(e) => messages.push(CmdMessage::warning(format!(
                "Could not serialize default listings: {}",
                e
            ))),
        }

        messages.push(CmdMessage::info(format!(
            "Created {} default listing(s).",
            items.len()
        )));
        Loaded::new(items, LoadSource::Defaults, messages)
    }

    fn normalize_all(&mut self, records: &[Value], messages: &mut Vec<CmdMessage>) -> Vec<Listing> {
        records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let listing = normalize_listing(record, &mut self.rng);
                if !record.is_object() {
                    messages.push(CmdMessage::warning(format!(
                        "Record {} is {}; replaced with placeholder {}.",
                        i,
                        json_kind(record),
                        listing.id
                    )));
                }
                listing
            })
            .collect()
    }

    // --- Listings: write ---

    /// Persist a full listing collection.
    pub fn save_listings(&mut self, listings: &[Listing]) -> Result<SaveReport> {
        let verified = listings
            .iter()
            .cloned()
            .map(|mut listing| {
                fill_primary_image(&mut listing);
                listing
            })
            .collect();
        self.persist_listings(verified, SaveReport::default())
    }

    /// Persist a collection given as raw JSON. Anything but an array is
    /// rejected before storage is touched; non-object entries are dropped.
    pub fn save_listings_value(&mut self, value: &Value) -> Result<SaveReport> {
        let Value::Array(records) = value else {
            return Err(StoreError::NotASequence(json_kind(value)));
        };

        let mut report = SaveReport::default();
        let mut verified = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            match record {
                Value::Object(obj) => verified.push(listing_from_object(obj)),
                other => {
                    report.dropped += 1;
                    report.messages.push(CmdMessage::warning(format!(
                        "Skipped record {}: expected an object, got {}.",
                        i,
                        json_kind(other)
                    )));
                }
            }
        }
        self.persist_listings(verified, report)
    }

    fn persist_listings(
        &mut self,
        verified: Vec<Listing>,
        mut report: SaveReport,
    ) -> Result<SaveReport> {
        if let Some(bad) = verified.iter().find(|l| !l.price.is_finite()) {
            return Err(StoreError::InvalidPrice(bad.id.clone()));
        }
        let json = serde_json::to_string(&verified).map_err(StoreError::Serialization)?;
        self.store.set(LISTINGS_KEY, &json)?;
        self.store.set(LISTINGS_BACKUP_KEY, &json)?;
        report.saved = verified.len();

        let limit = self.config.image_history_limit;
        if limit > 0 {
            let timestamp = self.next_batch_timestamp();
            for listing in &verified {
                if listing.id.is_empty() || listing.images.is_empty() {
                    continue;
                }
                match self.write_snapshot(listing, timestamp) {
                    Ok(()) => report.side_keys_written += 1,
                    Err(e) => {
                        report.side_keys_failed += 1;
                        report.messages.push(CmdMessage::warning(format!(
                            "Could not save image snapshot for listing {}: {}",
                            listing.id, e
                        )));
                    }
                }
            }
        }

        match images::prune_side_keys(&self.store, limit) {
            Ok(n) => report.side_keys_pruned = n,
            Err(e) => report.messages.push(CmdMessage::warning(format!(
                "Could not prune image snapshots: {}",
                e
            ))),
        }

        report.messages.push(CmdMessage::success(format!(
            "Saved {} listing(s).",
            report.saved
        )));
        Ok(report)
    }

    fn write_snapshot(&self, listing: &Listing, timestamp: i64) -> Result<()> {
        let json = serde_json::to_string(&listing.images).map_err(StoreError::Serialization)?;
        self.store.set(&side_key(&listing.id, timestamp), &json)
    }

    /// Milliseconds since epoch, strictly increasing across batches.
    fn next_batch_timestamp(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last_batch = now.max(self.last_batch + 1);
        self.last_batch
    }

    pub fn image_history(&self, listing_id: &str) -> Result<Vec<ImageSnapshot>> {
        images::image_history(&self.store, listing_id)
    }

    // --- Reservations ---

    /// Read reservations. Never fails: unreadable data yields an empty list
    /// with source [`LoadSource::Unreadable`]. Records that do not decode are
    /// skipped and returned in `undecoded`.
    pub fn load_reservations(&self) -> Loaded<Reservation> {
        let mut messages = Vec::new();

        let raw = match self.store.get(RESERVATIONS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Loaded::new(Vec::new(), LoadSource::Empty, messages),
            Err(e) => {
                messages.push(CmdMessage::error(format!(
                    "Could not read reservations: {}",
                    e
                )));
                return Loaded::new(Vec::new(), LoadSource::Unreadable, messages);
            }
        };

        let records = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(records)) => records,
            Ok(other) => {
                messages.push(CmdMessage::error(format!(
                    "Saved reservations are {}, not an array.",
                    json_kind(&other)
                )));
                return Loaded::new(Vec::new(), LoadSource::Unreadable, messages);
            }
            Err(e) => {
                messages.push(CmdMessage::error(format!(
                    "Could not parse saved reservations: {}",
                    e
                )));
                return Loaded::new(Vec::new(), LoadSource::Unreadable, messages);
            }
        };

        let mut loaded = Loaded::new(
            Vec::with_capacity(records.len()),
            LoadSource::Primary,
            messages,
        );
        for (i, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<Reservation>(record.clone()) {
                Ok(reservation) => loaded.items.push(reservation),
                Err(e) => {
                    loaded.messages.push(CmdMessage::warning(format!(
                        "Skipped reservation record {}: {}",
                        i, e
                    )));
                    loaded.undecoded.push(record);
                }
            }
        }
        loaded
    }

    pub fn save_reservations(&self, reservations: &[Reservation]) -> Result<()> {
        let json = serde_json::to_string(reservations).map_err(StoreError::Serialization)?;
        self.store.set(RESERVATIONS_KEY, &json)
    }

    /// Write back an edited collection read with [`Catalog::load_reservations`].
    ///
    /// Records that did not decode are written after the edited ones, unchanged.
    /// Refuses to overwrite reservations that could not be read at all.
    pub fn update_reservations(
        &self,
        reservations: &[Reservation],
        read: &Loaded<Reservation>,
    ) -> Result<()> {
        if read.source == LoadSource::Unreadable {
            return Err(StoreError::Store(
                "Stored reservations are unreadable; refusing to overwrite them".to_string(),
            ));
        }
        let mut records = Vec::with_capacity(reservations.len() + read.undecoded.len());
        for reservation in reservations {
            records.push(serde_json::to_value(reservation).map_err(StoreError::Serialization)?);
        }
        records.extend(read.undecoded.iter().cloned());
        let json = serde_json::to_string(&records).map_err(StoreError::Serialization)?;
        self.store.set(RESERVATIONS_KEY, &json)
    }

    /// Persist reservations given as raw JSON. Returns how many were saved.
    pub fn save_reservations_value(&self, value: &Value) -> Result<usize> {
        if !value.is_array() {
            return Err(StoreError::NotASequence(json_kind(value)));
        }
        let reservations: Vec<Reservation> =
            serde_json::from_value(value.clone()).map_err(StoreError::Serialization)?;
        self.save_reservations(&reservations)?;
        Ok(reservations.len())
    }
}
