use crate::catalog::LoadSource;
use crate::config::StoreConfig;
use crate::images::ImageSnapshot;
use crate::model::{Listing, Reservation};
use std::path::PathBuf;

pub use crate::message::{CmdMessage, MessageLevel};

pub mod book;
pub mod config;
pub mod doctor;
pub mod export;
pub mod helpers;
pub mod import;
pub mod list;
pub mod reservations;
pub mod reset;
pub mod show;
pub mod status;

/// Where staykeep keeps its files.
#[derive(Debug, Clone)]
pub struct StayPaths {
    pub data: PathBuf,
}

impl StayPaths {
    pub fn new(data: impl Into<PathBuf>) -> Self {
        Self { data: data.into() }
    }

    /// Directory holding one file per store key.
    pub fn kv_dir(&self) -> PathBuf {
        self.data.join("kv")
    }

    pub fn config_dir(&self) -> PathBuf {
        self.data.clone()
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub listings: Vec<Listing>,
    pub reservations: Vec<Reservation>,
    pub snapshots: Vec<ImageSnapshot>,
    pub written_files: Vec<PathBuf>,
    pub links: Vec<String>,
    pub source: Option<LoadSource>,
    pub config: Option<StoreConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn extend_messages(&mut self, messages: impl IntoIterator<Item = CmdMessage>) {
        self.messages.extend(messages);
    }

    pub fn with_listings(mut self, listings: Vec<Listing>) -> Self {
        self.listings = listings;
        self
    }

    pub fn with_reservations(mut self, reservations: Vec<Reservation>) -> Self {
        self.reservations = reservations;
        self
    }

    pub fn with_snapshots(mut self, snapshots: Vec<ImageSnapshot>) -> Self {
        self.snapshots = snapshots;
        self
    }

    pub fn with_source(mut self, source: LoadSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = Some(config);
        self
    }
}
