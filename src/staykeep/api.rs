//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single entry
//! point for UI clients (the bundled CLI, or anything else).
//!
//! It dispatches to `commands/*.rs`, parses user-facing inputs (status names),
//! and returns structured `CmdResult` values. It does no I/O and no formatting.
//!
//! `StayApi<S: KvStore>` is generic over the storage backend:
//! - Production: `StayApi<FileKvStore>`
//! - Testing: `StayApi<MemoryStore>`

use crate::catalog::Catalog;
use crate::commands;
use crate::error::{Result, StoreError};
use crate::model::ReservationStatus;
use crate::store::KvStore;
use rand::rngs::StdRng;
use rand::Rng;
use std::path::Path;

pub struct StayApi<S: KvStore, R: Rng = StdRng> {
    catalog: Catalog<S, R>,
    paths: commands::StayPaths,
}

impl<S: KvStore, R: Rng> StayApi<S, R> {
    pub fn new(catalog: Catalog<S, R>, paths: commands::StayPaths) -> Self {
        Self { catalog, paths }
    }

    pub fn list_listings(&mut self, search: Option<&str>) -> Result<commands::CmdResult> {
        commands::list::run(&mut self.catalog, search)
    }

    pub fn show_listing(&mut self, id: &str) -> Result<commands::CmdResult> {
        commands::show::run(&mut self.catalog, id)
    }

    pub fn import_listings(&mut self, path: &Path) -> Result<commands::CmdResult> {
        commands::import::run(&mut self.catalog, path)
    }

    pub fn list_reservations(&self, status: Option<&str>) -> Result<commands::CmdResult> {
        let status = status.map(parse_status).transpose()?;
        commands::reservations::run(&self.catalog, status)
    }

    pub fn book(&mut self, request: commands::book::BookingRequest) -> Result<commands::CmdResult> {
        commands::book::run(&mut self.catalog, request)
    }

    pub fn set_reservation_status(&self, id: &str, status: &str) -> Result<commands::CmdResult> {
        commands::status::run(&self.catalog, id, parse_status(status)?)
    }

    pub fn export(
        &self,
        format: commands::export::ExportFormat,
        out_dir: &Path,
    ) -> Result<commands::CmdResult> {
        commands::export::run(&self.catalog, format, out_dir)
    }

    pub fn doctor(&mut self) -> Result<commands::CmdResult> {
        commands::doctor::run(&mut self.catalog)
    }

    pub fn reset(&self, skip_confirm: bool) -> Result<commands::CmdResult> {
        commands::reset::run(&self.catalog, skip_confirm)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn paths(&self) -> &commands::StayPaths {
        &self.paths
    }
}

/// Only the three statuses a person can set; `other` is for unknown stored values.
fn parse_status(input: &str) -> Result<ReservationStatus> {
    match input.to_lowercase().as_str() {
        "confirmed" | "confirm" => Ok(ReservationStatus::Confirmed),
        "pending" => Ok(ReservationStatus::Pending),
        "cancelled" | "canceled" | "cancel" => Ok(ReservationStatus::Cancelled),
        other => Err(StoreError::Api(format!(
            "Unknown reservation status '{}' (use confirmed, pending or cancelled)",
            other
        ))),
    }
}

pub use crate::commands::book::BookingRequest;
pub use crate::commands::config::ConfigAction;
pub use crate::commands::export::ExportFormat;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel, StayPaths};
