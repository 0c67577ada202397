//! # Staykeep Architecture
//!
//! Staykeep is the storage layer of a rental marketplace: listings and
//! reservations kept as JSON under string keys, the way a browser front-end keeps
//! them in local storage. The library repairs what it reads, recovers from a
//! broken primary copy through a backup copy, and seeds a default dataset when
//! nothing usable exists. The bundled CLI is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs)                               │
//! │  - Parses arguments, prints results and messages            │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, parses user-facing inputs     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - list, show, import, book, status, export, doctor, ...    │
//! │  - Returns `CmdResult`, never prints                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Catalog (catalog.rs) + normalize / seed / images           │
//! │  - Recovery chain on read, primary+backup+snapshots on write│
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - KvStore trait: FileKvStore (production), MemoryStore     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Model
//!
//! Reads are total: [`catalog::Catalog::load_listings`] always returns a
//! collection and says where it came from ([`catalog::LoadSource`]). Writes
//! return [`error::Result`]. Diagnostics travel as [`message::CmdMessage`]
//! values; nothing below the CLI prints.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Business logic for each command
//! - [`catalog`]: Listing and reservation persistence
//! - [`normalize`]: Shape repair for stored listing records
//! - [`seed`]: Default dataset
//! - [`images`]: Per-listing image snapshots and their retention
//! - [`export`]: CSV, iCalendar and Google Calendar output
//! - [`format`]: Date parsing and display
//! - [`store`]: Key-value storage abstraction and backends
//! - [`model`]: `Listing`, `Reservation`
//! - [`config`]: Configuration
//! - [`error`]: Error types

pub mod api;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod images;
pub mod message;
pub mod model;
pub mod normalize;
pub mod seed;
pub mod store;
