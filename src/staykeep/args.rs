use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "staykeep")]
#[command(about = "Listings and reservations for a rental marketplace, stored locally", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Show informational messages (load source, recovery details)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List listings
    #[command(alias = "ls")]
    List {
        /// Only listings whose title or location contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show one listing and its image history
    #[command(alias = "v")]
    Show { id: String },

    /// Replace all listings with the records in a JSON file
    Import { file: PathBuf },

    /// List reservations
    #[command(alias = "r")]
    Reservations {
        /// Only reservations with this status (confirmed, pending, cancelled)
        #[arg(long)]
        status: Option<String>,
    },

    /// Book a listing
    Book {
        /// Id of the listing to book
        listing_id: String,

        #[arg(long)]
        guest: String,

        #[arg(long, default_value = "")]
        email: String,

        /// Check-in date (YYYY-MM-DD)
        #[arg(long = "check-in")]
        check_in: String,

        /// Check-out date (YYYY-MM-DD)
        #[arg(long = "check-out")]
        check_out: String,

        #[arg(long, default_value_t = 1)]
        guests: u32,
    },

    /// Change a reservation's status (id or unique id prefix)
    Status { id: String, status: String },

    /// Export reservations
    Export {
        #[arg(value_enum)]
        format: ExportKind,

        /// Reservation id (required for ical and gcal)
        id: Option<String>,

        /// Directory to write files into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Check primary/backup consistency and repair it
    Doctor,

    /// Get or set configuration
    Config {
        /// Configuration key (image-history-limit, normalize-backup, seed-file)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Print the data directory
    Path,

    /// Remove all stored listings, reservations and image snapshots
    Reset {
        /// Skip the confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportKind {
    Csv,
    Ical,
    Gcal,
}
