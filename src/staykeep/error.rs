use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Listing not found: {0}")]
    ListingNotFound(String),

    #[error("Reservation not found: {0}")]
    ReservationNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Expected a sequence of records, got {0}")]
    NotASequence(&'static str),

    #[error("Storage quota exceeded while writing '{key}'")]
    QuotaExceeded { key: String },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Listing '{0}' has a price that is not a finite number")]
    InvalidPrice(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
