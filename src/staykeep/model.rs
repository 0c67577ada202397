use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A rentable property.
///
/// `image` is derived from `images` and is not authoritative on its own; the
/// normalizer and the writer keep the two consistent. Fields the catalog does not
/// know about are carried in `extra` so they survive a read/write cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub image: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Listing {
    pub fn new(id: impl Into<String>, title: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            price,
            location: String::new(),
            images: Vec::new(),
            image: String::new(),
            extra: Map::new(),
        }
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// The image shown first: the explicit one, else the first of `images`.
    pub fn primary_image(&self) -> &str {
        if !self.image.is_empty() {
            &self.image
        } else {
            self.images.first().map(String::as_str).unwrap_or("")
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Confirmed,
    #[default]
    Pending,
    Cancelled,
    #[serde(other)]
    Other,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Pending => "pending",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Other => "other",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A booking. The listing is referenced by copies of its title and location,
/// not by id. Dates are kept as the strings they were stored with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    #[serde(default)]
    pub guest_name: String,
    #[serde(default)]
    pub guest_email: String,
    #[serde(default)]
    pub listing_title: String,
    #[serde(default)]
    pub listing_location: String,
    #[serde(default)]
    pub check_in: String,
    #[serde(default)]
    pub check_out: String,
    #[serde(default)]
    pub guests: u32,
    #[serde(default)]
    pub total_price: f64,
    #[serde(default)]
    pub status: ReservationStatus,
    #[serde(default)]
    pub created_at: String,
}

/// Name of a JSON value's kind, for error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listing_keeps_unknown_fields() {
        let raw = json!({
            "id": "a",
            "title": "Villa",
            "price": 120.0,
            "bedrooms": 3,
            "amenities": ["wifi"]
        });
        let listing: Listing = serde_json::from_value(raw).unwrap();
        assert_eq!(listing.extra.get("bedrooms"), Some(&json!(3)));

        let back = serde_json::to_value(&listing).unwrap();
        assert_eq!(back["amenities"], json!(["wifi"]));
        assert_eq!(back["images"], json!([]));
    }

    #[test]
    fn unknown_status_maps_to_other() {
        let raw = json!({"id": "r1", "status": "refunded"});
        let reservation: Reservation = serde_json::from_value(raw).unwrap();
        assert_eq!(reservation.status, ReservationStatus::Other);
    }

    #[test]
    fn reservation_uses_camel_case_fields() {
        let raw = json!({
            "id": "r1",
            "guestName": "Ama",
            "checkIn": "2024-05-01",
            "totalPrice": 300.5,
            "status": "confirmed"
        });
        let reservation: Reservation = serde_json::from_value(raw).unwrap();
        assert_eq!(reservation.guest_name, "Ama");
        assert_eq!(reservation.check_in, "2024-05-01");
        assert_eq!(reservation.status, ReservationStatus::Confirmed);
    }

    #[test]
    fn primary_image_falls_back_to_first() {
        let listing = Listing::new("a", "A", 1.0).with_images(vec!["i1".into(), "i2".into()]);
        assert_eq!(listing.primary_image(), "i1");
        assert_eq!(Listing::new("b", "B", 1.0).primary_image(), "");
    }
}
