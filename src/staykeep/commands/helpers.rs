use crate::error::{Result, StoreError};
use crate::model::{Listing, Reservation};

pub fn find_listing<'a>(listings: &'a [Listing], id: &str) -> Result<&'a Listing> {
    listings
        .iter()
        .find(|l| l.id == id)
        .ok_or_else(|| StoreError::ListingNotFound(id.to_string()))
}

pub fn find_reservation_mut<'a>(
    reservations: &'a mut [Reservation],
    id: &str,
) -> Result<&'a mut Reservation> {
    reservations
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| StoreError::ReservationNotFound(id.to_string()))
}

/// Reservation ids are v4 UUIDs; accept any unambiguous prefix of one.
pub fn resolve_reservation_id(reservations: &[Reservation], input: &str) -> Result<String> {
    if reservations.iter().any(|r| r.id == input) {
        return Ok(input.to_string());
    }
    let matches: Vec<&Reservation> = reservations
        .iter()
        .filter(|r| r.id.starts_with(input))
        .collect();
    match matches.as_slice() {
        [only] => Ok(only.id.clone()),
        [] => Err(StoreError::ReservationNotFound(input.to_string())),
        _ => Err(StoreError::Api(format!(
            "Reservation id '{}' is ambiguous ({} matches)",
            input,
            matches.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reservation(id: &str) -> Reservation {
        serde_json::from_value(json!({ "id": id })).unwrap()
    }

    #[test]
    fn finds_listing_by_id() {
        let listings = vec![Listing::new("a", "A", 1.0), Listing::new("b", "B", 2.0)];
        assert_eq!(find_listing(&listings, "b").unwrap().title, "B");
        assert!(matches!(
            find_listing(&listings, "z"),
            Err(StoreError::ListingNotFound(_))
        ));
    }

    #[test]
    fn resolves_reservation_prefixes() {
        let reservations = vec![reservation("abc123"), reservation("abd456")];
        assert_eq!(resolve_reservation_id(&reservations, "abc").unwrap(), "abc123");
        assert!(matches!(
            resolve_reservation_id(&reservations, "ab"),
            Err(StoreError::Api(_))
        ));
        assert!(matches!(
            resolve_reservation_id(&reservations, "zz"),
            Err(StoreError::ReservationNotFound(_))
        ));
    }

    #[test]
    fn exact_id_wins_over_prefix() {
        let reservations = vec![reservation("ab"), reservation("abc")];
        assert_eq!(resolve_reservation_id(&reservations, "ab").unwrap(), "ab");
    }
}
