//! Shape repair for listing records read back from storage.
//!
//! Stored records come from older versions, hand edits and partial writes, so
//! nothing about their shape is trusted. Normalization never fails: a record
//! that cannot be salvaged becomes a placeholder instead of breaking the load.

use crate::model::Listing;
use rand::Rng;
use serde_json::{Map, Value};

pub const FALLBACK_ID_PREFIX: &str = "fallback-";
pub const PLACEHOLDER_TITLE: &str = "Recovered listing";

const FALLBACK_ID_LEN: usize = 7;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const KNOWN_FIELDS: [&str; 7] = [
    "id",
    "title",
    "description",
    "price",
    "location",
    "images",
    "image",
];

/// Turn an arbitrary decoded value into a well-shaped [`Listing`].
///
/// Objects are repaired field by field; anything else becomes a placeholder
/// with a random `fallback-` id.
pub fn normalize_listing<R: Rng + ?Sized>(raw: &Value, rng: &mut R) -> Listing {
    match raw.as_object() {
        Some(obj) => listing_from_object(obj),
        None => placeholder_listing(rng),
    }
}

pub fn placeholder_listing<R: Rng + ?Sized>(rng: &mut R) -> Listing {
    Listing::new(fallback_id(rng), PLACEHOLDER_TITLE, 0.0)
}

pub fn fallback_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix: String = (0..FALLBACK_ID_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}{}", FALLBACK_ID_PREFIX, suffix)
}

/// Build a listing from a JSON object, coercing every known field to its
/// expected type. Unknown fields are kept in `extra`.
pub(crate) fn listing_from_object(obj: &Map<String, Value>) -> Listing {
    let mut listing = coerce_fields(obj);
    fill_primary_image(&mut listing);
    listing
}

/// Field coercion only: `image` is taken as stored, even when empty.
pub(crate) fn coerce_fields(obj: &Map<String, Value>) -> Listing {
    let images: Vec<String> = match obj.get("images") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    };

    Listing {
        id: id_field(obj.get("id")),
        title: str_field(obj, "title"),
        description: str_field(obj, "description"),
        price: price_field(obj.get("price")),
        location: str_field(obj, "location"),
        images,
        image: str_field(obj, "image"),
        extra: obj
            .iter()
            .filter(|(k, _)| !KNOWN_FIELDS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    }
}

/// Set `image` to the first of `images` when it is empty.
pub(crate) fn fill_primary_image(listing: &mut Listing) {
    if listing.image.is_empty() {
        if let Some(first) = listing.images.first() {
            listing.image = first.clone();
        }
    }
}

fn str_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn id_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// A number or numeric string. Anything else, including `NaN` and infinities,
/// is 0.
pub(crate) fn price_field(value: Option<&Value>) -> f64 {
    let price = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    price.filter(|p| p.is_finite()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn missing_images_become_empty() {
        let listing = normalize_listing(&json!({"id": "a", "price": 100}), &mut rng());
        assert_eq!(listing.id, "a");
        assert_eq!(listing.price, 100.0);
        assert!(listing.images.is_empty());
        assert_eq!(listing.image, "");
    }

    #[test]
    fn missing_image_takes_first_of_images() {
        let raw = json!({"id": "x", "images": ["i1", "i2"]});
        let listing = normalize_listing(&raw, &mut rng());
        assert_eq!(listing.image, "i1");
        assert_eq!(listing.images, vec!["i1", "i2"]);
    }

    #[test]
    fn empty_image_takes_first_of_images() {
        let raw = json!({"id": "x", "image": "", "images": ["i1"]});
        assert_eq!(normalize_listing(&raw, &mut rng()).image, "i1");
    }

    #[test]
    fn explicit_image_is_kept() {
        let raw = json!({"id": "x", "image": "cover", "images": ["i1"]});
        assert_eq!(normalize_listing(&raw, &mut rng()).image, "cover");
    }

    #[test]
    fn non_array_images_are_replaced() {
        let raw = json!({"id": "x", "images": "i1", "image": 4});
        let listing = normalize_listing(&raw, &mut rng());
        assert!(listing.images.is_empty());
        assert_eq!(listing.image, "");
    }

    #[test]
    fn non_string_image_entries_are_dropped() {
        let raw = json!({"id": "x", "images": [1, "i2", null]});
        let listing = normalize_listing(&raw, &mut rng());
        assert_eq!(listing.images, vec!["i2"]);
        assert_eq!(listing.image, "i2");
    }

    #[test]
    fn non_objects_become_placeholders() {
        for raw in [json!(null), json!(3), json!("listing"), json!([1, 2])] {
            let listing = normalize_listing(&raw, &mut rng());
            assert!(listing.id.starts_with(FALLBACK_ID_PREFIX));
            assert_eq!(listing.id.len(), FALLBACK_ID_PREFIX.len() + FALLBACK_ID_LEN);
            assert_eq!(listing.title, PLACEHOLDER_TITLE);
            assert!(listing.images.is_empty());
            assert_eq!(listing.image, "");
        }
    }

    #[test]
    fn loose_scalar_types_are_coerced() {
        let raw = json!({"id": 42, "price": "75.5", "title": null});
        let listing = normalize_listing(&raw, &mut rng());
        assert_eq!(listing.id, "42");
        assert_eq!(listing.price, 75.5);
        assert_eq!(listing.title, "");
    }

    #[test]
    fn non_finite_string_prices_become_zero() {
        for price in ["NaN", "inf", "-infinity"] {
            let listing = normalize_listing(&json!({"id": "a", "price": price}), &mut rng());
            assert_eq!(listing.price, 0.0, "price {:?}", price);
        }
    }

    #[test]
    fn coerce_fields_leaves_image_empty() {
        let raw = json!({"id": 7, "images": ["a"]});
        let listing = coerce_fields(raw.as_object().unwrap());
        assert_eq!(listing.id, "7");
        assert_eq!(listing.image, "");
    }

    #[test]
    fn input_is_not_mutated() {
        let raw = json!({"id": "a", "rating": 4.5});
        let before = raw.clone();
        let listing = normalize_listing(&raw, &mut rng());
        assert_eq!(raw, before);
        assert_eq!(listing.extra.get("rating"), Some(&json!(4.5)));
    }

    #[test]
    fn fallback_ids_come_from_the_rng() {
        let a = fallback_id(&mut StdRng::seed_from_u64(1));
        let b = fallback_id(&mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
        assert!(a[FALLBACK_ID_PREFIX.len()..]
            .bytes()
            .all(|c| BASE36.contains(&c)));
    }
}
