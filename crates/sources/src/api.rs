//! Generic JSON API source reader.
//!
//! Performs a single GET (optionally with a bearer key) and maps a
//! list of product-shaped objects into candidates. The exact payload
//! shape is source-defined: the list may sit at the top level or under
//! a conventional wrapper key, names may arrive as `title`, and prices
//! as numbers or numeric strings.

use outfred_core::candidate::CandidateProduct;
use serde_json::Value;

use crate::client::SourceClient;
use crate::error::SourceError;

/// Wrapper keys a product list is commonly nested under.
const LIST_KEYS: &[&str] = &["products", "data", "items"];

/// Fetch and decode an API source.
pub async fn read_candidates(
    client: &SourceClient,
    url: &str,
    api_key: Option<&str>,
) -> Result<Vec<CandidateProduct>, SourceError> {
    let payload = client.get_json(url, api_key).await?;
    map_payload(&payload)
}

/// Map a decoded JSON payload into candidates.
///
/// Entries that are not objects still yield one (invalid) candidate so
/// the session total stays aligned with the source list length.
pub fn map_payload(payload: &Value) -> Result<Vec<CandidateProduct>, SourceError> {
    let items = product_list(payload).ok_or_else(|| {
        SourceError::FormatInvalid("JSON body does not contain a product list".to_string())
    })?;

    Ok(items.iter().map(map_object).collect())
}

/// Locate the product array in the payload.
fn product_list(payload: &Value) -> Option<&Vec<Value>> {
    if let Some(items) = payload.as_array() {
        return Some(items);
    }
    LIST_KEYS
        .iter()
        .find_map(|key| payload.get(key).and_then(Value::as_array))
}

/// Map one product-shaped object into a candidate.
pub(crate) fn map_object(value: &Value) -> CandidateProduct {
    let Some(obj) = value.as_object() else {
        return CandidateProduct::default();
    };

    let string_field = |keys: &[&str]| {
        keys.iter().find_map(|key| {
            obj.get(*key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
        })
    };

    let image_url = string_field(&["image_url", "image", "imageUrl"]).or_else(|| {
        // Some feeds nest the image as an object with a `src` field.
        obj.get("image")
            .and_then(|img| img.get("src"))
            .and_then(Value::as_str)
            .map(String::from)
    });

    CandidateProduct {
        name: string_field(&["name", "title"]).unwrap_or_default(),
        price: obj.get("price").and_then(price_value),
        color: string_field(&["color"]),
        size: string_field(&["size"]),
        image_url,
        sku: string_field(&["sku"]),
    }
}

/// Decode a price that may be a JSON number or a numeric string.
pub(crate) fn price_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_a_top_level_array() {
        let payload = json!([
            {"name": "Shirt", "price": 100, "sku": "S-1"},
            {"title": "Shoes", "price": "79.90"},
        ]);
        let candidates = map_payload(&payload).unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].name, "Shirt");
        assert_eq!(candidates[0].price, Some(100.0));
        assert_eq!(candidates[0].sku.as_deref(), Some("S-1"));
        assert_eq!(candidates[1].name, "Shoes");
        assert_eq!(candidates[1].price, Some(79.90));
    }

    #[test]
    fn finds_the_list_under_wrapper_keys() {
        for key in ["products", "data", "items"] {
            let payload = json!({ key: [{"name": "Hat", "price": 15}] });
            let candidates = map_payload(&payload).unwrap();
            assert_eq!(candidates.len(), 1, "wrapper key {key}");
            assert_eq!(candidates[0].name, "Hat");
        }
    }

    #[test]
    fn payload_without_a_list_is_a_format_error() {
        assert!(matches!(
            map_payload(&json!({"message": "ok"})),
            Err(SourceError::FormatInvalid(_))
        ));
        assert!(matches!(
            map_payload(&json!("just a string")),
            Err(SourceError::FormatInvalid(_))
        ));
    }

    #[test]
    fn non_object_entries_become_invalid_candidates() {
        let payload = json!([{"name": "Shirt", "price": 10}, 42, "oops"]);
        let candidates = map_payload(&payload).unwrap();

        assert_eq!(candidates.len(), 3);
        assert!(candidates[0].validation_error().is_none());
        assert!(candidates[1].validation_error().is_some());
        assert!(candidates[2].validation_error().is_some());
    }

    #[test]
    fn nested_image_object_is_recognized() {
        let payload = json!([{"name": "Bag", "price": 50, "image": {"src": "https://img.example.com/b.jpg"}}]);
        let candidates = map_payload(&payload).unwrap();
        assert_eq!(
            candidates[0].image_url.as_deref(),
            Some("https://img.example.com/b.jpg")
        );
    }

    #[test]
    fn unparseable_price_string_maps_to_none() {
        let payload = json!([{"name": "Scarf", "price": "n/a"}]);
        let candidates = map_payload(&payload).unwrap();
        assert_eq!(candidates[0].price, None);
        assert!(candidates[0].validation_error().is_some());
    }
}
