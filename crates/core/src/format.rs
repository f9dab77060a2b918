//! Display-formatting helpers shared by the prompt and social views.
//!
//! All three helpers are total functions: bad input degrades to a neutral
//! value (zero, empty list, generated avatar) rather than an error, so view
//! assembly never fails on cosmetic fields.

use crate::placeholder::encode_component;

/// Mean of a list of rating values. Returns `0.0` for an empty list.
///
/// No rounding is applied here; callers round for display.
pub fn average_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let total: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    total as f64 / ratings.len() as f64
}

/// Parse a JSON-encoded tag list stored in the `prompts.tags` column.
///
/// The column is either NULL or a JSON array of strings. Anything else
/// (empty string, malformed JSON, a JSON object, non-string elements) is
/// treated as "no tags" -- this function never errors.
pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Resolve a user's avatar URL.
///
/// Returns the stored image verbatim when present and non-empty, otherwise a
/// deterministic ui-avatars.com URL keyed by the display name (falling back
/// to "Unknown" when the name is absent).
pub fn avatar_url(name: Option<&str>, image: Option<&str>) -> String {
    if let Some(image) = image {
        if !image.trim().is_empty() {
            return image.to_string();
        }
    }
    let name = match name {
        Some(n) if !n.trim().is_empty() => n,
        _ => "Unknown",
    };
    format!(
        "https://ui-avatars.com/api/?name={}&background=random",
        encode_component(name)
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
