//! Deterministic placeholder-image URLs.
//!
//! Prompts and categories without a real image get a generated
//! ui-avatars.com URL instead, so list and detail views never render an
//! empty image slot. The URLs are pure functions of the entity's display
//! data -- the same prompt always gets the same placeholder.

/// Keyword-to-color pairs for placeholder backgrounds, checked in order.
/// The first keyword contained in a prompt tag wins.
const KEYWORD_COLORS: &[(&str, &str)] = &[
    ("writing", "6366F1"),
    ("marketing", "EC4899"),
    ("ai", "8B5CF6"),
    ("blog", "14B8A6"),
    ("social-media", "F59E0B"),
    ("content", "10B981"),
    ("coding", "3B82F6"),
    ("programming", "3B82F6"),
    ("academic", "8B5CF6"),
    ("business", "6366F1"),
    ("creative", "EC4899"),
    ("data", "3B82F6"),
    ("education", "14B8A6"),
    ("design", "EC4899"),
    ("advertising", "F59E0B"),
    ("product", "6366F1"),
    ("travel", "10B981"),
    ("health", "14B8A6"),
    ("chatbot", "3B82F6"),
    ("customer-service", "F59E0B"),
];

/// Background palette for category placeholder images.
const CATEGORY_PALETTE: &[&str] = &[
    "4338CA", "3B82F6", "06B6D4", "10B981", "059669", "65A30D", "CA8A04", "EA580C", "E11D48",
    "BE185D", "7E22CE", "6366F1",
];

/// Maximum characters of the title shown on a prompt placeholder.
const MAX_DISPLAY_CHARS: usize = 20;

/// Generate the placeholder image URL for a prompt.
///
/// The display text is the first (up to) three words of the title, capped at
/// 20 characters. The background color comes from the first tag matching
/// [`KEYWORD_COLORS`], falling back to a color hashed from the author name
/// so one author's untagged prompts share a hue.
pub fn generate_prompt_placeholder(title: &str, user_name: &str, keywords: &[String]) -> String {
    let mut display = String::new();
    let mut chars = 0usize;
    for word in title.split_whitespace().take(3) {
        if chars + word.len() > MAX_DISPLAY_CHARS {
            break;
        }
        if !display.is_empty() {
            display.push(' ');
        }
        display.push_str(word);
        chars += word.len();
    }
    if display.is_empty() {
        display.push_str("Untitled Prompt");
    }

    let bg_color = keywords
        .iter()
        .find_map(|kw| {
            let normalized = kw.to_lowercase();
            KEYWORD_COLORS
                .iter()
                .find(|(key, _)| normalized.contains(key))
                .map(|(_, color)| (*color).to_string())
        })
        .unwrap_or_else(|| hash_color(user_name));

    format!(
        "https://ui-avatars.com/api/?name={}&background={}&color=fff&size=300&font-size=0.33&bold=true&length=20",
        encode_component(&display),
        bg_color
    )
}

/// Resolve the display image for a prompt: the stored image verbatim when
/// present and non-empty, otherwise a generated placeholder. Never empty.
pub fn prompt_image_url(
    title: &str,
    image: Option<&str>,
    user_name: &str,
    tags: &[String],
) -> String {
    if let Some(image) = image {
        if !image.trim().is_empty() {
            return image.to_string();
        }
    }
    generate_prompt_placeholder(title, user_name, tags)
}

/// Generate the placeholder image URL for a category, picking a palette
/// color by name hash so each category keeps a stable color.
pub fn category_image_url(name: &str) -> String {
    let idx = (djb2_hash(name).unsigned_abs() as usize) % CATEGORY_PALETTE.len();
    format!(
        "https://ui-avatars.com/api/?name={}&background={}&color=fff&size=300&bold=true",
        encode_component(name),
        CATEGORY_PALETTE[idx]
    )
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// djb2-style string hash, matching `c + (h << 5) - h` accumulation.
fn djb2_hash(input: &str) -> i64 {
    let mut hash: i64 = 0;
    for c in input.chars() {
        hash = (c as i64).wrapping_add((hash << 5).wrapping_sub(hash));
    }
    hash
}

/// Hex background color derived from a name hash, padded to six digits.
fn hash_color(name: &str) -> String {
    let hex = format!("{:x}", djb2_hash(name).unsigned_abs());
    let mut color: String = hex.chars().take(6).collect();
    while color.len() < 6 {
        color.push('0');
    }
    color
}

/// Percent-encode a string for use as a URL query component.
///
/// Unreserved characters (RFC 3986) pass through; everything else is
/// encoded byte-wise as `%XX`.
pub fn encode_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
