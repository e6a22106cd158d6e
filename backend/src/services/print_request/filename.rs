//! Naming rules for stored uploads.

use log::warn;
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Extensions accepted for upload, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 2] = ["stl", "obj"];

const FALLBACK_FILENAME: &str = "upload";

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.\-]").expect("static regex"));

/// Returns the extension of `filename` (as typed) when it is one we accept.
///
/// The extension is whatever follows the last dot; a name without a dot has none.
pub fn allowed_file(filename: &str) -> Option<&str> {
    let (_, ext) = filename.rsplit_once('.')?;
    let lower = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS
        .contains(&lower.as_str())
        .then_some(ext)
}

/// Drops one leading symbol from a draft order name, e.g. `#D1001` -> `D1001`.
///
/// Names that do not start with a symbol are returned unchanged.
pub fn order_file_stem(order_name: &str) -> &str {
    let mut chars = order_name.chars();
    let stem = match chars.next() {
        Some(c) if !c.is_alphanumeric() => chars.as_str(),
        _ => order_name,
    };

    if stem.len() == order_name.len() || stem.is_empty() || !stem.chars().all(char::is_alphanumeric)
    {
        warn!(
            "Draft order name {:?} is not <symbol><alphanumerics>; naming upload after {:?}",
            order_name, stem
        );
    }

    stem
}

/// `Order_<stem>.<ext>` before sanitizing.
pub fn order_file_name(order_name: &str, ext: &str) -> String {
    format!("Order_{}.{}", order_file_stem(order_name), ext)
}

/// Reduces `name` to a token that is safe as a single path component.
///
/// Accents are split off by NFKD normalization and whatever is still not
/// ASCII is dropped, path separators and whitespace collapse
/// to `_`, anything outside `[A-Za-z0-9_.-]` is removed and leading or trailing
/// dots and underscores are trimmed.
pub fn secure_filename(name: &str) -> String {
    let ascii: String = name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = UNSAFE_CHARS.replace_all(&joined, "");
    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c == '_');

    if trimmed.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}
