//! Storage key layout for the bucket.

use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

/// Key of the JSON document holding every pet record.
pub const PETS_KEY: &str = "data/pets.json";

/// Prefix under which uploaded photos are stored.
pub const IMAGE_PREFIX: &str = "images/";

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.\-]").expect("filename pattern is valid"));

/// Make an uploaded filename safe to embed in a storage key.
///
/// Runs of whitespace become `_`, then anything outside `[A-Za-z0-9_.-]` is
/// dropped. The result may be empty.
pub fn sanitize_filename(original: &str) -> String {
    let underscored = WHITESPACE.replace_all(original, "_");
    DISALLOWED.replace_all(&underscored, "").into_owned()
}

/// Fresh key for a photo: `images/<uuid>_<sanitized filename>`.
pub fn image_key(original_filename: &str) -> String {
    format!(
        "{}{}_{}",
        IMAGE_PREFIX,
        Uuid::new_v4(),
        sanitize_filename(original_filename)
    )
}
