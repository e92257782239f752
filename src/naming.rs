//! Unique, filesystem-safe names for stored clips.

use std::path::Path;
use std::sync::OnceLock;

use chrono::Utc;
use regex::Regex;
use uuid::Uuid;

/// Default number of characters kept from the original filename's stem.
pub const STEM_MAX_CHARS: usize = 20;

const RANDOM_LEN: usize = 12;
const EMPTY_STEM: &str = "upload";

static DISALLOWED: OnceLock<Regex> = OnceLock::new();
static SEPARATORS: OnceLock<Regex> = OnceLock::new();

/// Allocate `<prefix>_<user>_<unix secs>_<random>_<stem>` for an upload.
///
/// ```
/// let name = clipwave::naming::unique_name("audio", "u42", "My Song (live).mp3");
/// assert!(name.starts_with("audio_u42_"));
/// assert!(name.ends_with("_My_Song_live"));
/// ```
pub fn unique_name(prefix: &str, user_id: &str, original_filename: &str) -> String {
    unique_name_capped(prefix, STEM_MAX_CHARS, user_id, original_filename)
}

/// [`unique_name`] keeping at most `stem_max_chars` of the original stem.
pub fn unique_name_capped(
    prefix: &str,
    stem_max_chars: usize,
    user_id: &str,
    original_filename: &str,
) -> String {
    unique_name_at(
        prefix,
        stem_max_chars,
        user_id,
        original_filename,
        Utc::now().timestamp(),
    )
}

/// Same as [`unique_name_capped`] with an explicit timestamp.
pub fn unique_name_at(
    prefix: &str,
    stem_max_chars: usize,
    user_id: &str,
    original_filename: &str,
    timestamp: i64,
) -> String {
    let random = Uuid::new_v4().simple().to_string();
    let user = sanitize(user_id, usize::MAX);
    let stem = Path::new(original_filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let stem = sanitize(stem, stem_max_chars);
    let stem = if stem.is_empty() { EMPTY_STEM } else { &stem };

    format!(
        "{prefix}_{user}_{timestamp}_{}_{stem}",
        &random[..RANDOM_LEN]
    )
}

/// Keep ASCII alphanumerics and underscores, turning runs of `-`/whitespace into `_`.
pub fn sanitize(raw: &str, max_chars: usize) -> String {
    let disallowed = DISALLOWED.get_or_init(|| {
        Regex::new(r"[^A-Za-z0-9_\s-]").expect("static pattern")
    });
    let separators = SEPARATORS.get_or_init(|| Regex::new(r"[-\s]+").expect("static pattern"));

    let capped: String = raw.chars().take(max_chars).collect();
    let kept = disallowed.replace_all(&capped, "");
    separators.replace_all(kept.trim(), "_").into_owned()
}
