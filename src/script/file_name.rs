//! File name derivation for installed scripts
//!
//! A script is installed under the last segment of its URL path, so
//! `https://example.com/scripts/dark-mode.user.js?v=2` becomes
//! `dark-mode.user.js`. Some hosts produce very long segments; those are
//! shortened to keep file names manageable.

use url::Url;

/// Longest file name used verbatim
pub const MAX_FILE_NAME_LEN: usize = 64;

/// Number of stem characters kept when a name is shortened
const TRUNCATED_STEM_LEN: usize = 61;

/// Derive the installed file name from a script URL
///
/// Rules:
/// 1. Take the last non-empty segment of the URL path (query and fragment are ignored)
/// 2. If it is longer than 64 characters, keep the first 61 characters of the
///    stem and append the original extension
///
/// Returns `None` when the path has no usable segment.
///
/// # Example
/// ```
/// use qute_script_manager::script::url_to_file_name;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/a/dark-mode.user.js?v=2").unwrap();
/// assert_eq!(url_to_file_name(&url).as_deref(), Some("dark-mode.user.js"));
/// ```
pub fn url_to_file_name(url: &Url) -> Option<String> {
    let last = url.path().trim_matches('/').rsplit('/').next()?;

    if last.is_empty() {
        return None;
    }

    if last.chars().count() <= MAX_FILE_NAME_LEN {
        return Some(last.to_string());
    }

    let (stem, ext) = split_extension(last);
    let stem: String = stem.chars().take(TRUNCATED_STEM_LEN).collect();
    Some(format!("{}{}", stem, ext))
}

/// Nickname used when `add` is not given one: the file name minus its
/// userscript suffix
pub fn default_nickname(file_name: &str) -> String {
    let stem = file_name
        .strip_suffix(".user.js")
        .or_else(|| file_name.strip_suffix(".js"))
        .unwrap_or(file_name);

    if stem.is_empty() {
        file_name.to_string()
    } else {
        stem.to_string()
    }
}

/// Split `name` into stem and extension (including the dot)
///
/// Leading dots belong to the stem, so `.hidden` has no extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if !name[..idx].chars().all(|c| c == '.') => name.split_at(idx),
        _ => (name, ""),
    }
}
