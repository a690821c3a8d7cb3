//! On-disk locations of a tracked script
//!
//! Downloads are cached in `<cache>/<md5(url)>/<file name>` so that two
//! URLs ending in the same file name never overwrite each other's cache.
//! The installed copy lives directly in the scripts directory.

use std::path::PathBuf;
use url::Url;

use super::file_name::url_to_file_name;
use super::ScriptError;
use crate::config::Paths;

/// Compute the cache key for a URL
///
/// # Returns
/// The MD5 hash of the URL as a hex string
pub fn url_hash(url: &str) -> String {
    format!("{:x}", md5::compute(url.as_bytes()))
}

/// Parse and validate a script URL
pub fn parse_script_url(url: &str) -> Result<Url, ScriptError> {
    let parsed = Url::parse(url).map_err(|source| ScriptError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ScriptError::UnsupportedScheme {
            url: url.to_string(),
            scheme: other.to_string(),
        }),
    }
}

/// Where a script's cached download and installed copy live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLocation {
    /// File name derived from the URL
    pub file_name: String,

    /// Latest download
    pub cached: PathBuf,

    /// Copy the browser loads
    pub installed: PathBuf,
}

impl ScriptLocation {
    /// Resolve the locations for `url` under `paths`
    pub fn for_url(url: &str, paths: &Paths) -> Result<Self, ScriptError> {
        let parsed = parse_script_url(url)?;
        let file_name = url_to_file_name(&parsed).ok_or_else(|| ScriptError::NoFileName {
            url: url.to_string(),
        })?;

        Ok(Self {
            cached: paths.cache_dir.join(url_hash(url)).join(&file_name),
            installed: paths.scripts_dir.join(&file_name),
            file_name,
        })
    }
}
