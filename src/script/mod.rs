//! Tracked userscripts: naming, on-disk locations and the config store

pub mod file_name;
pub mod install;
pub mod location;
pub mod store;

use thiserror::Error;

pub use file_name::url_to_file_name;
pub use location::ScriptLocation;
pub use store::{ScriptEntry, ScriptStore, Settings, StoreError};

/// Errors raised while deriving a script's identity from its URL
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The URL could not be parsed
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Only http and https URLs can be fetched
    #[error("unsupported URL scheme '{scheme}' in '{url}'")]
    UnsupportedScheme { url: String, scheme: String },

    /// The URL path has no segment a file name can be derived from
    #[error("cannot derive a file name from '{url}'")]
    NoFileName { url: String },
}
