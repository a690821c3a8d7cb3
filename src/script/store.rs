//! Tracked-scripts store
//!
//! Persists the ordered list of tracked scripts in `urls.toml`:
//!
//! ```toml
//! [settings]
//! diff_command = "delta"
//!
//! [[script]]
//! url = "https://example.com/foo.user.js"
//! nickname = "foo"
//! pinned = false
//! last_updated = 1700000000
//! needs_update = false
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised by the store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The file lists the same URL twice
    #[error("{} tracks '{url}' more than once", .path.display())]
    DuplicateInFile { path: PathBuf, url: String },

    /// `add` was given a URL that is already tracked
    #[error("'{0}' is already tracked")]
    DuplicateEntry(String),

    /// Another tracked URL already installs to the same file
    #[error("'{url}' would install to '{file_name}', already used by '{existing}'")]
    FileNameTaken {
        url: String,
        file_name: String,
        existing: String,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A tracked script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEntry {
    pub url: String,

    pub nickname: String,

    /// Pinned scripts are never fetched by `update`
    #[serde(default)]
    pub pinned: bool,

    /// Unix timestamp of the last install
    #[serde(default)]
    pub last_updated: i64,

    /// Set when the remote copy differs from the installed one but was not installed
    #[serde(default)]
    pub needs_update: bool,
}

impl ScriptEntry {
    pub fn new(url: impl Into<String>, nickname: impl Into<String>, now: i64) -> Self {
        Self {
            url: url.into(),
            nickname: nickname.into(),
            pinned: false,
            last_updated: now,
            needs_update: false,
        }
    }
}

/// User settings stored next to the tracked scripts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Program used to display diffs (e.g. "delta" or "diff -u")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_command: Option<String>,

    /// HTTP timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Settings {
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    fn is_empty(&self) -> bool {
        self == &Settings::default()
    }
}

/// On-disk shape of `urls.toml`
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default, skip_serializing_if = "Settings::is_empty")]
    settings: Settings,

    #[serde(default, rename = "script")]
    scripts: Vec<ScriptEntry>,
}

/// Ordered list of tracked scripts, unique by URL
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScriptStore {
    pub settings: Settings,
    entries: Vec<ScriptEntry>,
}

impl ScriptStore {
    /// Load the store from `path`
    ///
    /// A file that does not exist yet is an empty store.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();

        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No config at {}, starting empty", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, StoreError> {
        let file: ConfigFile = toml::from_str(content).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut seen = HashSet::new();
        for entry in &file.scripts {
            if !seen.insert(entry.url.as_str()) {
                return Err(StoreError::DuplicateInFile {
                    path: path.to_path_buf(),
                    url: entry.url.clone(),
                });
            }
        }

        Ok(Self {
            settings: file.settings,
            entries: file.scripts,
        })
    }

    /// Write the store to `path`, creating parent directories if necessary
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let path = path.as_ref();

        let file = ConfigFile {
            settings: self.settings.clone(),
            scripts: self.entries.clone(),
        };
        let content = toml::to_string_pretty(&file)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Append `entry` unless its URL is already tracked
    pub fn add(&mut self, entry: ScriptEntry) -> Result<(), StoreError> {
        if self.contains(&entry.url) {
            return Err(StoreError::DuplicateEntry(entry.url));
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.get(url).is_some()
    }

    pub fn get(&self, url: &str) -> Option<&ScriptEntry> {
        self.entries.iter().find(|e| e.url == url)
    }

    pub fn entries(&self) -> &[ScriptEntry] {
        &self.entries
    }

    /// Mutable access for in-place updates; URLs must not be changed
    pub fn entries_mut(&mut self) -> &mut [ScriptEntry] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
