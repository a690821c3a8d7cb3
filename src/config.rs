//! Platform-specific configuration and paths

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Directory name used under the config and cache roots
pub const PROG_NAME: &str = "qute_script_manager";

/// Name of the tracked-scripts file inside the config directory
pub const CONFIG_FILE_NAME: &str = "urls.toml";

/// Resolved locations the tool reads from and writes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// The tracked-scripts TOML file
    pub config_file: PathBuf,

    /// Per-URL download cache
    pub cache_dir: PathBuf,

    /// Browser userscript directory that scripts are installed into
    pub scripts_dir: PathBuf,
}

impl Paths {
    /// Resolve default locations, letting explicit overrides win
    pub fn resolve(
        config_file: Option<PathBuf>,
        cache_dir: Option<PathBuf>,
        scripts_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let config_file = match config_file {
            Some(p) => p,
            None => default_config_file()?,
        };
        let cache_dir = match cache_dir {
            Some(p) => p,
            None => default_cache_dir()?,
        };
        let scripts_dir = match scripts_dir {
            Some(p) => p,
            None => default_scripts_dir()?,
        };

        Ok(Self {
            config_file,
            cache_dir,
            scripts_dir,
        })
    }
}

/// Get the tracked-scripts file
/// - Linux: $XDG_CONFIG_HOME/qute_script_manager/urls.toml (~/.config by default)
/// - macOS: ~/Library/Application Support/qute_script_manager/urls.toml
/// - Windows: %APPDATA%/qute_script_manager/urls.toml
pub fn default_config_file() -> Result<PathBuf> {
    let config = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config.join(PROG_NAME).join(CONFIG_FILE_NAME))
}

/// Get the download cache directory ($XDG_CACHE_HOME/qute_script_manager on Linux)
pub fn default_cache_dir() -> Result<PathBuf> {
    let cache = dirs::cache_dir().context("Could not determine cache directory")?;
    Ok(cache.join(PROG_NAME))
}

/// Get qutebrowser's greasemonkey directory
/// - Linux: $XDG_DATA_HOME/qutebrowser/greasemonkey (~/.local/share by default)
/// - macOS: ~/Library/Application Support/qutebrowser/greasemonkey
/// - Windows: %APPDATA%/qutebrowser/greasemonkey
pub fn default_scripts_dir() -> Result<PathBuf> {
    let data = dirs::data_dir().context("Could not determine data directory")?;
    Ok(data.join("qutebrowser").join("greasemonkey"))
}
