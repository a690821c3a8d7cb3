//! Writing downloads to the cache and installing them

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Mode given to scripts installed for the first time
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

#[derive(Debug, Error)]
pub enum InstallError {
    /// The directory the file belongs in does not exist
    #[error("target directory not found: {}", .0.display())]
    MissingDir(PathBuf),

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Save a fresh download at `cached`, creating its directory
pub fn store_download(content: &str, cached: &Path) -> Result<(), InstallError> {
    if let Some(parent) = cached.parent() {
        fs::create_dir_all(parent).map_err(|source| InstallError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    log::debug!("Caching download at {}", cached.display());
    fs::write(cached, content).map_err(|source| InstallError::Io {
        path: cached.to_path_buf(),
        source,
    })
}

/// Replace the installed script at `dest` with `content`
///
/// The content is written to a temporary file in the same directory and
/// renamed over `dest`, so the browser never sees a half-written script.
/// The directory itself is owned by the browser and is never created here.
///
/// An existing script keeps its permissions; a new one is created 0644 on Unix.
pub fn install_script(content: &str, dest: &Path) -> Result<(), InstallError> {
    let dir = match dest.parent() {
        Some(d) if d.is_dir() => d,
        Some(d) => return Err(InstallError::MissingDir(d.to_path_buf())),
        None => return Err(InstallError::MissingDir(dest.to_path_buf())),
    };

    let io_err = |source| InstallError::Io {
        path: dest.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(content.as_bytes()).map_err(io_err)?;

    let permissions = match fs::metadata(dest) {
        Ok(meta) => Some(meta.permissions()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => new_file_permissions(),
        Err(e) => return Err(io_err(e)),
    };
    if let Some(permissions) = permissions {
        tmp.as_file().set_permissions(permissions).map_err(io_err)?;
    }

    tmp.persist(dest).map_err(|e| io_err(e.error))?;

    log::info!("Installed {}", dest.display());
    Ok(())
}

#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(NEW_FILE_MODE))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[cfg(unix)]
    fn mode(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[cfg(unix)]
    #[test]
    fn test_install_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        for original in [0o640, 0o755] {
            let dest = dir.path().join(format!("mode-{:o}.user.js", original));
            fs::write(&dest, "old").unwrap();
            fs::set_permissions(&dest, fs::Permissions::from_mode(original)).unwrap();

            install_script("new", &dest).unwrap();

            assert_eq!(mode(&dest), original);
            assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_install_new_file_is_world_readable() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("script.user.js");

        install_script("body", &dest).unwrap();

        assert_eq!(mode(&dest), NEW_FILE_MODE);
    }

    #[test]
    fn test_install_replaces_existing() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("foo.user.js");
        fs::write(&dest, "old").unwrap();

        install_script("new", &dest).unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
        // No temp files left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_install_requires_existing_dir() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("missing").join("foo.user.js");

        let err = install_script("x", &dest).unwrap_err();
        assert!(matches!(err, InstallError::MissingDir(_)));
        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn test_store_download_creates_dirs() {
        let dir = tempdir().unwrap();
        let cached = dir.path().join("abc123").join("foo.user.js");

        store_download("body", &cached).unwrap();

        assert_eq!(fs::read_to_string(&cached).unwrap(), "body");
    }
}
