//! Add command - Start tracking a script URL

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use super::utils;
use crate::config::Paths;
use crate::script::file_name::default_nickname;
use crate::script::{ScriptEntry, ScriptLocation, ScriptStore, StoreError};

/// What `add` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new entry was appended
    Added(ScriptEntry),
    /// The URL was already tracked; nothing changed
    Duplicate,
}

/// Append `url` to `store`
///
/// The URL must be fetchable and name a file; the nickname defaults to the
/// file name without its `.user.js` suffix.
pub fn add(
    store: &mut ScriptStore,
    paths: &Paths,
    url: &str,
    nickname: Option<&str>,
    now: i64,
) -> Result<AddOutcome> {
    let location = ScriptLocation::for_url(url, paths)?;

    let nickname = match nickname.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => default_nickname(&location.file_name),
    };

    if !store.contains(url) {
        if let Some(existing) = entry_with_file_name(store, paths, &location.file_name) {
            return Err(StoreError::FileNameTaken {
                url: url.to_string(),
                file_name: location.file_name,
                existing: existing.url.clone(),
            }
            .into());
        }
    }

    match store.add(ScriptEntry::new(url, nickname, now)) {
        Ok(()) => {
            let entry = store
                .get(url)
                .cloned()
                .context("Entry missing right after insert")?;
            Ok(AddOutcome::Added(entry))
        }
        Err(StoreError::DuplicateEntry(_)) => Ok(AddOutcome::Duplicate),
        Err(e) => Err(e.into()),
    }
}

/// The tracked entry whose script installs as `file_name`, if any
fn entry_with_file_name<'a>(
    store: &'a ScriptStore,
    paths: &Paths,
    file_name: &str,
) -> Option<&'a ScriptEntry> {
    store.entries().iter().find(|entry| {
        ScriptLocation::for_url(&entry.url, paths)
            .map(|loc| loc.file_name == file_name)
            .unwrap_or(false)
    })
}

/// Execute the add command
pub fn execute(paths: &Paths, url: &str, nickname: Option<&str>) -> Result<()> {
    let mut store = ScriptStore::load(&paths.config_file)?;

    match add(&mut store, paths, url, nickname, utils::now_timestamp())? {
        AddOutcome::Added(entry) => {
            store
                .save(&paths.config_file)
                .context("Failed to save tracked scripts")?;
            println!(
                "{} {} ({})",
                "Added:".green(),
                entry.nickname,
                entry.url.dimmed()
            );
        }
        AddOutcome::Duplicate => {
            eprintln!("{} '{}' is already tracked", "Warning:".yellow(), url);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn test_paths(dir: &TempDir) -> Paths {
        Paths {
            config_file: dir.path().join("config").join("urls.toml"),
            cache_dir: dir.path().join("cache"),
            scripts_dir: dir.path().join("scripts"),
        }
    }

    #[test]
    fn test_add_uses_default_nickname() {
        let dir = tempdir().unwrap();
        let paths = test_paths(&dir);
        let mut store = ScriptStore::default();

        let outcome = add(
            &mut store,
            &paths,
            "https://example.com/s/dark-mode.user.js",
            None,
            42,
        )
        .unwrap();

        match outcome {
            AddOutcome::Added(entry) => {
                assert_eq!(entry.nickname, "dark-mode");
                assert_eq!(entry.last_updated, 42);
                assert!(!entry.pinned);
            }
            AddOutcome::Duplicate => panic!("expected a new entry"),
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_explicit_nickname() {
        let dir = tempdir().unwrap();
        let paths = test_paths(&dir);
        let mut store = ScriptStore::default();

        add(
            &mut store,
            &paths,
            "https://example.com/a.js",
            Some("  Alpha "),
            1,
        )
        .unwrap();

        assert_eq!(store.entries()[0].nickname, "Alpha");
    }

    #[test]
    fn test_add_invalid_url_rejected() {
        let dir = tempdir().unwrap();
        let paths = test_paths(&dir);
        let mut store = ScriptStore::default();

        assert!(add(&mut store, &paths, "ftp://example.com/a.js", None, 1).is_err());
        assert!(add(&mut store, &paths, "https://example.com/", None, 1).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_rejects_taken_file_name() {
        let dir = tempdir().unwrap();
        let paths = test_paths(&dir);
        let mut store = ScriptStore::default();
        let alice = "https://raw.example.com/alice/x/main/script.user.js";
        let bob = "https://raw.example.com/bob/y/main/script.user.js";

        add(&mut store, &paths, alice, None, 1).unwrap();
        let before = store.clone();

        let err = add(&mut store, &paths, bob, None, 2).unwrap_err();

        match err.downcast_ref::<StoreError>() {
            Some(StoreError::FileNameTaken {
                file_name,
                existing,
                ..
            }) => {
                assert_eq!(file_name, "script.user.js");
                assert_eq!(existing, alice);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(store, before);
    }

    #[test]
    fn test_execute_taken_file_name_is_fatal() {
        let dir = tempdir().unwrap();
        let paths = test_paths(&dir);

        execute(&paths, "https://a.example/script.user.js", None).unwrap();
        assert!(execute(&paths, "https://b.example/script.user.js", None).is_err());

        let store = ScriptStore::load(&paths.config_file).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_execute_duplicate_leaves_file_unchanged() {
        let dir = tempdir().unwrap();
        let paths = test_paths(&dir);
        let url = "https://example.com/a.user.js";

        execute(&paths, url, Some("first")).unwrap();
        let before = fs::read_to_string(&paths.config_file).unwrap();

        // Duplicate is reported, not fatal
        execute(&paths, url, Some("second")).unwrap();
        let after = fs::read_to_string(&paths.config_file).unwrap();

        assert_eq!(before, after);
        let store = ScriptStore::load(&paths.config_file).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].nickname, "first");
    }

    #[test]
    fn test_execute_appends_in_order() {
        let dir = tempdir().unwrap();
        let paths = test_paths(&dir);

        execute(&paths, "https://example.com/b.js", None).unwrap();
        execute(&paths, "https://example.com/a.js", None).unwrap();

        let store = ScriptStore::load(&paths.config_file).unwrap();
        let urls: Vec<&str> = store.entries().iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, ["https://example.com/b.js", "https://example.com/a.js"]);
    }
}
