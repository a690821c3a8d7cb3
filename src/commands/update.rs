//! Update command - Fetch tracked scripts and install new versions
//!
//! Each unpinned script is downloaded, cached, and compared with the copy
//! in the scripts directory. New and changed scripts are installed after
//! confirmation (or straight away with `--noconfirm`); `--skipcopy` only
//! records which scripts have updates waiting.

use anyhow::{bail, Context, Result};
use owo_colors::OwoColorize;
use std::collections::HashMap;

use super::utils;
use crate::config::Paths;
use crate::diff::{self, ChangeSummary, DiffOutcome, DiffViewer};
use crate::fetch::{FetchSettings, Fetcher, HttpFetcher};
use crate::report::{Console, TerminalConsole};
use crate::script::install;
use crate::script::{ScriptEntry, ScriptLocation, ScriptStore};

/// Options for the update command
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    /// Install without asking or showing diffs
    pub noconfirm: bool,
    /// Never write into the scripts directory
    pub skipcopy: bool,
}

/// What happened to a single entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Content written to the scripts directory
    Installed,
    /// Installed copy already matches the remote
    Unchanged,
    /// User said no
    Declined,
    /// Update available but `--skipcopy` was given
    Pending,
    /// Skipped without fetching
    Pinned,
    /// Download or URL problem; reported and skipped
    Failed,
}

/// Tally of an update run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub installed: usize,
    pub unchanged: usize,
    pub declined: usize,
    pub pending: usize,
    pub pinned: usize,
    pub failed: usize,
}

impl UpdateReport {
    fn record(&mut self, outcome: EntryOutcome) {
        let counter = match outcome {
            EntryOutcome::Installed => &mut self.installed,
            EntryOutcome::Unchanged => &mut self.unchanged,
            EntryOutcome::Declined => &mut self.declined,
            EntryOutcome::Pending => &mut self.pending,
            EntryOutcome::Pinned => &mut self.pinned,
            EntryOutcome::Failed => &mut self.failed,
        };
        *counter += 1;
    }
}

impl std::fmt::Display for UpdateReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} installed, {} up to date, {} declined, {} pending, {} pinned, {} failed",
            self.installed, self.unchanged, self.declined, self.pending, self.pinned, self.failed
        )
    }
}

/// Run the update workflow over every entry of `store`, in order
///
/// Entries are mutated in place; the caller persists the store.
pub fn run(
    store: &mut ScriptStore,
    paths: &Paths,
    fetcher: &dyn Fetcher,
    console: &mut dyn Console,
    options: UpdateOptions,
    now: i64,
) -> Result<UpdateReport> {
    let mut report = UpdateReport::default();
    let conflicts = shared_file_conflicts(store.entries(), paths);

    for (index, entry) in store.entries_mut().iter_mut().enumerate() {
        if let Some(owner) = conflicts.get(&index) {
            eprintln!(
                "{} {} installs to the same file as {}",
                "Skipping:".red(),
                entry.url,
                owner
            );
            report.record(EntryOutcome::Failed);
            continue;
        }

        let outcome = update_entry(entry, paths, fetcher, console, options, now)?;
        log::debug!("{}: {:?}", entry.url, outcome);
        report.record(outcome);
    }

    Ok(report)
}

/// Unpinned entries whose installed file is already claimed by an earlier
/// entry, mapped to the URL of that earlier entry
///
/// Updating them would overwrite another tracked script on every run.
fn shared_file_conflicts(entries: &[ScriptEntry], paths: &Paths) -> HashMap<usize, String> {
    let mut owners: HashMap<String, &str> = HashMap::new();
    let mut conflicts = HashMap::new();

    for (index, entry) in entries.iter().enumerate() {
        let Ok(location) = ScriptLocation::for_url(&entry.url, paths) else {
            continue;
        };
        match owners.get(&location.file_name) {
            Some(owner) if !entry.pinned => {
                conflicts.insert(index, owner.to_string());
            }
            Some(_) => {}
            None => {
                owners.insert(location.file_name, &entry.url);
            }
        }
    }

    conflicts
}

fn update_entry(
    entry: &mut ScriptEntry,
    paths: &Paths,
    fetcher: &dyn Fetcher,
    console: &mut dyn Console,
    options: UpdateOptions,
    now: i64,
) -> Result<EntryOutcome> {
    if entry.pinned {
        log::info!("Skipping pinned script {}", entry.nickname);
        return Ok(EntryOutcome::Pinned);
    }

    let location = match ScriptLocation::for_url(&entry.url, paths) {
        Ok(loc) => loc,
        Err(e) => {
            eprintln!("{} {}", "Skipping:".red(), e);
            return Ok(EntryOutcome::Failed);
        }
    };

    log::info!("Fetching {}", entry.url);
    let content = match fetcher.fetch(&entry.url) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{} {}", "Failed:".red(), e);
            return Ok(EntryOutcome::Failed);
        }
    };

    install::store_download(&content, &location.cached)?;

    let installed = diff::read_installed(&location.installed)
        .with_context(|| format!("Failed to read: {}", location.installed.display()))?;
    let outcome = diff::compare(&content, installed.as_deref());

    if outcome == DiffOutcome::Unchanged {
        println!("{} is already up to date", entry.nickname);
        entry.needs_update = false;
        return Ok(EntryOutcome::Unchanged);
    }

    if options.skipcopy {
        println!(
            "{} {} ({})",
            "Update available:".yellow(),
            entry.nickname,
            outcome
        );
        entry.needs_update = true;
        return Ok(EntryOutcome::Pending);
    }

    let accepted = match (outcome, options.noconfirm) {
        (_, true) => {
            if let Some(old) = installed.as_deref() {
                let summary = ChangeSummary::between(old, content.as_bytes());
                println!("{} {}: {}", "Changed".yellow(), entry.nickname, summary);
            }
            true
        }
        (DiffOutcome::New, false) => {
            console.confirm(&format!("Install {} {}?", entry.nickname, entry.url))?
        }
        (_, false) => {
            console.show_diff(&entry.nickname, &location.installed, &location.cached)?;
            console.confirm(&format!("Update {}?", entry.nickname))?
        }
    };

    if !accepted {
        println!("Skipped {}", entry.nickname);
        entry.needs_update = true;
        return Ok(EntryOutcome::Declined);
    }

    install::install_script(&content, &location.installed)?;
    println!(
        "{} {} -> {}",
        "Installed:".green(),
        entry.nickname,
        location.installed.display()
    );
    entry.last_updated = now;
    entry.needs_update = false;

    Ok(EntryOutcome::Installed)
}

/// Execute the update command
pub fn execute(paths: &Paths, options: UpdateOptions) -> Result<()> {
    let mut store = ScriptStore::load(&paths.config_file)?;

    if !paths.scripts_dir.is_dir() {
        bail!(
            "Could not find target userscript directory {}",
            paths.scripts_dir.display()
        );
    }

    if store.is_empty() {
        println!("No scripts tracked. Use `add <url>` to track one.");
        return Ok(());
    }

    let fetcher = HttpFetcher::new(FetchSettings {
        timeout: std::time::Duration::from_secs(store.settings.timeout_secs()),
        ..FetchSettings::default()
    });
    let mut console = TerminalConsole::new(DiffViewer::resolve(
        store.settings.diff_command.as_deref(),
    ));

    let report = run_and_save(
        &mut store,
        paths,
        &fetcher,
        &mut console,
        options,
        utils::now_timestamp(),
    )?;
    println!("\n{}", report);

    Ok(())
}

/// Run the workflow and write the store back to the config file once
///
/// The store is saved even when the run stops on an error, so scripts
/// installed before the failure keep their bookkeeping.
pub fn run_and_save(
    store: &mut ScriptStore,
    paths: &Paths,
    fetcher: &dyn Fetcher,
    console: &mut dyn Console,
    options: UpdateOptions,
    now: i64,
) -> Result<UpdateReport> {
    let result = run(store, paths, fetcher, console, options, now);

    store
        .save(&paths.config_file)
        .context("Failed to save tracked scripts")?;

    result
}
