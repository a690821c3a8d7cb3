//! Comparing fetched scripts against installed copies
//!
//! The comparison itself is a byte-for-byte check. Showing the actual
//! differences is delegated to an external viewer (`delta`, `diff -u`,
//! git's pager, ...) that is handed the two files.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Fallback viewer when nothing else is configured
const DEFAULT_DIFF_PROGRAM: &str = "diff";
const DEFAULT_DIFF_ARGS: &[&str] = &["-u"];

/// Shell syntax a whitespace split cannot express
const SHELL_METACHARACTERS: &[char] = &['|', '"', '\'', '&', ';', '<', '>', '$', '`'];

/// Result of comparing a download with the installed copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOutcome {
    /// Installed copy is identical to the download
    Unchanged,
    /// Installed copy exists and differs
    Changed,
    /// Nothing installed yet
    New,
}

impl fmt::Display for DiffOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unchanged => write!(f, "unchanged"),
            Self::Changed => write!(f, "changed"),
            Self::New => write!(f, "new"),
        }
    }
}

/// Compare `fetched` with the installed content, if any
pub fn compare(fetched: &str, installed: Option<&[u8]>) -> DiffOutcome {
    match installed {
        None => DiffOutcome::New,
        Some(bytes) if bytes == fetched.as_bytes() => DiffOutcome::Unchanged,
        Some(_) => DiffOutcome::Changed,
    }
}

/// Read the installed copy; a missing file is `None`
pub fn read_installed(path: &Path) -> io::Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Size of a change, for when no viewer is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeSummary {
    pub old_lines: usize,
    pub new_lines: usize,
    pub old_bytes: usize,
    pub new_bytes: usize,
}

impl ChangeSummary {
    pub fn between(old: &[u8], new: &[u8]) -> Self {
        Self {
            old_lines: count_lines(old),
            new_lines: count_lines(new),
            old_bytes: old.len(),
            new_bytes: new.len(),
        }
    }
}

impl fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} lines, {} -> {} bytes",
            self.old_lines, self.new_lines, self.old_bytes, self.new_bytes
        )
    }
}

fn count_lines(bytes: &[u8]) -> usize {
    if bytes.is_empty() {
        return 0;
    }
    let newlines = bytes.iter().filter(|&&b| b == b'\n').count();
    // A final line without a trailing newline still counts
    if bytes.ends_with(b"\n") {
        newlines
    } else {
        newlines + 1
    }
}

/// External program used to display a diff between two files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffViewer {
    program: String,
    args: Vec<String>,
}

impl DiffViewer {
    /// Parse a whitespace-separated command line such as `"delta --side-by-side"`
    ///
    /// The command is run directly, not through a shell. Commands using
    /// quotes, pipes or other shell syntax (`diff-so-fancy | less -RFX`)
    /// are rejected so that resolution moves on to the next candidate.
    pub fn from_command_line(command: &str) -> Option<Self> {
        if command.contains(SHELL_METACHARACTERS) {
            log::warn!(
                "Ignoring diff command '{}': quotes and pipes are not supported",
                command.trim()
            );
            return None;
        }

        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Pick the viewer: configured command, then git's `core.pager`, then `diff -u`
    pub fn resolve(configured: Option<&str>) -> Self {
        configured
            .and_then(Self::from_command_line)
            .or_else(|| git_pager().as_deref().and_then(Self::from_command_line))
            .unwrap_or_else(Self::fallback)
    }

    fn fallback() -> Self {
        Self {
            program: DEFAULT_DIFF_PROGRAM.to_string(),
            args: DEFAULT_DIFF_ARGS.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the viewer on the two files and wait for it to exit
    ///
    /// `diff` exits with status 1 when files differ, so the status is
    /// returned rather than treated as an error.
    pub fn show(&self, installed: &Path, fetched: &Path) -> io::Result<ExitStatus> {
        log::debug!(
            "Running {} {:?} {} {}",
            self.program,
            self.args,
            installed.display(),
            fetched.display()
        );
        Command::new(&self.program)
            .args(&self.args)
            .arg(installed)
            .arg(fetched)
            .status()
    }
}

/// The user's global git pager, if git is installed and one is set
fn git_pager() -> Option<String> {
    let output = Command::new("git")
        .args(["config", "--global", "core.pager"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let pager = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if pager.is_empty() {
        None
    } else {
        Some(pager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_compare() {
        assert_eq!(compare("a", None), DiffOutcome::New);
        assert_eq!(compare("a", Some(b"a")), DiffOutcome::Unchanged);
        assert_eq!(compare("a", Some(b"b")), DiffOutcome::Changed);
        assert_eq!(compare("", Some(b"")), DiffOutcome::Unchanged);
    }

    #[test]
    fn test_compare_trailing_newline_matters() {
        assert_eq!(compare("a\n", Some(b"a")), DiffOutcome::Changed);
    }

    #[test]
    fn test_read_installed_missing() {
        let dir = tempdir().unwrap();
        assert_eq!(read_installed(&dir.path().join("nope.js")).unwrap(), None);
    }

    #[test]
    fn test_read_installed_present() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.js");
        fs::write(&path, "content").unwrap();
        assert_eq!(
            read_installed(&path).unwrap(),
            Some(b"content".to_vec())
        );
    }

    #[test]
    fn test_change_summary() {
        let summary = ChangeSummary::between(b"a\nb\n", b"a\nb\nc");
        assert_eq!(summary.old_lines, 2);
        assert_eq!(summary.new_lines, 3);
        assert_eq!(summary.to_string(), "2 -> 3 lines, 4 -> 5 bytes");
        assert_eq!(ChangeSummary::between(b"", b"").old_lines, 0);
    }

    #[test]
    fn test_viewer_from_command_line() {
        let viewer = DiffViewer::from_command_line("delta --side-by-side").unwrap();
        assert_eq!(viewer.program(), "delta");
        assert_eq!(viewer.args, vec!["--side-by-side".to_string()]);
        assert!(DiffViewer::from_command_line("   ").is_none());
    }

    #[test]
    fn test_configured_viewer_wins() {
        let viewer = DiffViewer::resolve(Some("colordiff"));
        assert_eq!(viewer.program(), "colordiff");
    }

    #[test]
    fn test_fallback_is_unified_diff() {
        let viewer = DiffViewer::fallback();
        assert_eq!(viewer.program(), "diff");
        assert_eq!(viewer.args, vec!["-u".to_string()]);
    }

    #[test]
    fn test_shell_syntax_rejected() {
        assert!(DiffViewer::from_command_line("diff-so-fancy | less -RFX").is_none());
        assert!(
            DiffViewer::from_command_line(r#"delta --features "side-by-side line-numbers""#)
                .is_none()
        );
        assert!(DiffViewer::from_command_line("delta --features 'a b'").is_none());
    }

    #[test]
    fn test_rejected_configured_viewer_falls_through() {
        // Falls through to git's pager or the default, never the piped command
        let viewer = DiffViewer::resolve(Some("colordiff | less"));
        assert_ne!(viewer.program(), "colordiff");
    }
}
