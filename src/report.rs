//! Terminal interaction during `update`: showing diffs and asking for confirmation

use anyhow::Result;
use owo_colors::OwoColorize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::diff::{ChangeSummary, DiffViewer};

/// Interactive side of the update workflow
pub trait Console {
    /// Ask a yes/no question; anything but "y" is a no
    fn confirm(&mut self, question: &str) -> Result<bool>;

    /// Present the differences between the installed and fetched copies of `name`
    fn show_diff(&mut self, name: &str, installed: &Path, fetched: &Path) -> Result<()>;
}

/// Console backed by stdin/stdout and an external diff viewer
pub struct TerminalConsole {
    viewer: DiffViewer,
}

impl TerminalConsole {
    pub fn new(viewer: DiffViewer) -> Self {
        Self { viewer }
    }
}

impl Console for TerminalConsole {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        print!("{} (y/N) ", question);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        Ok(is_yes(&input))
    }

    fn show_diff(&mut self, name: &str, installed: &Path, fetched: &Path) -> Result<()> {
        println!("{} {}", "Changes in".bold(), name.bold());

        if let Err(e) = self.viewer.show(installed, fetched) {
            // Viewer not installed: fall back to a size summary
            eprintln!(
                "{} could not run '{}': {}",
                "Warning:".yellow(),
                self.viewer.program(),
                e
            );
            let summary = ChangeSummary::between(&fs::read(installed)?, &fs::read(fetched)?);
            println!("  {}", summary.dimmed());
        }

        Ok(())
    }
}

fn is_yes(input: &str) -> bool {
    let answer = input.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
