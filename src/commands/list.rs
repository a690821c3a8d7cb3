//! List command - Show tracked scripts

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};

use super::utils;
use crate::config::Paths;
use crate::script::{ScriptEntry, ScriptStore};

/// Options for the list command
pub struct ListOptions {
    /// Include a URL column
    pub urls: bool,
}

/// Execute the list command and return formatted output
pub fn execute(paths: &Paths, options: ListOptions) -> Result<String> {
    let store = ScriptStore::load(&paths.config_file)?;

    if store.is_empty() {
        return Ok("No scripts tracked. Use `add <url>` to track one.".to_string());
    }

    let mut output = render(store.entries(), options.urls);
    output.push_str(&format!("\n\n{} scripts tracked", store.len()));
    Ok(output)
}

/// Build the table of tracked scripts
pub fn render(entries: &[ScriptEntry], with_urls: bool) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("Name")];
    if with_urls {
        header.push(Cell::new("URL"));
    }
    header.push(Cell::new("Pinned"));
    header.push(Cell::new("Last updated"));
    header.push(Cell::new("Needs update"));
    table.set_header(header);

    for entry in entries {
        let mut row = vec![Cell::new(&entry.nickname)];
        if with_urls {
            row.push(Cell::new(&entry.url));
        }
        row.push(Cell::new(yes_no(entry.pinned)));
        row.push(Cell::new(utils::format_timestamp(entry.last_updated)));
        row.push(Cell::new(yes_no(entry.needs_update)));
        table.add_row(row);
    }

    table.to_string()
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entries() -> Vec<ScriptEntry> {
        let mut pinned = ScriptEntry::new("https://example.com/pinned.user.js", "pinned-one", 0);
        pinned.pinned = true;
        vec![
            ScriptEntry::new("https://example.com/free.user.js", "free-one", 0),
            pinned,
        ]
    }

    #[test]
    fn test_render_without_urls() {
        let out = render(&entries(), false);
        assert!(out.contains("free-one"));
        assert!(out.contains("pinned-one"));
        assert!(out.contains("Pinned"));
        assert!(!out.contains("https://example.com"));
    }

    #[test]
    fn test_render_with_urls() {
        let out = render(&entries(), true);
        assert!(out.contains("URL"));
        assert!(out.contains("free.user.js"));
    }

    #[test]
    fn test_render_keeps_order() {
        let out = render(&entries(), false);
        let free = out.find("free-one").unwrap();
        let pinned = out.find("pinned-one").unwrap();
        assert!(free < pinned);
    }

    #[test]
    fn test_execute_empty() {
        let dir = tempdir().unwrap();
        let paths = Paths {
            config_file: dir.path().join("urls.toml"),
            cache_dir: dir.path().join("cache"),
            scripts_dir: dir.path().join("scripts"),
        };

        let out = execute(&paths, ListOptions { urls: false }).unwrap();
        assert!(out.contains("No scripts tracked"));
        // Listing never creates the config file
        assert!(!paths.config_file.exists());
    }

    #[test]
    fn test_execute_counts() {
        let dir = tempdir().unwrap();
        let paths = Paths {
            config_file: dir.path().join("urls.toml"),
            cache_dir: dir.path().join("cache"),
            scripts_dir: dir.path().join("scripts"),
        };
        let mut store = ScriptStore::default();
        for entry in entries() {
            store.add(entry).unwrap();
        }
        store.save(&paths.config_file).unwrap();

        let out = execute(&paths, ListOptions { urls: true }).unwrap();
        assert!(out.ends_with("2 scripts tracked"));
    }
}
