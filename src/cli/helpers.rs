//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::repository::{Database, Repository};
use crate::core::resource::Resource;
use crate::core::Config;

/// Open the configured database
///
/// `--database` (or `TRACKSIDE_DATABASE`) wins over the config files.
pub fn open_database(global: &GlobalOpts) -> Result<Arc<Database>> {
    let mut config = Config::load();
    if let Some(ref path) = global.database {
        config.database = Some(path.clone());
    }

    let db = Database::open(&config.database(), config.busy_timeout())?;
    Ok(Arc::new(db))
}

/// Build an initialised repository over `db`
pub fn repository<R: Resource>(db: &Arc<Database>) -> Result<Repository<R>> {
    let repo = Repository::new(Arc::clone(db));
    repo.init()?;
    Ok(repo)
}

/// Format a timestamp in the local timezone for tables
pub fn format_local(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Make a value safe for a single TSV field
pub fn escape_tsv(s: &str) -> String {
    s.replace(['\t', '\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("Zürich vs Malmö", 9), "Zürich...");
    }

    #[test]
    fn test_escape_tsv() {
        assert_eq!(escape_tsv("simple"), "simple");
        assert_eq!(escape_tsv("tab\there"), "tab here");
        assert_eq!(escape_tsv("two\nlines"), "two lines");
    }
}
