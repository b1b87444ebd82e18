//! Locates the host's current video database file.
//!
//! The host keeps one file per schema version (`MyVideos116.db`,
//! `MyVideos119.db`, ...) in its database directory. The newest is chosen by
//! sorting names in descending lexicographic order. That ordering is not
//! numeric: `MyVideos9.db` sorts after `MyVideos10.db` and wins.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::DatabaseConfig;

/// Finds the newest database file matching a name prefix and extension
#[derive(Debug, Clone)]
pub struct DatabaseLocator {
    directory: PathBuf,
    prefix: String,
    extension: String,
}

impl DatabaseLocator {
    /// Locator for `<prefix>*<extension>` files in `directory`
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
            extension: extension.into(),
        }
    }

    /// Locator for `config` rooted at `directory`
    pub fn from_config(directory: impl Into<PathBuf>, config: &DatabaseConfig) -> Self {
        Self::new(directory, config.name_prefix.clone(), config.extension.clone())
    }

    /// Directory searched by [`Self::locate`]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the newest matching file, or `None`.
    ///
    /// A missing or unreadable directory counts as "no database".
    pub fn locate(&self) -> Option<PathBuf> {
        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(directory = %self.directory.display(), error = %e, "Database directory not readable");
                return None;
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with(&self.prefix) && name.ends_with(&self.extension))
            .collect();

        names.sort_unstable_by(|a, b| b.cmp(a));

        let found = names.first().map(|name| self.directory.join(name));
        match &found {
            Some(path) => debug!(path = %path.display(), "Located video database"),
            None => debug!(
                directory = %self.directory.display(),
                prefix = %self.prefix,
                "No matching database file"
            ),
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_locate_newest_version() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "MyVideos116.db");
        touch(dir.path(), "MyVideos119.db");
        touch(dir.path(), "MyMusic82.db");

        let locator = DatabaseLocator::new(dir.path(), "MyVideos", ".db");
        assert_eq!(locator.locate(), Some(dir.path().join("MyVideos119.db")));
    }

    #[test]
    fn test_locate_is_lexicographic_not_numeric() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "MyVideos10.db");
        touch(dir.path(), "MyVideos9.db");

        let locator = DatabaseLocator::new(dir.path(), "MyVideos", ".db");
        assert_eq!(locator.locate(), Some(dir.path().join("MyVideos9.db")));
    }

    #[test]
    fn test_locate_requires_prefix_and_extension() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "MyVideos119.db-journal");
        touch(dir.path(), "Textures13.db");
        touch(dir.path(), "OldMyVideos99.db");

        let locator = DatabaseLocator::new(dir.path(), "MyVideos", ".db");
        assert_eq!(locator.locate(), None);
    }

    #[test]
    fn test_locate_missing_directory() {
        let dir = tempdir().unwrap();
        let locator = DatabaseLocator::new(dir.path().join("absent"), "MyVideos", ".db");
        assert_eq!(locator.locate(), None);
    }
}
