//! Path helpers for the host's virtual filesystem
//!
//! The host stores paths such as thumbnails as `special://` URLs and plays
//! media from network shares. These helpers translate, classify and
//! legalize such paths before they touch the local filesystem.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::config::HostConfig;
use crate::models::OsKind;

static REMOTE_SHARE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(smb|ftp|ftps|http|https|nfs):.+").expect("remote share pattern is valid")
});

const SPECIAL_PREFIX: &str = "special://";

/// Characters a Windows file name cannot contain
const WINDOWS_ILLEGAL: &[char] = &[':', '*', '?', '"', '<', '>', '|'];

/// Resolves `special://` paths against the host's directory layout
#[derive(Debug, Clone)]
pub struct SpecialPaths {
    home: PathBuf,
    userdata: PathBuf,
}

impl SpecialPaths {
    /// Layout rooted at `home` and `userdata`
    pub fn new(home: impl Into<PathBuf>, userdata: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            userdata: userdata.into(),
        }
    }

    /// Layout from the configured host directories
    pub fn from_config(host: &HostConfig) -> Self {
        Self::new(&host.home_dir, &host.userdata_dir)
    }

    /// Root directory a special location maps to
    fn root(&self, location: &str) -> Option<PathBuf> {
        let root = match location {
            "home" => self.home.clone(),
            "masterprofile" | "profile" | "userdata" => self.userdata.clone(),
            "database" => self.userdata.join("Database"),
            "thumbnails" => self.userdata.join("Thumbnails"),
            "temp" => self.home.join("temp"),
            _ => return None,
        };
        Some(root)
    }

    /// Translate a `special://` path to a local path.
    ///
    /// Anything else, including unknown special locations, is returned as-is.
    pub fn translate(&self, path: &str) -> PathBuf {
        let Some(rest) = path.strip_prefix(SPECIAL_PREFIX) else {
            return PathBuf::from(path);
        };
        let (location, remainder) = rest.split_once('/').unwrap_or((rest, ""));
        match self.root(location) {
            Some(root) if remainder.is_empty() => root,
            Some(root) => root.join(remainder),
            None => PathBuf::from(path),
        }
    }

    /// Directory where the host keeps its versioned databases
    pub fn database_dir(&self) -> PathBuf {
        self.translate("special://database/")
    }
}

/// Whether `path` points at a network share rather than local storage
pub fn is_remote_share(path: &str) -> bool {
    REMOTE_SHARE_PATTERN.is_match(path)
}

/// Rewrite an `smb://` URL to a UNC path on Windows-like hosts.
///
/// Other hosts, and an unknown host, get the path back unchanged.
pub fn smb_path_for_os(path: &str, os: Option<OsKind>) -> String {
    match os {
        Some(os) if os.uses_backslash() => path.replace("smb://", r"\\").replace('/', r"\"),
        _ => path.to_string(),
    }
}

/// Make the last component of `path` legal for the host's filesystem and
/// drop a single trailing separator.
pub fn make_legal_filename(path: &str, os: Option<OsKind>) -> String {
    let windows = os.is_some_and(|os| os.uses_backslash());
    let split_at = path.rfind(|c: char| c == '/' || (windows && c == '\\'));

    let (dir, name) = match split_at {
        Some(idx) if idx + 1 < path.len() => path.split_at(idx + 1),
        Some(_) => (path, ""),
        None => ("", path),
    };

    let mut legal: String = name
        .chars()
        .map(|c| {
            if c.is_control() || (windows && WINDOWS_ILLEGAL.contains(&c)) {
                '_'
            } else {
                c
            }
        })
        .collect();
    if windows {
        let trimmed_len = legal.trim_end_matches(&['.', ' '][..]).len();
        legal.truncate(trimmed_len);
    }

    let mut result = format!("{dir}{legal}");
    let separator = if windows { '\\' } else { std::path::MAIN_SEPARATOR };
    if result.ends_with('/') || result.ends_with(separator) {
        result.pop();
    }
    result
}

/// Whether `path` exists as a regular file
pub fn is_regular_file(path: &Path) -> bool {
    path.metadata().is_ok_and(|meta| meta.is_file())
}
