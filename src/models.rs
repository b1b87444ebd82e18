//! Data models shared across the crate
//!
//! Bookmarks read from the host's video database, recording references
//! parsed from `pvr://` URLs, and the small enums the CLI and platform
//! helpers pass around.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SECONDS_PER_DAY: i64 = 86_400;

/// Format seconds as `HH:MM:SS`.
///
/// Mirrors the host's `gmtime`-based formatting, so hours wrap every day:
/// 90 000 seconds renders as `"01:00:00"`.
#[must_use]
pub fn format_hms(seconds: i64) -> String {
    let secs = seconds.rem_euclid(SECONDS_PER_DAY);
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// A saved resume position within a video file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bookmark {
    /// Database identifier assigned by the host
    pub id: i64,
    /// Offset of the bookmark into the video
    pub time_seconds: i64,
    /// `time_seconds` as `HH:MM:SS`
    pub time_str: String,
    /// Total length of the video
    pub total_time_seconds: i64,
    /// `total_time_seconds` as `HH:MM:SS`
    pub total_time_str: String,
    /// Thumbnail image, possibly a `special://` path
    pub thumbnail_path: String,
    /// Directory part of the video path, including the trailing separator
    pub directory_path: String,
    /// File name part of the video path
    pub file_name: String,
}

impl Bookmark {
    /// Build a bookmark, deriving both time strings from the numeric fields.
    #[must_use]
    pub fn new(
        id: i64,
        time_seconds: i64,
        total_time_seconds: i64,
        thumbnail_path: impl Into<String>,
        directory_path: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            time_seconds,
            time_str: format_hms(time_seconds),
            total_time_seconds,
            total_time_str: format_hms(total_time_seconds),
            thumbnail_path: thumbnail_path.into(),
            directory_path: directory_path.into(),
            file_name: file_name.into(),
        }
    }

    /// The lookup key: directory and file name concatenated.
    #[must_use]
    pub fn full_path(&self) -> String {
        format!("{}{}", self.directory_path, self.file_name)
    }
}

/// Identity of a recorded TV program recovered from a `pvr://` URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingReference {
    /// Program title
    pub title: String,
    /// Channel the program was recorded from
    pub channel_name: String,
    /// Start time in seconds since the Unix epoch
    pub start_epoch_seconds: i64,
}

impl RecordingReference {
    /// Start time as a UTC timestamp.
    #[must_use]
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.start_epoch_seconds, 0)
    }
}

/// Operating system the host application runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsKind {
    /// Microsoft Windows desktop
    Windows,
    /// Android
    Android,
    /// Linux (including embedded distributions)
    Linux,
    /// Xbox (UWP)
    Xbox,
    /// iOS, tvOS and Apple TV
    Ios,
    /// macOS
    Darwin,
}

impl OsKind {
    /// Canonical lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Android => "android",
            Self::Linux => "linux",
            Self::Xbox => "xbox",
            Self::Ios => "ios",
            Self::Darwin => "darwin",
        }
    }

    /// Whether paths on this OS use backslash separators
    #[must_use]
    pub const fn uses_backslash(&self) -> bool {
        matches!(self, Self::Windows | Self::Xbox)
    }
}

impl fmt::Display for OsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format for rendered bookmark lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated values format
    Csv,
    /// Plain text format
    Txt,
    /// JSON format
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "txt" => Ok(Self::Txt),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
