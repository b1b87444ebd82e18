//! Kodi Cutter Utils - helpers for a Kodi video-cutting add-on
//!
//! Glue between the add-on, the host media center and a Tvheadend server.
//!
//! # Features
//!
//! - Read and delete playback bookmarks from the host's video database
//! - Parse `pvr://` recording URLs into title, channel and start time
//! - Fetch finished recordings from a Tvheadend server
//! - Platform detection, `special://` paths and filename legalization

/// Configuration management
pub mod config;
/// Video database connection and statements
pub mod db;
/// Error types
pub mod error;
/// JSON-RPC calls into the host
pub mod jsonrpc;
/// Database file lookup
pub mod locator;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Bookmark list rendering
pub mod output;
/// Path translation and legalization
pub mod paths;
/// Host platform detection
pub mod platform;
/// Recording URL parsing
pub mod pvr;
/// Repository pattern for bookmark access
pub mod repository;
/// Database schema definitions
pub mod schema;
/// Tvheadend backend queries
pub mod tvheadend;

// Re-export key components for easier access
pub use error::{CutterError, Result};
pub use models::{Bookmark, OsKind, OutputFormat, RecordingReference};
pub use pvr::{is_recording_url, parse_recording_url};
pub use repository::{BookmarkRepository, DeleteOutcome, KodiBookmarkRepository};
