//! Bookmark repository
//!
//! Wraps [`VideoDatabase`] with the fallbacks callers rely on: a host
//! without a readable video database yields no bookmarks and deletes
//! nothing, and neither case is an error.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::db::{self, VideoDatabase};
use crate::error::Result;
use crate::locator::DatabaseLocator;
use crate::logging::OperationTimer;
use crate::metrics::MetricsCollector;
use crate::models::Bookmark;
use crate::paths::{self, SpecialPaths};

/// What happened to the thumbnails and rows of a delete batch
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeleteReport {
    /// Rows the DELETE statements matched
    pub rows_deleted: usize,
    /// Thumbnail files removed from disk
    pub thumbnails_removed: Vec<PathBuf>,
    /// Thumbnail files that existed but could not be removed
    pub thumbnails_failed: Vec<PathBuf>,
}

/// Result of [`BookmarkRepository::delete_bookmarks`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// All rows deleted and committed together
    Committed(DeleteReport),
    /// No database could be opened; the input comes back untouched
    Unavailable(Vec<Bookmark>),
    /// A statement or the commit failed and the rows were rolled back.
    ///
    /// Thumbnail removal is not transactional: files listed in
    /// `report.thumbnails_removed` are gone even though their rows remain.
    RolledBack {
        /// The input, returned untouched
        bookmarks: Vec<Bookmark>,
        /// Rows and thumbnails handled before the failure
        report: DeleteReport,
        /// Message of the failing statement or commit
        error: String,
    },
}

/// Access to the host's saved bookmarks
pub trait BookmarkRepository {
    /// Bookmarks with a thumbnail for `file_path`, ordered by position.
    /// Empty when the store is unavailable.
    fn select_bookmarks(&self, file_path: &str) -> Vec<Bookmark>;

    /// Delete the rows and thumbnails of `bookmarks`.
    fn delete_bookmarks(&self, bookmarks: Vec<Bookmark>) -> DeleteOutcome;
}

/// Bookmark repository backed by the host's SQLite video database
#[derive(Debug, Clone)]
pub struct KodiBookmarkRepository {
    locator: DatabaseLocator,
    special_paths: SpecialPaths,
    metrics: MetricsCollector,
}

impl KodiBookmarkRepository {
    /// Repository over the database `locator` finds, resolving thumbnails with `special_paths`
    pub fn new(locator: DatabaseLocator, special_paths: SpecialPaths) -> Self {
        Self {
            locator,
            special_paths,
            metrics: MetricsCollector::default(),
        }
    }

    /// Locate and open the database; `None` means the feature is unavailable.
    fn open(&self) -> Option<VideoDatabase> {
        let db_file = self.locator.locate()?;
        match VideoDatabase::open(&db_file) {
            Ok(db) => Some(db),
            Err(e) => {
                error!(path = %db_file.display(), error = %e, "Failed to open video database");
                None
            }
        }
    }

    /// Remove the thumbnail behind `thumbnail` if it is a regular file.
    fn remove_thumbnail(&self, thumbnail: &str, report: &mut DeleteReport) {
        if thumbnail.is_empty() {
            return;
        }
        let local = self.special_paths.translate(thumbnail);
        if !paths::is_regular_file(&local) {
            debug!(thumbnail = %local.display(), "Thumbnail not present, skipping");
            return;
        }
        match fs::remove_file(&local) {
            Ok(()) => report.thumbnails_removed.push(local),
            Err(e) => {
                warn!(thumbnail = %local.display(), error = %e, "Failed to remove thumbnail");
                report.thumbnails_failed.push(local);
            }
        }
    }

    fn delete_batch(&self, db: &mut VideoDatabase, bookmarks: &[Bookmark], report: &mut DeleteReport) -> Result<()> {
        let tx = db.begin()?;
        for bookmark in bookmarks {
            report.rows_deleted += db::delete_bookmark(&tx, bookmark.id)?;
            self.remove_thumbnail(&bookmark.thumbnail_path, report);
        }
        tx.commit()?;
        Ok(())
    }
}

impl BookmarkRepository for KodiBookmarkRepository {
    fn select_bookmarks(&self, file_path: &str) -> Vec<Bookmark> {
        let timer = OperationTimer::new("select_bookmarks");
        let Some(db) = self.open() else {
            debug!(file = file_path, "Video database unavailable, no bookmarks");
            return Vec::new();
        };

        match db.select_bookmarks(file_path) {
            Ok(bookmarks) => {
                self.metrics.record_db_operation("select_bookmarks", timer.elapsed(), true);
                self.metrics.record_bookmarks_selected(bookmarks.len());
                debug!(file = file_path, count = bookmarks.len(), "Selected bookmarks");
                bookmarks
            }
            Err(e) => {
                self.metrics.record_db_operation("select_bookmarks", timer.elapsed(), false);
                error!(db = %db.path().display(), file = file_path, error = %e, "Bookmark query failed");
                Vec::new()
            }
        }
    }

    fn delete_bookmarks(&self, bookmarks: Vec<Bookmark>) -> DeleteOutcome {
        let timer = OperationTimer::new("delete_bookmarks");
        let Some(mut db) = self.open() else {
            debug!(count = bookmarks.len(), "Video database unavailable, nothing deleted");
            return DeleteOutcome::Unavailable(bookmarks);
        };

        let mut report = DeleteReport::default();
        match self.delete_batch(&mut db, &bookmarks, &mut report) {
            Ok(()) => {
                self.metrics.record_db_operation("delete_bookmarks", timer.elapsed(), true);
                self.metrics.record_bookmarks_deleted(report.rows_deleted);
                info!(
                    rows = report.rows_deleted,
                    thumbnails = report.thumbnails_removed.len(),
                    "Deleted bookmarks"
                );
                DeleteOutcome::Committed(report)
            }
            Err(e) => {
                self.metrics.record_db_operation("delete_bookmarks", timer.elapsed(), false);
                error!(
                    db = %db.path().display(),
                    error = %e,
                    thumbnails_removed = report.thumbnails_removed.len(),
                    "Bookmark deletion rolled back"
                );
                DeleteOutcome::RolledBack {
                    bookmarks,
                    report,
                    error: e.to_string(),
                }
            }
        }
    }
}
