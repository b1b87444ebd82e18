use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OpenFlags, Row, Transaction};
use tracing::debug;

use crate::error::Result;
use crate::models::Bookmark;
use crate::schema::{bookmark, files, path};

/// Open handle on the host's video database.
///
/// One handle per operation; the connection is closed when the handle is
/// dropped, on every exit path.
pub struct VideoDatabase {
    conn: Connection,
    path: PathBuf,
}

impl VideoDatabase {
    /// Open an existing database file read-write. Never creates a file.
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        debug!(path = %db_path.display(), "Opened video database");

        Ok(Self {
            conn,
            path: db_path.to_path_buf(),
        })
    }

    /// File this handle was opened on
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bookmarks with a thumbnail for the file whose directory and name
    /// concatenate to `file_path`, ordered by position.
    pub fn select_bookmarks(&self, file_path: &str) -> Result<Vec<Bookmark>> {
        let query = format!(
            "SELECT b.{}, b.{}, b.{}, b.{}, p.{}, f.{} \
             FROM {} b \
             INNER JOIN {} f ON (f.{} = b.{}) \
             INNER JOIN {} p ON (f.{} = p.{}) \
             WHERE p.{} || f.{} = ? \
             AND b.{} <> '' \
             ORDER BY b.{}",
            bookmark::ID,
            bookmark::TIME_IN_SECONDS,
            bookmark::TOTAL_TIME_IN_SECONDS,
            bookmark::THUMBNAIL_IMAGE,
            path::PATH,
            files::FILENAME,
            bookmark::TABLE,
            files::TABLE,
            files::ID,
            bookmark::FILE_ID,
            path::TABLE,
            files::PATH_ID,
            path::ID,
            path::PATH,
            files::FILENAME,
            bookmark::THUMBNAIL_IMAGE,
            bookmark::TIME_IN_SECONDS,
        );

        let mut stmt = self.conn.prepare(&query)?;
        let bookmark_iter = stmt.query_map(params![file_path], map_bookmark)?;

        let mut results = Vec::new();
        for bookmark in bookmark_iter {
            results.push(bookmark?);
        }

        Ok(results)
    }

    /// Start the transaction a batch of deletions shares.
    pub fn begin(&mut self) -> Result<Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }

    /// Close explicitly, surfacing any error the implicit close would hide.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e)?;
        Ok(())
    }
}

/// Delete one bookmark row inside `tx`. Deleting an absent id is a no-op.
pub fn delete_bookmark(tx: &Transaction<'_>, id: i64) -> Result<usize> {
    let deleted = tx.execute(
        &format!("DELETE FROM {} WHERE {} = ?", bookmark::TABLE, bookmark::ID),
        params![id],
    )?;
    Ok(deleted)
}

/// Map a joined row to a Bookmark.
///
/// The host stores times as doubles; they are truncated to whole seconds.
#[allow(clippy::cast_possible_truncation)]
fn map_bookmark(row: &Row<'_>) -> rusqlite::Result<Bookmark> {
    let time: f64 = row.get(1)?;
    let total: f64 = row.get(2)?;
    Ok(Bookmark::new(
        row.get(0)?,
        time as i64,
        total as i64,
        row.get::<_, String>(3)?,
        row.get::<_, String>(4)?,
        row.get::<_, String>(5)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SCHEMA: &str = "
        CREATE TABLE path (idPath INTEGER PRIMARY KEY, strPath TEXT);
        CREATE TABLE files (idFile INTEGER PRIMARY KEY, idPath INTEGER, strFilename TEXT);
        CREATE TABLE bookmark (idBookmark INTEGER PRIMARY KEY, idFile INTEGER, timeInSeconds DOUBLE,
                               totalTimeInSeconds DOUBLE, thumbNailImage TEXT);
        INSERT INTO path VALUES (1, '/videos/');
        INSERT INTO files VALUES (1, 1, 'movie.mkv');
        INSERT INTO bookmark VALUES (1, 1, 3661.75, 7200.0, 'thumb1.jpg');
    ";

    #[test]
    fn test_open_does_not_create_missing_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("MyVideos119.db");
        assert!(VideoDatabase::open(&missing).is_err());
        assert!(!missing.exists());
    }

    #[test]
    fn test_select_truncates_fractional_seconds() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("MyVideos119.db");
        Connection::open(&db_path).unwrap().execute_batch(SCHEMA).unwrap();

        let db = VideoDatabase::open(&db_path).unwrap();
        assert_eq!(db.path(), db_path.as_path());
        let bookmarks = db.select_bookmarks("/videos/movie.mkv").unwrap();
        assert_eq!(bookmarks.len(), 1);
        assert_eq!(bookmarks[0].time_seconds, 3661);
        assert_eq!(bookmarks[0].time_str, "01:01:01");
        db.close().unwrap();
    }

    #[test]
    fn test_delete_inside_transaction() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("MyVideos119.db");
        Connection::open(&db_path).unwrap().execute_batch(SCHEMA).unwrap();

        let mut db = VideoDatabase::open(&db_path).unwrap();
        let tx = db.begin().unwrap();
        assert_eq!(delete_bookmark(&tx, 1).unwrap(), 1);
        assert_eq!(delete_bookmark(&tx, 42).unwrap(), 0);
        tx.commit().unwrap();

        assert!(db.select_bookmarks("/videos/movie.mkv").unwrap().is_empty());
    }
}
