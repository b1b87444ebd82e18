//! Video database schema definitions
//!
//! Constants for the tables and columns of the host-owned video database.
//! The schema belongs to the host application; only the columns this crate
//! reads or deletes are listed.

/// Bookmark table schema
pub mod bookmark {
    /// Table name
    pub const TABLE: &str = "bookmark";
    /// Primary key column
    pub const ID: &str = "idBookmark";
    /// Foreign key to the files table
    pub const FILE_ID: &str = "idFile";
    /// Bookmark offset column (seconds, stored as a double)
    pub const TIME_IN_SECONDS: &str = "timeInSeconds";
    /// Video length column (seconds, stored as a double)
    pub const TOTAL_TIME_IN_SECONDS: &str = "totalTimeInSeconds";
    /// Thumbnail image path column
    pub const THUMBNAIL_IMAGE: &str = "thumbNailImage";
}

/// Files table schema
pub mod files {
    /// Table name
    pub const TABLE: &str = "files";
    /// Primary key column
    pub const ID: &str = "idFile";
    /// Foreign key to the path table
    pub const PATH_ID: &str = "idPath";
    /// File name column
    pub const FILENAME: &str = "strFilename";
}

/// Path table schema
pub mod path {
    /// Table name
    pub const TABLE: &str = "path";
    /// Primary key column
    pub const ID: &str = "idPath";
    /// Directory column, with trailing separator
    pub const PATH: &str = "strPath";
}
