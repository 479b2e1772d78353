//! SQLite schema for the songs database.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema};

/// The one table this service owns. `SongID` is caller-supplied, not
/// auto-generated, and `FilePath` is stored as-is without an existence check.
const SONGS_TABLE_V1: Table = Table {
    name: "Songs",
    columns: &[
        sqlite_column!("SongID", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("Title", &SqlType::Text, non_null = true),
        sqlite_column!("Artist", &SqlType::Text, non_null = true),
        sqlite_column!("Album", &SqlType::Text, non_null = true),
        sqlite_column!("FilePath", &SqlType::Text, non_null = true),
    ],
};

pub const SONGS_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 1,
    tables: &[SONGS_TABLE_V1],
    migration: None,
}];
