mod versioned_schema;

pub use versioned_schema::{Column, SqlType, Table, VersionedSchema};

/// Offset added to the schema version stored in `PRAGMA user_version`, so a
/// database file written by an unrelated application is not mistaken for ours.
pub const BASE_DB_VERSION: usize = 7300;
