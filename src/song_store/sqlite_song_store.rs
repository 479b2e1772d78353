use super::models::value_ref_to_json;
use super::schema::SONGS_VERSIONED_SCHEMAS;
use super::{NewSong, SongFields, SongRow, SongStore, StoreError, StoreResult};
use crate::sqlite_persistence::BASE_DB_VERSION;
use anyhow::{Context, Result};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, Params};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Song store backed by a single SQLite connection.
///
/// The connection is shared behind a mutex, so statements from concurrent
/// requests are serialized; each statement is prepared, run, and finalized
/// within one locked scope.
pub struct SqliteSongStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSongStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        let is_new_db = !path.exists();

        let mut conn = Connection::open(path).context("Failed to open songs database")?;

        if is_new_db {
            // Fresh database - create with latest schema
            info!("Creating new songs database at {:?}", path);
            SONGS_VERSIONED_SCHEMAS.last().unwrap().create(&conn)?;
        } else {
            // Existing database - check version and migrate if needed
            let raw_version: i64 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
            let db_version = raw_version - BASE_DB_VERSION as i64;

            if db_version < 1 {
                anyhow::bail!(
                    "Songs database version {} is invalid (expected >= 1)",
                    db_version
                );
            }

            let current_schema_version = SONGS_VERSIONED_SCHEMAS.last().unwrap().version as i64;

            let version_index = SONGS_VERSIONED_SCHEMAS
                .iter()
                .position(|s| s.version == db_version as usize)
                .with_context(|| format!("Unknown songs database version {}", db_version))?;
            SONGS_VERSIONED_SCHEMAS[version_index]
                .validate(&conn)
                .with_context(|| {
                    format!(
                        "Songs database schema validation failed for version {}",
                        db_version
                    )
                })?;

            if db_version < current_schema_version {
                info!(
                    "Migrating songs database from version {} to {}",
                    db_version, current_schema_version
                );
                Self::migrate(&mut conn, db_version as usize)?;
            }
        }

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn migrate(conn: &mut Connection, from_version: usize) -> Result<()> {
        let tx = conn.transaction()?;
        let mut latest_version = from_version;
        for schema in SONGS_VERSIONED_SCHEMAS.iter() {
            if schema.version > from_version {
                if let Some(migration_fn) = schema.migration {
                    migration_fn(&tx).with_context(|| {
                        format!("Failed to run migration to version {}", schema.version)
                    })?;
                }
                latest_version = schema.version;
            }
        }
        tx.execute(
            &format!("PRAGMA user_version = {}", BASE_DB_VERSION + latest_version),
            [],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Runs a SELECT and maps every result row to a column-name-keyed JSON
    /// object, using the column names the statement reports.
    fn query_song_rows<P: Params>(
        conn: &Connection,
        sql: &str,
        params: P,
    ) -> StoreResult<Vec<SongRow>> {
        let mut stmt = conn.prepare(sql)?;
        let column_names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let mut rows = stmt.query(params)?;
        let mut songs = Vec::new();
        while let Some(row) = rows.next()? {
            let mut song = SongRow::new();
            for (index, name) in column_names.iter().enumerate() {
                song.insert(name.clone(), value_ref_to_json(row.get_ref(index)?));
            }
            songs.push(song);
        }
        Ok(songs)
    }
}

impl SongStore for SqliteSongStore {
    fn add_song(&self, song: &NewSong) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO Songs (SongID, Title, Artist, Album, FilePath)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                song.song_id,
                song.title,
                song.artist,
                song.album,
                song.file_path
            ],
        )
        .map_err(|err| match err {
            rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
                StoreError::Duplicate(song.song_id)
            }
            other => StoreError::Database(other),
        })?;
        Ok(())
    }

    fn get_all_songs(&self) -> StoreResult<Vec<SongRow>> {
        let conn = self.conn.lock().unwrap();
        Self::query_song_rows(&conn, "SELECT * FROM Songs", params![])
    }

    fn update_song(&self, song_id: i64, fields: &SongFields) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute(
            "UPDATE Songs SET Title = ?1, Artist = ?2, Album = ?3, FilePath = ?4
             WHERE SongID = ?5",
            params![
                fields.title,
                fields.artist,
                fields.album,
                fields.file_path,
                song_id
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound(song_id));
        }
        Ok(())
    }

    fn delete_song(&self, song_id: i64) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute("DELETE FROM Songs WHERE SongID = ?1", params![song_id])?;
        if affected == 0 {
            return Err(StoreError::NotFound(song_id));
        }
        Ok(())
    }

    fn search_songs(
        &self,
        song_id: Option<i64>,
        title: Option<&str>,
    ) -> StoreResult<Vec<SongRow>> {
        let mut sql = String::from("SELECT * FROM Songs WHERE 1=1");
        let mut bindings: Vec<SqlValue> = Vec::new();

        if let Some(id) = song_id {
            sql.push_str(" AND SongID = ?");
            bindings.push(SqlValue::Integer(id));
        }
        if let Some(needle) = title {
            // SQLite LIKE is case-insensitive for ASCII
            sql.push_str(" AND Title LIKE ?");
            bindings.push(SqlValue::Text(format!("%{}%", needle)));
        }

        let conn = self.conn.lock().unwrap();
        Self::query_song_rows(&conn, &sql, params_from_iter(bindings))
    }
}
