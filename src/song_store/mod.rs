mod models;
mod schema;
mod sqlite_song_store;

pub use models::{NewSong, SongFields, SongRow};
pub use sqlite_song_store::SqliteSongStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SongID {0} already exists")]
    Duplicate(i64),
    #[error("SongID {0} not found")]
    NotFound(i64),
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub trait SongStore: Send + Sync {
    /// Inserts a new song. Fails with [`StoreError::Duplicate`] when the
    /// caller-supplied id is already taken.
    fn add_song(&self, song: &NewSong) -> StoreResult<()>;

    fn get_all_songs(&self) -> StoreResult<Vec<SongRow>>;

    /// Overwrites every non-key field of an existing song.
    fn update_song(&self, song_id: i64, fields: &SongFields) -> StoreResult<()>;

    fn delete_song(&self, song_id: i64) -> StoreResult<()>;

    /// Conjunctive filter: exact id match and/or case-insensitive title
    /// substring. With neither filter, returns every song.
    fn search_songs(&self, song_id: Option<i64>, title: Option<&str>)
        -> StoreResult<Vec<SongRow>>;
}
