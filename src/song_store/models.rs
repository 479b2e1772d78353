use rusqlite::types::ValueRef;
use serde::Deserialize;
use serde_json::{Map, Number, Value};

/// A song row as returned to clients: an ordered mapping from column name to
/// value, keyed by whatever columns the query reports. The response shape
/// follows the live table schema rather than a compiled-in struct.
pub type SongRow = Map<String, Value>;

#[derive(Debug)]
pub struct NewSong {
    pub song_id: i64,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub file_path: String,
}

/// The non-key fields of a song, as sent in an update request body.
#[derive(Debug, Deserialize)]
pub struct SongFields {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Artist")]
    pub artist: String,
    #[serde(rename = "Album")]
    pub album: String,
    #[serde(rename = "FilePath")]
    pub file_path: String,
}

pub(super) fn value_ref_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(text) => Value::from(String::from_utf8_lossy(text).into_owned()),
        ValueRef::Blob(blob) => Value::from(String::from_utf8_lossy(blob).into_owned()),
    }
}
