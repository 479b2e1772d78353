use anyhow::Result;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::{error, info};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::serve_song::serve_song;
use super::{log_requests, state::*, ServerConfig};
use crate::song_store::{NewSong, SongFields, SongStore, StoreError};

const REQUIRED_SONG_FIELDS: [&str; 5] = ["SongID", "Title", "Artist", "Album", "FilePath"];

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": message.into() })),
    )
        .into_response()
}

/// The single place where store failures become HTTP responses.
fn store_error_response(err: StoreError) -> Response {
    let status = match &err {
        StoreError::Duplicate(_) => StatusCode::BAD_REQUEST,
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Database(db_err) => {
            error!("Songs database error: {}", db_err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

async fn home(State(state): State<ServerState>) -> String {
    format!(
        "Songbook server is running! Uptime: {}",
        format_uptime(state.start_time.elapsed())
    )
}

async fn check_directory() -> Response {
    match std::env::current_dir() {
        Ok(cwd) => format!("Current working directory: {}", cwd.display()).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
    }
}

async fn list_songs(State(config): State<ServerConfig>) -> Response {
    let songs_dir = &config.songs_dir_path;
    if tokio::fs::metadata(songs_dir).await.is_err() {
        return (StatusCode::NOT_FOUND, "Songs directory not found").into_response();
    }

    let mut entries = match tokio::fs::read_dir(songs_dir).await {
        Ok(entries) => entries,
        Err(err) => {
            error!("Failed to read songs directory: {}", err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response();
        }
    };

    let mut file_names = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => file_names.push(entry.file_name().to_string_lossy().into_owned()),
            Ok(None) => break,
            Err(err) => {
                error!("Failed to read songs directory: {}", err);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": err.to_string() })),
                )
                    .into_response();
            }
        }
    }
    Json(file_names).into_response()
}

fn parse_new_song(body: &Value) -> Result<NewSong, String> {
    let fields = match body.as_object() {
        Some(fields) => fields,
        None => return Err("Expected a JSON object".to_owned()),
    };
    if REQUIRED_SONG_FIELDS
        .iter()
        .any(|field| !fields.contains_key(*field))
    {
        return Err("Missing fields".to_owned());
    }

    // SongID must be a positive integer; "5", 5.0 and -5 are all rejected
    let song_id = match fields["SongID"].as_i64() {
        Some(id) if id > 0 => id,
        _ => return Err("Invalid SongID".to_owned()),
    };

    let text = |name: &str| -> Result<String, String> {
        fields[name]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| format!("Invalid {}", name))
    };
    Ok(NewSong {
        song_id,
        title: text("Title")?,
        artist: text("Artist")?,
        album: text("Album")?,
        file_path: text("FilePath")?,
    })
}

async fn add_song(
    State(song_store): State<GuardedSongStore>,
    Json(body): Json<Value>,
) -> Response {
    let song = match parse_new_song(&body) {
        Ok(song) => song,
        Err(message) => return bad_request(message),
    };
    match song_store.add_song(&song) {
        Ok(()) => (
            StatusCode::CREATED,
            Json(json!({ "message": "Song added successfully" })),
        )
            .into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn get_songs(State(song_store): State<GuardedSongStore>) -> Response {
    match song_store.get_all_songs() {
        Ok(songs) => Json(songs).into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn update_song(
    State(song_store): State<GuardedSongStore>,
    Path(song_id): Path<i64>,
    Json(fields): Json<SongFields>,
) -> Response {
    match song_store.update_song(song_id, &fields) {
        Ok(()) => Json(json!({ "message": "Song updated successfully" })).into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn delete_song(
    State(song_store): State<GuardedSongStore>,
    Path(song_id): Path<i64>,
) -> Response {
    match song_store.delete_song(song_id) {
        Ok(()) => Json(json!({ "message": "Song deleted successfully" })).into_response(),
        Err(err) => store_error_response(err),
    }
}

#[derive(Deserialize, Debug)]
struct SearchParams {
    #[serde(rename = "SongID")]
    song_id: Option<String>,

    #[serde(rename = "Title")]
    title: Option<String>,
}

async fn search_song(
    State(song_store): State<GuardedSongStore>,
    Query(params): Query<SearchParams>,
) -> Response {
    // Empty parameter values count as absent, like `?SongID=&Title=`
    let song_id = match params.song_id.as_deref().filter(|raw| !raw.is_empty()) {
        None => None,
        Some(raw) => match raw.parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => return bad_request("Invalid SongID"),
        },
    };
    let title = params.title.as_deref().filter(|raw| !raw.is_empty());

    match song_store.search_songs(song_id, title) {
        Ok(songs) => Json(songs).into_response(),
        Err(err) => store_error_response(err),
    }
}

pub fn make_app(config: ServerConfig, song_store: Arc<dyn SongStore>) -> Router {
    let state = ServerState {
        config,
        start_time: Instant::now(),
        song_store,
    };

    let app: Router = Router::new()
        .route("/", get(home))
        .route("/check_directory", get(check_directory))
        .route("/list_songs", get(list_songs))
        .route("/songs/{*path}", get(serve_song))
        .route("/add_song", post(add_song))
        .route("/get_songs", get(get_songs))
        .route("/update_song/{song_id}", put(update_song))
        .route("/delete_song/{song_id}", delete(delete_song))
        .route("/search_song", get(search_song))
        .with_state(state.clone());

    app.layer(middleware::from_fn_with_state(state, log_requests))
}

pub async fn run_server(song_store: Arc<dyn SongStore>, config: ServerConfig) -> Result<()> {
    let port = config.port;
    let app = make_app(config, song_store);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, stopping server"),
        Err(err) => {
            error!("Failed to listen for shutdown signal: {}", err);
            std::future::pending::<()>().await;
        }
    }
}
