//! Test server lifecycle management
//!
//! Each test gets an isolated server on a random port with its own songs
//! database and songs directory inside a temporary directory.
#![allow(dead_code)] // Not every test binary uses every helper

use songbook_server::server::server::make_app;
use songbook_server::server::{RequestsLoggingLevel, ServerConfig};
use songbook_server::song_store::SqliteSongStore;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;

pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The directory listed by /list_songs; tests drop media files here
    pub songs_dir: PathBuf,

    // Keep temp resources alive until drop
    _temp_dir: TempDir,
}

impl TestServer {
    /// Spawns a test server with an existing (empty) songs directory.
    pub async fn spawn() -> Self {
        Self::spawn_inner(true).await
    }

    /// Spawns a test server whose songs directory does not exist.
    pub async fn spawn_without_songs_dir() -> Self {
        Self::spawn_inner(false).await
    }

    async fn spawn_inner(create_songs_dir: bool) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("songs.db");
        let songs_dir = temp_dir.path().join("songs");
        if create_songs_dir {
            std::fs::create_dir(&songs_dir).expect("Failed to create songs dir");
        }

        let song_store =
            Arc::new(SqliteSongStore::new(&db_path).expect("Failed to open song store"));
        let config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            port: 0,
            songs_dir_path: songs_dir.clone(),
        };
        let app = make_app(config, song_store);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener
            .local_addr()
            .expect("Failed to get local address");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Test server crashed");
        });

        TestServer {
            base_url: format!("http://{}", addr),
            songs_dir,
            _temp_dir: temp_dir,
        }
    }
}
