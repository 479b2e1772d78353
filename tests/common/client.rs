//! HTTP client for end-to-end tests
//!
//! A thin wrapper around reqwest with one method per endpoint.
//! When API routes or request formats change, update only this file.
#![allow(dead_code)] // Not every test binary uses every endpoint

use reqwest::Response;
use serde_json::json;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 10;

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// GET /
    pub async fn home(&self) -> Response {
        self.get("/").await
    }

    /// GET /check_directory
    pub async fn check_directory(&self) -> Response {
        self.get("/check_directory").await
    }

    /// GET /list_songs
    pub async fn list_songs(&self) -> Response {
        self.get("/list_songs").await
    }

    /// GET /songs/{path} - the path is url-encoded into a single segment
    pub async fn serve_song(&self, path: &str) -> Response {
        self.get(&format!("/songs/{}", urlencoding::encode(path)))
            .await
    }

    /// POST /add_song with an arbitrary body
    pub async fn add_song(&self, body: &serde_json::Value) -> Response {
        self.client
            .post(format!("{}/add_song", self.base_url))
            .json(body)
            .send()
            .await
            .expect("add_song request failed")
    }

    /// POST /add_song with a well-formed song
    pub async fn add_song_fields(
        &self,
        song_id: i64,
        title: &str,
        artist: &str,
        album: &str,
        file_path: &str,
    ) -> Response {
        self.add_song(&json!({
            "SongID": song_id,
            "Title": title,
            "Artist": artist,
            "Album": album,
            "FilePath": file_path,
        }))
        .await
    }

    /// GET /get_songs
    pub async fn get_songs(&self) -> Response {
        self.get("/get_songs").await
    }

    /// PUT /update_song/{song_id}
    pub async fn update_song(&self, song_id: i64, body: &serde_json::Value) -> Response {
        self.client
            .put(format!("{}/update_song/{}", self.base_url, song_id))
            .json(body)
            .send()
            .await
            .expect("update_song request failed")
    }

    /// DELETE /delete_song/{song_id}
    pub async fn delete_song(&self, song_id: i64) -> Response {
        self.client
            .delete(format!("{}/delete_song/{}", self.base_url, song_id))
            .send()
            .await
            .expect("delete_song request failed")
    }

    /// GET /search_song with the given query parameters
    pub async fn search_song(&self, query: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}/search_song", self.base_url))
            .query(query)
            .send()
            .await
            .expect("search_song request failed")
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("GET request failed")
    }
}
