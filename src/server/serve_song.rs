//! Media file resolution and byte transfer.

use axum::{
    body::Body,
    extract::Path,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::path::PathBuf;
use tower_http::services::ServeDir;
use tracing::{debug, error};

fn file_not_found(path: &std::path::Path) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("File not found: {}", path.display()) })),
    )
        .into_response()
}

/// Serves the file at the caller-supplied path.
///
/// The path arrives url-encoded and is treated as-is once decoded: absolute
/// paths are served from anywhere on the host, relative ones resolve against
/// the working directory. Byte transfer is delegated to [`ServeDir`], which
/// picks the content type from the file extension.
pub async fn serve_song(Path(raw_path): Path<String>) -> Response {
    let file_path = PathBuf::from(&raw_path);

    match tokio::fs::metadata(&file_path).await {
        Ok(metadata) if metadata.is_file() => {}
        _ => return file_not_found(&file_path),
    }

    let (directory, file_name) = match (file_path.parent(), file_path.file_name()) {
        (Some(directory), Some(file_name)) => (
            directory.to_path_buf(),
            file_name.to_string_lossy().into_owned(),
        ),
        _ => return file_not_found(&file_path),
    };
    // A bare relative file name has an empty parent
    let directory = if directory.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        directory
    };

    debug!("Serving song from {}", file_path.display());

    let request = match Request::builder()
        .uri(format!("/{}", urlencoding::encode(&file_name)))
        .body(Body::empty())
    {
        Ok(request) => request,
        Err(err) => {
            error!("Serve song error for {}: {}", file_path.display(), err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response();
        }
    };

    let mut file_server = ServeDir::new(&directory);
    match file_server.try_call(request).await {
        Ok(response) => response.map(Body::new).into_response(),
        Err(err) => {
            error!("Serve song error for {}: {}", file_path.display(), err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response()
        }
    }
}
