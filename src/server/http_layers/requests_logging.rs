//! Request logging middleware

use super::super::ServerConfig;
use axum::extract::State;
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;
use tracing::{error, info};

#[derive(PartialEq, PartialOrd, Clone, Debug, clap::ValueEnum)]
pub enum RequestsLoggingLevel {
    None,
    Path,
    Headers,
    Body,
}

impl Default for RequestsLoggingLevel {
    fn default() -> Self {
        Self::Path
    }
}

impl std::fmt::Display for RequestsLoggingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

const MAX_LOGGABLE_BODY_LENGTH: usize = 1024;

fn content_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

async fn buffer_and_log_request_body(
    request: Request<Body>,
) -> Result<Request<Body>, Response> {
    let size = match content_length(request.headers()) {
        Some(size) => size,
        None => {
            info!("  Req Body: Content-Length not set.");
            return Ok(request);
        }
    };
    if size >= MAX_LOGGABLE_BODY_LENGTH {
        info!("  Req Body: Too big to log ({} bytes)", size);
        return Ok(request);
    }

    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, size).await {
        Ok(bytes) => bytes,
        Err(err) => {
            error!("Failed to read request body: {:?}", err);
            return Err(StatusCode::INTERNAL_SERVER_ERROR.into_response());
        }
    };
    info!("  Req Body:\n{}", String::from_utf8_lossy(&bytes));
    Ok(Request::from_parts(parts, Body::from(bytes)))
}

pub async fn log_requests(
    State(config): State<ServerConfig>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let level = config.requests_logging_level.clone();
    let start = Instant::now();

    let method = request.method().to_string();
    let uri = request.uri().to_string();

    if level > RequestsLoggingLevel::None {
        info!(">>> {} {}", method, uri);
    }

    if level >= RequestsLoggingLevel::Headers {
        info!("  Req Headers:");
        for header in request.headers().iter() {
            info!("    {:?}: {:?}", header.0, header.1);
        }
    }

    let request = if level >= RequestsLoggingLevel::Body {
        match buffer_and_log_request_body(request).await {
            Ok(request) => request,
            Err(response) => return response,
        }
    } else {
        request
    };

    let response = next.run(request).await;

    if level > RequestsLoggingLevel::None {
        info!(
            "<<< {} ({}ms)",
            response.status().as_u16(),
            start.elapsed().as_millis()
        );
    }

    response
}
