use super::RequestsLoggingLevel;
use std::path::PathBuf;

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    /// Directory listed by the `/list_songs` endpoint. Relative paths are
    /// resolved against the working directory.
    pub songs_dir_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 3001,
            songs_dir_path: PathBuf::from("songs"),
        }
    }
}
