pub mod config;
mod http_layers;
mod serve_song;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use http_layers::*;
pub use server::run_server;
