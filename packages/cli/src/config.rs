// ABOUTME: Server configuration loaded from environment variables
// ABOUTME: Every setting has a sensible default for local development

use std::env;
use std::path::PathBuf;

use tracing::warn;

pub const DEFAULT_PORT: u16 = 4810;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub cors_origin: String,
    pub database_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let port = match env::var("TASKDECK_PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Invalid TASKDECK_PORT '{raw}', using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        let cors_origin = env::var("TASKDECK_CORS_ORIGIN")
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string());

        let database_path = env::var("TASKDECK_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| taskdeck_core::database_file());

        Self {
            port,
            cors_origin,
            database_path,
        }
    }
}
