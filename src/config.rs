//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup; the embedding app passes the resulting
//! `Config` into `AppCore::new`.

use std::env;
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Firebase web API key (public, identifies the project to Identity Toolkit)
    pub firebase_api_key: String,
    /// Firebase/GCP project ID (Firestore)
    pub firebase_project_id: String,
    /// Booking webhook endpoint (HTTP POST, JSON body)
    pub booking_webhook_url: String,
    /// Directory for the best-effort local snapshot cache
    pub cache_dir: PathBuf,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            firebase_api_key: "test_api_key".to_string(),
            firebase_project_id: "test-project".to_string(),
            booking_webhook_url: "http://localhost:9999/booking".to_string(),
            cache_dir: PathBuf::from(".cleanbook-cache"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file if one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            firebase_api_key: env::var("FIREBASE_API_KEY")
                .map_err(|_| ConfigError::Missing("FIREBASE_API_KEY"))?,
            firebase_project_id: env::var("FIREBASE_PROJECT_ID")
                .unwrap_or_else(|_| "local-dev".to_string()),
            booking_webhook_url: env::var("BOOKING_WEBHOOK_URL")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("BOOKING_WEBHOOK_URL"))?,
            cache_dir: env::var("CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".cleanbook-cache")),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
