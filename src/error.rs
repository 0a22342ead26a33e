// SPDX-License-Identifier: MIT

//! Application error types.
//!
//! Every failure in this core degrades to an error the caller can decide on;
//! nothing here retries automatically (all retry is manual, user-driven).

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Identity-provider failure (bad credentials, rejected token, ...).
    /// Not distinguished by cause; the UI shows a generic message.
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Database error: {0}")]
    Database(String),

    /// Booking webhook call failed (transport error or non-success status).
    #[error("Webhook error: {0}")]
    Webhook(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True if this error means a document that was expected to exist is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Database(msg) if msg.contains("not found"))
    }
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, AppError>;
