// SPDX-License-Identifier: MIT

//! Booking webhook client.
//!
//! One outbound HTTP POST per booking. The response body is never parsed;
//! only success or failure of the call is observed. No retry and no
//! idempotency key: a failed submission is retried by the user, not by
//! this layer.

use crate::error::{AppError, Result};
use serde::Serialize;

/// Booking submission payload.
///
/// `hours` is a stringified number and `date` is `YYYY-MM-DD`, matching
/// what the webhook consumer already accepts from the original client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub hours: String,
    pub date: String,
    pub user_id: String,
}

/// Webhook client for booking submissions.
#[derive(Clone)]
pub struct BookingClient {
    http: reqwest::Client,
    endpoint: String,
}

impl BookingClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Submit a booking. Failure is surfaced to the caller, who decides
    /// whether and how to present it.
    pub async fn send(&self, request: &BookingRequest) -> Result<()> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::Webhook(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "Booking webhook rejected submission");
            return Err(AppError::Webhook(format!("HTTP {}: {}", status, body)));
        }

        tracing::info!(user_id = %request.user_id, "Booking submitted");
        Ok(())
    }
}
