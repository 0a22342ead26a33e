// SPDX-License-Identifier: MIT

//! Firebase Identity Toolkit client.
//!
//! Talks to the same REST surface the Firebase web SDK uses:
//! - accounts:signInWithPassword (email/password sign-in)
//! - accounts:signUp (registration)
//! - accounts:signInWithIdp (federated credential exchange)
//! - accounts:update (display name / photo)
//!
//! The client keeps the current session in memory and publishes every
//! state change on a watch channel. Sign-out is local: tokens are simply
//! forgotten and the signed-out state is published.

use crate::auth::{AuthProvider, AuthState};
use crate::error::{AppError, Result};
use crate::models::Identity;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Mutex;
use tokio::sync::watch;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// A signed-in session: who, plus the tokens backing the sign-in.
#[derive(Debug, Clone)]
struct AuthSession {
    identity: Identity,
    id_token: String,
    #[allow(dead_code)]
    refresh_token: String,
}

/// Firebase Authentication client (REST).
pub struct FirebaseAuth {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    session: Mutex<Option<AuthSession>>,
    state_tx: watch::Sender<AuthState>,
}

impl FirebaseAuth {
    /// Create a client for the project identified by `api_key`.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, IDENTITY_TOOLKIT_URL)
    }

    /// Create a client against a custom endpoint (auth emulator, tests).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        // A REST client holds no persisted session, so the signed-out state
        // is known immediately; this is the provider's first notification.
        let (state_tx, _) = watch::channel(AuthState::SignedOut);
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            session: Mutex::new(None),
            state_tx,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/accounts:{}?key={}", self.base_url, action, self.api_key)
    }

    /// POST to an Identity Toolkit action and parse the account response.
    async fn call(&self, action: &str, body: serde_json::Value) -> Result<AccountResponse> {
        let response = self
            .http
            .post(self.endpoint(action))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            // Cause is logged but not distinguished for callers; the UI
            // shows one generic message either way.
            tracing::warn!(action, %status, "Identity provider call failed");
            return Err(AppError::Auth(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("JSON parse error: {}", e)))
    }

    /// Record the session and publish the signed-in state.
    fn establish(&self, account: AccountResponse) -> Result<Identity> {
        let identity = Identity {
            uid: account.local_id,
            email: account.email,
            display_name: account.display_name,
            photo_url: account.photo_url,
        };
        let (id_token, refresh_token) = match (account.id_token, account.refresh_token) {
            (Some(id), Some(refresh)) => (id, refresh),
            _ => return Err(AppError::Auth("provider returned no tokens".to_string())),
        };

        *self.session.lock().unwrap() = Some(AuthSession {
            identity: identity.clone(),
            id_token,
            refresh_token,
        });
        self.state_tx
            .send_replace(AuthState::SignedIn(identity.clone()));

        tracing::info!(uid = %identity.uid, "Signed in");
        Ok(identity)
    }
}

#[async_trait]
impl AuthProvider for FirebaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        let account = self
            .call(
                "signInWithPassword",
                serde_json::json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;
        self.establish(account)
    }

    async fn register(&self, email: &str, password: &str) -> Result<Identity> {
        let account = self
            .call(
                "signUp",
                serde_json::json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;
        self.establish(account)
    }

    async fn sign_in_with_id_token(&self, provider_id: &str, id_token: &str) -> Result<Identity> {
        let account = self
            .call(
                "signInWithIdp",
                serde_json::json!({
                    "postBody": format!("id_token={}&providerId={}", id_token, provider_id),
                    "requestUri": "http://localhost",
                    "returnSecureToken": true,
                    "returnIdpCredential": true,
                }),
            )
            .await?;
        self.establish(account)
    }

    async fn sign_out(&self) -> Result<()> {
        let had_session = self.session.lock().unwrap().take().is_some();
        self.state_tx.send_replace(AuthState::SignedOut);
        if had_session {
            tracing::info!("Signed out");
        }
        Ok(())
    }

    async fn update_display(
        &self,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<Identity> {
        let id_token = {
            let session = self.session.lock().unwrap();
            session
                .as_ref()
                .map(|s| s.id_token.clone())
                .ok_or_else(|| AppError::Auth("not signed in".to_string()))?
        };

        let mut body = serde_json::json!({
            "idToken": id_token,
            "returnSecureToken": false,
        });
        if let Some(name) = display_name {
            body["displayName"] = name.into();
        }
        if let Some(url) = photo_url {
            body["photoUrl"] = url.into();
        }

        let account = self.call("update", body).await?;

        // accounts:update does not rotate tokens; only refresh the
        // display metadata on the existing session.
        let identity = {
            let mut session = self.session.lock().unwrap();
            let session = session
                .as_mut()
                .ok_or_else(|| AppError::Auth("not signed in".to_string()))?;
            if account.display_name.is_some() {
                session.identity.display_name = account.display_name;
            }
            if account.photo_url.is_some() {
                session.identity.photo_url = account.photo_url;
            }
            session.identity.clone()
        };
        self.state_tx
            .send_replace(AuthState::SignedIn(identity.clone()));
        Ok(identity)
    }

    fn auth_state(&self) -> watch::Receiver<AuthState> {
        self.state_tx.subscribe()
    }
}

/// Account payload shared by the Identity Toolkit responses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initial_state_is_signed_out() {
        let auth = FirebaseAuth::new("key");
        assert_eq!(*auth.auth_state().borrow(), AuthState::SignedOut);
    }

    #[tokio::test]
    async fn test_sign_out_without_session_is_ok() {
        let auth = FirebaseAuth::new("key");
        auth.sign_out().await.unwrap();
        assert_eq!(*auth.auth_state().borrow(), AuthState::SignedOut);
    }

    #[tokio::test]
    async fn test_update_display_requires_session() {
        let auth = FirebaseAuth::new("key");
        let err = auth.update_display(Some("Anna"), None).await.unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));
    }

    #[test]
    fn test_account_response_shape() {
        let json = serde_json::json!({
            "localId": "u1",
            "email": "anna@example.com",
            "displayName": "Anna",
            "idToken": "tok",
            "refreshToken": "refresh",
            "expiresIn": "3600",
        });
        let account: AccountResponse = serde_json::from_value(json).unwrap();
        assert_eq!(account.local_id, "u1");
        assert_eq!(account.display_name.as_deref(), Some("Anna"));
        assert!(account.photo_url.is_none());
    }
}
