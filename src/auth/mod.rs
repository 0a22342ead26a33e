//! Identity provider layer.
//!
//! [`AuthProvider`] is the seam between the session core and the external
//! identity service. State changes are pushed over a `watch` channel so the
//! [`crate::session::SessionTracker`] can subscribe exactly once.

pub mod firebase;

pub use firebase::FirebaseAuth;

use crate::error::Result;
use crate::models::Identity;
use async_trait::async_trait;
use tokio::sync::watch;

/// Authentication state as observed from the identity provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AuthState {
    /// Not yet determined (the channel's seed value, before the provider's
    /// first notification)
    #[default]
    Unknown,
    SignedOut,
    SignedIn(Identity),
}

/// Operations the core needs from the external identity provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Authenticate with an email/password credential pair.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity>;

    /// Register a new account with an email/password credential pair.
    async fn register(&self, email: &str, password: &str) -> Result<Identity>;

    /// Authenticate with a federated credential (the popup-flow equivalent:
    /// the UI obtains `id_token` from the third-party provider and exchanges
    /// it here).
    async fn sign_in_with_id_token(&self, provider_id: &str, id_token: &str) -> Result<Identity>;

    /// Sign the current user out.
    async fn sign_out(&self) -> Result<()>;

    /// Update the signed-in user's display name and/or photo URL.
    async fn update_display(
        &self,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<Identity>;

    /// Subscribe to auth-state change notifications.
    fn auth_state(&self) -> watch::Receiver<AuthState>;
}
