// SPDX-License-Identifier: MIT

//! Cleanbook core: session and profile synchronization for the cleaning
//! booking client.
//!
//! This crate is the stateful core a UI embeds: it tracks the signed-in
//! identity, keeps a live-updating profile document in sync (with a
//! best-effort local cache for instant cold-start rendering), and submits
//! bookings to the external webhook. Screens, routing and rendering live
//! in the embedding application.

pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod profile;
pub mod services;
pub mod session;

use auth::{AuthProvider, FirebaseAuth};
use cache::LocalCache;
use config::Config;
use db::FirestoreStore;
use error::Result;
use profile::ProfileStore;
use services::BookingClient;
use session::SessionTracker;
use std::sync::Arc;

/// Composition root: every component wired by explicit injection.
///
/// There are no ambient singletons; tests construct [`SessionTracker`] and
/// [`ProfileStore`] directly against in-memory backends instead.
pub struct AppCore {
    pub config: Config,
    pub auth: Arc<FirebaseAuth>,
    pub session: SessionTracker,
    pub profiles: Arc<ProfileStore>,
    pub booking: BookingClient,
}

impl AppCore {
    /// Wire the production stack: Firebase auth, Firestore documents, a
    /// file-backed cache and the booking webhook client.
    pub async fn new(config: Config) -> Result<Self> {
        let docs = Arc::new(FirestoreStore::new(&config.firebase_project_id).await?);
        let cache = LocalCache::new(&config.cache_dir);
        let auth = Arc::new(FirebaseAuth::new(config.firebase_api_key.clone()));
        let session = SessionTracker::new(auth.auth_state());
        let profiles = Arc::new(ProfileStore::new(docs, cache));
        let booking = BookingClient::new(config.booking_webhook_url.clone());

        Ok(Self {
            config,
            auth,
            session,
            profiles,
            booking,
        })
    }
}
