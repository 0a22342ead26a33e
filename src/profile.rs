// SPDX-License-Identifier: MIT

//! Profile synchronization: the live-updating per-user profile document.
//!
//! The store keys everything off an identity id: `ensure` lazily creates
//! the default document on first login, `subscribe` opens a live snapshot
//! stream that feeds both the exposed state and the local cache, and
//! `mutate` merges partial updates into the backing document.
//!
//! The backing document is the source of truth. There is no optimistic
//! local merge: after a mutation, the exposed state changes only when the
//! live subscription echoes the write back, so the UI always renders the
//! last value confirmed by the backend.

use crate::cache::{self, LocalCache};
use crate::db::DocumentStore;
use crate::error::{AppError, Result};
use crate::models::{NewsItem, Profile, ProfilePatch, Theme};
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::AbortHandle;

/// Live-synchronized profile store.
pub struct ProfileStore {
    docs: Arc<dyn DocumentStore>,
    cache: LocalCache,
    latest: watch::Sender<Option<Profile>>,
    /// The one active subscription, if any. Replaced (and its task stopped)
    /// whenever a new identity subscribes; overlapping subscriptions across
    /// an identity switch are the hazard this guards against.
    active: Mutex<Option<ActiveWatch>>,
    /// Per-identity locks serializing `ensure`, so two rapid first logins
    /// cannot both write the default document.
    create_locks: DashMap<String, Arc<Mutex<()>>>,
}

struct ActiveWatch {
    uid: String,
    abort: AbortHandle,
}

/// Disposer for one live subscription.
///
/// Dropping it (or calling [`ProfileSubscription::dispose`]) stops snapshot
/// delivery and detaches the backend listener. Must be invoked when the
/// identity changes or the observing component goes away; the store also
/// stops the previous subscription itself when a new identity subscribes.
pub struct ProfileSubscription {
    uid: String,
    abort: AbortHandle,
}

impl ProfileSubscription {
    /// Identity id this subscription is keyed to.
    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn dispose(self) {
        // Drop does the work.
    }
}

impl Drop for ProfileSubscription {
    fn drop(&mut self) {
        self.abort.abort();
    }
}

impl ProfileStore {
    /// Store over `docs`, pre-seeding the exposed state from `cache`.
    ///
    /// The cached snapshot may be stale or belong to a previously signed-in
    /// account; it only bridges the gap until the first live snapshot.
    pub fn new(docs: Arc<dyn DocumentStore>, cache: LocalCache) -> Self {
        let seeded: Option<Profile> = cache.read(cache::PROFILE_KEY);
        if seeded.is_some() {
            tracing::debug!("Pre-seeded profile state from local cache");
        }
        let (latest, _) = watch::channel(seeded);
        Self {
            docs,
            cache,
            latest,
            active: Mutex::new(None),
            create_locks: DashMap::new(),
        }
    }

    /// Subscribe to the latest confirmed profile snapshot.
    pub fn latest(&self) -> watch::Receiver<Option<Profile>> {
        self.latest.subscribe()
    }

    /// Latest confirmed profile snapshot, if any.
    pub fn current(&self) -> Option<Profile> {
        self.latest.borrow().clone()
    }

    /// Presentation theme from the latest snapshot (light when unknown).
    pub fn theme(&self) -> Theme {
        self.latest
            .borrow()
            .as_ref()
            .map(Profile::theme)
            .unwrap_or_default()
    }

    /// Read the profile for `uid`, creating the default document if absent.
    ///
    /// Concurrent calls for the same uid are serialized by a per-uid lock,
    /// and the underlying create is conditional, so at most one default
    /// document is ever written even across racing clients.
    pub async fn ensure(&self, uid: &str) -> Result<Profile> {
        let lock = self
            .create_locks
            .entry(uid.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        if let Some(profile) = self.docs.get_profile(uid).await? {
            return Ok(profile);
        }

        let profile = Profile::new(Utc::now());
        if self.docs.create_profile(uid, &profile).await? {
            tracing::info!(uid, "Created default profile");
            return Ok(profile);
        }

        // Another client created it between our read and write; theirs wins.
        self.docs
            .get_profile(uid)
            .await?
            .ok_or_else(|| AppError::Database(format!("profile not found after create: {uid}")))
    }

    /// Merge `patch` into the profile for `uid`, stamping `updatedAt`.
    ///
    /// An empty `uid` is a logged no-op, not an error (callers must guard).
    /// Failures propagate; there is no automatic retry, and the exposed
    /// state is not updated until the subscription echoes the write back.
    pub async fn mutate(&self, uid: &str, patch: ProfilePatch) -> Result<()> {
        if uid.is_empty() {
            tracing::warn!("mutate called without an identity id, ignoring");
            return Ok(());
        }
        if patch.is_empty() {
            return Ok(());
        }
        self.docs.merge_profile(uid, &patch, Utc::now()).await
    }

    /// Open the live subscription for `uid`.
    ///
    /// Ensures the document exists first, then streams snapshots into the
    /// exposed state and the local cache until the returned subscription is
    /// disposed. Any previously active subscription is stopped before the
    /// new stream is established, so no snapshot for an old identity can be
    /// delivered after the new identity's subscription begins.
    pub async fn subscribe(&self, uid: &str) -> Result<ProfileSubscription> {
        {
            let mut active = self.active.lock().await;
            if let Some(prev) = active.take() {
                tracing::debug!(old = %prev.uid, new = uid, "Stopping previous profile subscription");
                prev.abort.abort();
            }
        }

        self.ensure(uid).await?;
        let mut stream = self.docs.watch_profile(uid).await?;

        let latest = self.latest.clone();
        let cache = self.cache.clone();
        let watched_uid = uid.to_string();
        let task = tokio::spawn(async move {
            while let Some(profile) = stream.recv().await {
                cache.write(cache::PROFILE_KEY, &profile);
                let _ = latest.send(Some(profile));
            }
            tracing::debug!(uid = %watched_uid, "Profile snapshot stream ended");
        });
        let abort = task.abort_handle();

        *self.active.lock().await = Some(ActiveWatch {
            uid: uid.to_string(),
            abort: abort.clone(),
        });

        Ok(ProfileSubscription {
            uid: uid.to_string(),
            abort,
        })
    }

    /// List the news feed, newest first. Read-only passthrough.
    pub async fn news(&self) -> Result<Vec<NewsItem>> {
        self.docs.list_news().await
    }
}
