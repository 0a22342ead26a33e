// SPDX-License-Identifier: MIT

//! In-process document store.
//!
//! A fully functional stand-in for Firestore: profiles live in a map and
//! every watcher gets snapshots through a per-document broadcast channel,
//! in write order. Used by the test suite and for offline development.
//! The offline toggle makes every operation fail the way a disconnected
//! backend would, for exercising error paths.

use crate::db::{DocumentStore, ProfileWatch};
use crate::error::{AppError, Result};
use crate::models::{NewsItem, Profile, ProfilePatch};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

const WATCH_BUFFER: usize = 16;

#[derive(Default)]
struct Inner {
    profiles: Mutex<HashMap<String, Profile>>,
    watchers: Mutex<HashMap<String, broadcast::Sender<Profile>>>,
    news: Mutex<Vec<NewsItem>>,
    offline: AtomicBool,
}

/// In-memory [`DocumentStore`] implementation.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a disconnected backend: every operation returns a database
    /// error until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    /// Seed a news entry (the feed is maintained outside this system).
    pub fn add_news(&self, item: NewsItem) {
        self.inner.news.lock().unwrap().push(item);
    }

    fn check_online(&self) -> Result<()> {
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(AppError::Database("store is offline".to_string()));
        }
        Ok(())
    }

    /// Fan a fresh snapshot out to all watchers of `uid`.
    fn notify(&self, uid: &str, profile: &Profile) {
        if let Some(tx) = self.inner.watchers.lock().unwrap().get(uid) {
            // No receivers is fine; they come and go with subscriptions.
            let _ = tx.send(profile.clone());
        }
    }

    fn watcher_for(&self, uid: &str) -> broadcast::Sender<Profile> {
        self.inner
            .watchers
            .lock()
            .unwrap()
            .entry(uid.to_string())
            .or_insert_with(|| broadcast::channel(WATCH_BUFFER).0)
            .clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_profile(&self, uid: &str) -> Result<Option<Profile>> {
        self.check_online()?;
        Ok(self.inner.profiles.lock().unwrap().get(uid).cloned())
    }

    async fn create_profile(&self, uid: &str, profile: &Profile) -> Result<bool> {
        self.check_online()?;
        {
            let mut profiles = self.inner.profiles.lock().unwrap();
            if profiles.contains_key(uid) {
                return Ok(false);
            }
            profiles.insert(uid.to_string(), profile.clone());
        }
        self.notify(uid, profile);
        Ok(true)
    }

    async fn merge_profile(
        &self,
        uid: &str,
        patch: &ProfilePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        self.check_online()?;
        let updated = {
            let mut profiles = self.inner.profiles.lock().unwrap();
            let profile = profiles
                .get_mut(uid)
                .ok_or_else(|| AppError::Database(format!("profile not found: {uid}")))?;
            patch.apply_to(profile);
            profile.updated_at = updated_at;
            profile.clone()
        };
        self.notify(uid, &updated);
        Ok(())
    }

    async fn watch_profile(&self, uid: &str) -> Result<ProfileWatch> {
        self.check_online()?;

        let mut events = self.watcher_for(uid).subscribe();
        let initial = self.inner.profiles.lock().unwrap().get(uid).cloned();

        let (tx, mut stop_rx, watch) = ProfileWatch::channel(WATCH_BUFFER);
        let uid = uid.to_string();
        tokio::spawn(async move {
            if let Some(profile) = initial {
                if tx.send(profile).await.is_err() {
                    return;
                }
            }
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    event = events.recv() => match event {
                        Ok(profile) => {
                            if tx.send(profile).await.is_err() {
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::debug!(uid = %uid, skipped, "Watcher lagged, skipping snapshots");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
        });

        Ok(watch)
    }

    async fn list_news(&self) -> Result<Vec<NewsItem>> {
        self.check_online()?;
        let mut items = self.inner.news.lock().unwrap().clone();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }
}
