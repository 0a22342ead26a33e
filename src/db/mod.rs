//! Document store layer.
//!
//! [`DocumentStore`] is the seam between the synchronization core and the
//! hosted database. Production uses [`FirestoreStore`]; tests and offline
//! development use [`MemoryStore`].

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::models::{NewsItem, Profile, ProfilePatch};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};

/// Collection names as constants.
pub mod collections {
    pub const PROFILES: &str = "profiles";
    pub const NEWS: &str = "news";
}

/// Operations the synchronization core needs from the document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the profile document for `uid`, if it exists.
    async fn get_profile(&self, uid: &str) -> Result<Option<Profile>>;

    /// Create the profile document for `uid` if absent.
    ///
    /// Returns `false` when a document already existed (the conditional
    /// create lost a race to another client); nothing is overwritten in
    /// that case.
    async fn create_profile(&self, uid: &str, profile: &Profile) -> Result<bool>;

    /// Merge `patch` into the existing document, stamping `updatedAt`.
    ///
    /// Only the fields present in the patch are written. Fails if the
    /// document does not exist.
    async fn merge_profile(
        &self,
        uid: &str,
        patch: &ProfilePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Open a live snapshot stream on the profile document for `uid`.
    ///
    /// Delivers the current state first (if the document exists), then every
    /// subsequent remote change, in the backend's commit order.
    async fn watch_profile(&self, uid: &str) -> Result<ProfileWatch>;

    /// List the news feed, newest first.
    async fn list_news(&self) -> Result<Vec<NewsItem>>;
}

/// Live snapshot stream for one profile document.
///
/// Dropping the handle detaches the backend listener; there is no other way
/// to cancel it (no timeouts anywhere in this core).
pub struct ProfileWatch {
    rx: mpsc::Receiver<Profile>,
    // Dropped with self; the paired receiver completes and the backend task
    // shuts its listener down.
    _stop: oneshot::Sender<()>,
}

impl ProfileWatch {
    /// Channel-backed watch handle plus the backend's sending half and stop
    /// signal. Backends forward snapshots into `tx` until `stop` completes.
    pub fn channel(buffer: usize) -> (mpsc::Sender<Profile>, oneshot::Receiver<()>, ProfileWatch) {
        let (tx, rx) = mpsc::channel(buffer);
        let (stop_tx, stop_rx) = oneshot::channel();
        (tx, stop_rx, ProfileWatch { rx, _stop: stop_tx })
    }

    /// Next snapshot, or `None` once the stream has ended.
    pub async fn recv(&mut self) -> Option<Profile> {
        self.rx.recv().await
    }
}
