// SPDX-License-Identifier: MIT

use cleanbook_core::cache::LocalCache;
use cleanbook_core::db::{FirestoreStore, MemoryStore};
use cleanbook_core::profile::ProfileStore;
use std::sync::Arc;

/// Check if the Firestore emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Connect to the Firestore emulator.
#[allow(dead_code)]
pub async fn emulator_store() -> FirestoreStore {
    FirestoreStore::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Profile store over a fresh in-memory backend, cache disabled.
#[allow(dead_code)]
pub fn memory_profile_store() -> (Arc<ProfileStore>, MemoryStore) {
    let docs = MemoryStore::new();
    let store = Arc::new(ProfileStore::new(
        Arc::new(docs.clone()),
        LocalCache::disabled(),
    ));
    (store, docs)
}

/// Generate a unique identity id for test isolation.
#[allow(dead_code)]
pub fn unique_uid(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}-{nanos}")
}
