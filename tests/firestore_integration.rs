// SPDX-License-Identifier: MIT

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (set FIRESTORE_EMULATOR_HOST). The emulator provides a clean state
//! for each test run.

use chrono::Utc;
use cleanbook_core::db::DocumentStore;
use cleanbook_core::models::{Profile, ProfilePatch};
use std::time::Duration;
use tokio::time::timeout;

mod common;
use common::{emulator_store, unique_uid};

const SNAPSHOT_WAIT: Duration = Duration::from_secs(10);

#[tokio::test]
async fn test_profile_create_is_conditional() {
    require_emulator!();

    let store = emulator_store().await;
    let uid = unique_uid("it");

    assert!(store.get_profile(&uid).await.unwrap().is_none());

    let profile = Profile::new(Utc::now());
    assert!(store.create_profile(&uid, &profile).await.unwrap());
    // Second create must lose, not overwrite
    assert!(!store.create_profile(&uid, &profile).await.unwrap());

    let stored = store.get_profile(&uid).await.unwrap().unwrap();
    assert_eq!(stored.language, cleanbook_core::models::Language::Da);
    assert!(!stored.dark_mode);
}

#[tokio::test]
async fn test_merge_only_touches_patched_fields() {
    require_emulator!();

    let store = emulator_store().await;
    let uid = unique_uid("it");
    store
        .create_profile(&uid, &Profile::new(Utc::now()))
        .await
        .unwrap();

    let m1 = ProfilePatch {
        name: Some("Anna".to_string()),
        ..Default::default()
    };
    store.merge_profile(&uid, &m1, Utc::now()).await.unwrap();

    let m2 = ProfilePatch {
        dark_mode: Some(true),
        ..Default::default()
    };
    store.merge_profile(&uid, &m2, Utc::now()).await.unwrap();

    let stored = store.get_profile(&uid).await.unwrap().unwrap();
    assert_eq!(stored.name, "Anna");
    assert!(stored.dark_mode);
    assert!(stored.updated_at > stored.created_at);
}

#[tokio::test]
async fn test_watch_delivers_initial_and_merged_snapshots() {
    require_emulator!();

    let store = emulator_store().await;
    let uid = unique_uid("it");
    store
        .create_profile(&uid, &Profile::new(Utc::now()))
        .await
        .unwrap();

    let mut watch = store.watch_profile(&uid).await.unwrap();
    let initial = timeout(SNAPSHOT_WAIT, watch.recv())
        .await
        .expect("no initial snapshot")
        .unwrap();
    assert_eq!(initial.name, "");

    let patch = ProfilePatch {
        name: Some("Anna".to_string()),
        ..Default::default()
    };
    store.merge_profile(&uid, &patch, Utc::now()).await.unwrap();

    let echoed = timeout(SNAPSHOT_WAIT, watch.recv())
        .await
        .expect("no echoed snapshot")
        .unwrap();
    assert_eq!(echoed.name, "Anna");

    // Dropping the handle detaches the listener
    drop(watch);
}
