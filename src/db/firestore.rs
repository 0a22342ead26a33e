// SPDX-License-Identifier: MIT

//! Firestore-backed document store.
//!
//! Wraps the `firestore` crate with the typed operations the core needs:
//! profile get / conditional create / masked merge / live listen, plus the
//! ordered news query.

use crate::db::{collections, DocumentStore, ProfileWatch};
use crate::error::{AppError, Result};
use crate::models::{NewsItem, Profile, ProfilePatch};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use firestore::{
    FirestoreListenEvent, FirestoreListenerTarget, FirestoreQueryDirection,
    FirestoreTempFilesListenStateStorage,
};

const WATCH_BUFFER: usize = 16;
const PROFILE_LISTEN_TARGET: u32 = 1;

/// Firestore [`DocumentStore`] implementation.
#[derive(Clone)]
pub struct FirestoreStore {
    client: firestore::FirestoreDb,
}

impl FirestoreStore {
    /// Connect to Firestore for the given project.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::connect_emulator(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Connect to the Firestore emulator with unauthenticated access.
    async fn connect_emulator(project_id: &str) -> Result<Self> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // ExternalJwtFunctionSource provides a dummy token without needing a
        // custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn get_profile(&self, uid: &str) -> Result<Option<Profile>> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::PROFILES)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn create_profile(&self, uid: &str, profile: &Profile) -> Result<bool> {
        // `insert` is Firestore's conditional create: it fails when the
        // document already exists, which closes the first-login race
        // between near-simultaneous clients.
        let result: std::result::Result<(), _> = self
            .client
            .fluent()
            .insert()
            .into(collections::PROFILES)
            .document_id(uid)
            .object(profile)
            .execute()
            .await;

        match result {
            Ok(()) => Ok(true),
            Err(firestore::errors::FirestoreError::DataConflictError(_)) => {
                tracing::debug!(uid, "Profile already exists, create skipped");
                Ok(false)
            }
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    async fn merge_profile(
        &self,
        uid: &str,
        patch: &ProfilePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        // Read the current document, apply the patch locally, then write
        // back with a field mask. The mask limits the write to the patched
        // fields plus updatedAt, so concurrent writes to other fields are
        // not clobbered.
        let mut profile = self
            .get_profile(uid)
            .await?
            .ok_or_else(|| AppError::Database(format!("profile not found: {uid}")))?;
        patch.apply_to(&mut profile);
        profile.updated_at = updated_at;

        let mut fields: Vec<String> = patch
            .field_paths()
            .into_iter()
            .map(str::to_string)
            .collect();
        fields.push("updatedAt".to_string());

        let _: () = self
            .client
            .fluent()
            .update()
            .fields(fields)
            .in_col(collections::PROFILES)
            .document_id(uid)
            .object(&profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn watch_profile(&self, uid: &str) -> Result<ProfileWatch> {
        let mut listener = self
            .client
            .create_listener(FirestoreTempFilesListenStateStorage::new())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.client
            .fluent()
            .select()
            .by_id_in(collections::PROFILES)
            .batch_listen([uid.to_string()])
            .add_target(
                FirestoreListenerTarget::new(PROFILE_LISTEN_TARGET),
                &mut listener,
            )
            .map_err(|e| AppError::Database(e.to_string()))?;

        let (tx, mut stop_rx, watch) = ProfileWatch::channel(WATCH_BUFFER);
        let watched_uid = uid.to_string();

        listener
            .start(move |event| {
                let tx = tx.clone();
                let watched_uid = watched_uid.clone();
                async move {
                    if let FirestoreListenEvent::DocumentChange(ref change) = event {
                        if let Some(doc) = &change.document {
                            match firestore::FirestoreDb::deserialize_doc_to::<Profile>(doc) {
                                Ok(profile) => {
                                    // Receiver gone means the subscription was
                                    // disposed; the shutdown task handles it.
                                    let _ = tx.send(profile).await;
                                }
                                Err(err) => {
                                    tracing::warn!(
                                        uid = %watched_uid,
                                        error = %err,
                                        "Undecodable profile snapshot, skipping"
                                    );
                                }
                            }
                        }
                    }
                    Ok(())
                }
            })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Hold the listener until the watch handle is dropped, then detach.
        tokio::spawn(async move {
            let _ = (&mut stop_rx).await;
            if let Err(err) = listener.shutdown().await {
                tracing::debug!(error = %err, "Profile listener shutdown failed");
            }
        });

        Ok(watch)
    }

    async fn list_news(&self) -> Result<Vec<NewsItem>> {
        self.client
            .fluent()
            .select()
            .from(collections::NEWS)
            .order_by([("createdAt", FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
