// SPDX-License-Identifier: MIT

//! Best-effort local key/value cache.
//!
//! Persists the last-seen profile snapshot so the UI can render instantly on
//! cold start, before the live subscription delivers fresh data. Anything
//! read from here may be stale or wrong and is always overwritten by the
//! first live snapshot. Failures are swallowed: this layer never returns an
//! error to its caller.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Cache key for the single profile snapshot slot.
///
/// Deliberately not partitioned per user: switching accounts can transiently
/// surface the previous account's snapshot until the fresh subscription
/// delivers (documented behavior of the original client).
pub const PROFILE_KEY: &str = "profile";

/// Directory-backed JSON key/value store.
#[derive(Debug, Clone)]
pub struct LocalCache {
    /// None means storage is unavailable; reads return nothing, writes no-op.
    dir: Option<PathBuf>,
}

impl LocalCache {
    /// Cache rooted at `dir`. The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Cache with storage unavailable. All reads miss, all writes no-op.
    pub fn disabled() -> Self {
        Self { dir: None }
    }

    /// Read and deserialize the value under `key`.
    ///
    /// Returns `None` on any failure (missing key, unreadable storage,
    /// undecodable content); the caller falls back to its default.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key)?;
        let bytes = std::fs::read(&path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::debug!(key, error = %err, "Discarding undecodable cache entry");
                None
            }
        }
    }

    /// Serialize and persist `value` under `key`. Failures are swallowed.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) {
        let Some(path) = self.path_for(key) else {
            return;
        };
        let result = serde_json::to_vec(value)
            .map_err(std::io::Error::other)
            .and_then(|bytes| {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&path, bytes)
            });
        if let Err(err) = result {
            tracing::debug!(key, error = %err, "Cache write failed, ignoring");
        }
    }

    fn path_for(&self, key: &str) -> Option<PathBuf> {
        let dir = self.dir.as_deref()?;
        // Keys are internal constants; sanitize anyway so a weird key cannot
        // escape the cache directory.
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        Some(Path::new(dir).join(format!("{safe}.json")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Profile;
    use chrono::Utc;

    #[test]
    fn test_write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());

        let mut profile = Profile::new(Utc::now());
        profile.name = "Anna".to_string();
        cache.write(PROFILE_KEY, &profile);

        let back: Option<Profile> = cache.read(PROFILE_KEY);
        assert_eq!(back, Some(profile));
    }

    #[test]
    fn test_missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());

        let back: Option<Profile> = cache.read(PROFILE_KEY);
        assert!(back.is_none());
    }

    #[test]
    fn test_disabled_storage_never_errors() {
        let cache = LocalCache::disabled();

        let profile = Profile::new(Utc::now());
        // Must be a silent no-op
        cache.write(PROFILE_KEY, &profile);

        let back: Option<Profile> = cache.read(PROFILE_KEY);
        assert!(back.is_none());
    }

    #[test]
    fn test_corrupt_entry_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());

        std::fs::write(dir.path().join("profile.json"), b"{not json").unwrap();

        let back: Option<Profile> = cache.read(PROFILE_KEY);
        assert!(back.is_none());
    }

    #[test]
    fn test_keys_cannot_escape_cache_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());

        cache.write("../escape", &42u32);
        assert!(!dir.path().parent().unwrap().join("escape.json").exists());
        let back: Option<u32> = cache.read("../escape");
        assert_eq!(back, Some(42));
    }
}
