//! Identity of the authenticated user, as issued by the identity provider.

use serde::{Deserialize, Serialize};

/// The authenticated user's opaque id plus display metadata.
///
/// Exists only while the user is signed in; it has no lifecycle of its own
/// in this system (the identity provider owns the account).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque user id, also the profile document id
    pub uid: String,
    /// Email address (may be absent for federated accounts)
    pub email: Option<String>,
    /// Display name
    pub display_name: Option<String>,
    /// Profile picture URL
    pub photo_url: Option<String>,
}

impl Identity {
    /// Identity with only a uid, no display metadata.
    pub fn bare(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            display_name: None,
            photo_url: None,
        }
    }
}
