// SPDX-License-Identifier: MIT

//! Per-user profile document and its merge patch.
//!
//! Field names on the wire match the documents the original client wrote
//! (`photoURL`, `darkMode`, `createdAt`, `updatedAt`), so existing data
//! stays readable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile language. Danish is currently the only supported value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "da")]
    Da,
}

/// Presentation theme, derived from the profile's `dark_mode` flag.
///
/// Passed down explicitly from the latest snapshot; there is no global
/// theme toggle anywhere in this crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Per-user settings/contact document, one per identity id.
///
/// The backing document is the source of truth; in-memory and cached copies
/// are eventually consistent with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default, rename = "photoURL")]
    pub photo_url: String,
    #[serde(default, rename = "darkMode")]
    pub dark_mode: bool,
    /// Set once at creation
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Stamped on every mutation
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Default profile written on first-ever login for an identity.
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            name: String::new(),
            address: String::new(),
            phone: String::new(),
            language: Language::default(),
            photo_url: String::new(),
            dark_mode: false,
            created_at,
            updated_at: created_at,
        }
    }

    /// Whether name, address and phone are all filled in.
    ///
    /// The booking flow uses this to decide between the one-time contact
    /// setup step and the actual booking form.
    pub fn is_contact_complete(&self) -> bool {
        !self.name.is_empty() && !self.address.is_empty() && !self.phone.is_empty()
    }

    pub fn theme(&self) -> Theme {
        if self.dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

/// Partial profile update with merge semantics: only the fields that are
/// `Some` are written, everything else is left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(rename = "darkMode", skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<bool>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.phone.is_none()
            && self.language.is_none()
            && self.photo_url.is_none()
            && self.dark_mode.is_none()
    }

    /// Merge this patch into `profile`, leaving absent fields untouched.
    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(name) = &self.name {
            profile.name = name.clone();
        }
        if let Some(address) = &self.address {
            profile.address = address.clone();
        }
        if let Some(phone) = &self.phone {
            profile.phone = phone.clone();
        }
        if let Some(language) = self.language {
            profile.language = language;
        }
        if let Some(photo_url) = &self.photo_url {
            profile.photo_url = photo_url.clone();
        }
        if let Some(dark_mode) = self.dark_mode {
            profile.dark_mode = dark_mode;
        }
    }

    /// Wire names of the fields present in this patch, for masked updates.
    pub fn field_paths(&self) -> Vec<&'static str> {
        let mut paths = Vec::new();
        if self.name.is_some() {
            paths.push("name");
        }
        if self.address.is_some() {
            paths.push("address");
        }
        if self.phone.is_some() {
            paths.push("phone");
        }
        if self.language.is_some() {
            paths.push("language");
        }
        if self.photo_url.is_some() {
            paths.push("photoURL");
        }
        if self.dark_mode.is_some() {
            paths.push("darkMode");
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_fields() {
        let now = Utc::now();
        let profile = Profile::new(now);

        assert_eq!(profile.name, "");
        assert_eq!(profile.address, "");
        assert_eq!(profile.phone, "");
        assert_eq!(profile.language, Language::Da);
        assert_eq!(profile.photo_url, "");
        assert!(!profile.dark_mode);
        assert_eq!(profile.created_at, now);
        assert_eq!(profile.updated_at, now);
        assert!(!profile.is_contact_complete());
        assert_eq!(profile.theme(), Theme::Light);
    }

    #[test]
    fn test_patch_merges_only_present_fields() {
        let mut profile = Profile::new(Utc::now());
        profile.name = "Anna".to_string();
        profile.phone = "12345678".to_string();

        let patch = ProfilePatch {
            address: Some("Nørregade 1".to_string()),
            dark_mode: Some(true),
            ..Default::default()
        };
        patch.apply_to(&mut profile);

        assert_eq!(profile.name, "Anna");
        assert_eq!(profile.phone, "12345678");
        assert_eq!(profile.address, "Nørregade 1");
        assert!(profile.dark_mode);
        assert_eq!(profile.theme(), Theme::Dark);
    }

    #[test]
    fn test_patch_field_paths_use_wire_names() {
        let patch = ProfilePatch {
            photo_url: Some("https://example.com/p.jpg".to_string()),
            dark_mode: Some(false),
            ..Default::default()
        };
        assert_eq!(patch.field_paths(), vec!["photoURL", "darkMode"]);
        assert!(!patch.is_empty());
        assert!(ProfilePatch::default().is_empty());
    }

    #[test]
    fn test_profile_wire_format() {
        let profile = Profile::new(Utc::now());
        let json = serde_json::to_value(&profile).unwrap();

        // Wire names must stay compatible with documents written by the
        // original client.
        assert!(json.get("photoURL").is_some());
        assert!(json.get("darkMode").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["language"], "da");
    }
}
