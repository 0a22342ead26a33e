//! News feed entry, read-only for this client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the `news` collection, maintained outside this system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Optional image URL; empty when the entry has no image
    #[serde(default)]
    pub image: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}
