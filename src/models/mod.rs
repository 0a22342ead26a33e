// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod identity;
pub mod news;
pub mod profile;

pub use identity::Identity;
pub use news::NewsItem;
pub use profile::{Language, Profile, ProfilePatch, Theme};
