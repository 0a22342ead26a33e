// SPDX-License-Identifier: MIT

//! Services module - outbound integrations.

pub mod booking;

pub use booking::{BookingClient, BookingRequest};
