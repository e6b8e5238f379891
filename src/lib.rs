//! Prayerbook - local contact and prayer-request store
//!
//! Contacts and prayer requests live in memory and are mirrored, a whole
//! collection at a time, to a flat key-value backend. A daily tracker records
//! which prayers were shown in the prayer reel today so the reel can resume
//! at the first unseen prayer.

pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod id;
pub mod logging;
pub mod reel;
pub mod search;
pub mod storage;
pub mod store;
pub mod tracker;

pub use error::{PrayerbookError, Result};
