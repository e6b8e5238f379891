//! Domain types for Prayerbook
//!
//! This module contains the two persisted record types and their inputs:
//! - Contact: a person prayers are made for, with an optional Relationship
//! - Prayer: a prayer request linked to zero or more contacts
//! - NewContact / NewPrayer: creation inputs (id and timestamps assigned by the store)
//! - ContactPatch / PrayerPatch: partial updates merged into an existing record

pub mod contact;
pub mod prayer;
pub mod timestamp;

pub use contact::{Contact, ContactPatch, NewContact, Relationship};
pub use prayer::{NewPrayer, Prayer, PrayerPatch};
