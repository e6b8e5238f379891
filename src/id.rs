//! ID generation utilities for Prayerbook
//!
//! Contacts and prayers live in separate id spaces, but both use random
//! UUID v4 strings so rapid successive creation can never collide.

use uuid::Uuid;

/// Generate a unique record ID
///
/// Format: hyphenated lowercase UUID v4
/// Example: `67e55044-10b1-426f-9247-bb680e5fe0c8`
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
