//! Free-text search and list filtering over contacts and prayers.
//!
//! All matching is a case-insensitive substring test. Search history lives
//! in `RecentSearches`, persisted under its own key.

mod recent;

pub use recent::RecentSearches;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Contact, Prayer, Relationship};

/// Number of recent searches kept by default.
pub const DEFAULT_MAX_RECENT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchResultKind {
    Contact,
    Prayer,
}

/// One row of the combined search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub kind: SearchResultKind,
    pub id: String,
    pub title: String,
    pub subtitle: String,
    /// The record's `updated_at`
    pub date: DateTime<Utc>,
}

/// Search contacts and prayers, newest first. A blank query finds nothing.
pub fn search(contacts: &[Contact], prayers: &[Prayer], query: &str) -> Vec<SearchResult> {
    let Some(needle) = normalize(query) else {
        return Vec::new();
    };

    let mut results: Vec<SearchResult> = contacts
        .iter()
        .filter(|c| c.searchable_text().to_lowercase().contains(&needle))
        .map(|c| SearchResult {
            kind: SearchResultKind::Contact,
            id: c.id.clone(),
            title: c.name.clone(),
            subtitle: contact_subtitle(c),
            date: c.updated_at,
        })
        .collect();

    results.extend(
        prayers
            .iter()
            .filter(|p| p.searchable_text().to_lowercase().contains(&needle))
            .map(|p| SearchResult {
                kind: SearchResultKind::Prayer,
                id: p.id.clone(),
                title: p.title.clone(),
                subtitle: prayer_subtitle(p, contacts),
                date: p.updated_at,
            }),
    );

    results.sort_by(|a, b| b.date.cmp(&a.date));
    results
}

/// Which prayers a prayer list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrayerFilter {
    #[default]
    All,
    Unanswered,
    Answered,
}

impl PrayerFilter {
    pub fn matches(&self, prayer: &Prayer) -> bool {
        match self {
            PrayerFilter::All => true,
            PrayerFilter::Unanswered => !prayer.is_answered,
            PrayerFilter::Answered => prayer.is_answered,
        }
    }
}

/// Prayers passing `filter` whose title or description contains `query`.
/// A blank query matches every prayer.
pub fn filter_prayers<'a>(prayers: &'a [Prayer], filter: PrayerFilter, query: &str) -> Vec<&'a Prayer> {
    let needle = normalize(query);
    prayers
        .iter()
        .filter(|p| filter.matches(p))
        .filter(|p| match &needle {
            Some(needle) => p.searchable_text().to_lowercase().contains(needle.as_str()),
            None => true,
        })
        .collect()
}

/// Contacts with the given relationship (any when `None`) whose name contains `query`.
pub fn filter_contacts<'a>(
    contacts: &'a [Contact],
    relationship: Option<Relationship>,
    query: &str,
) -> Vec<&'a Contact> {
    let needle = normalize(query);
    contacts
        .iter()
        .filter(|c| relationship.is_none() || c.relationship == relationship)
        .filter(|c| match &needle {
            Some(needle) => c.name.to_lowercase().contains(needle.as_str()),
            None => true,
        })
        .collect()
}

fn normalize(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

fn contact_subtitle(contact: &Contact) -> String {
    if let Some(relationship) = contact.relationship {
        return relationship.to_string();
    }
    match &contact.email {
        Some(email) if !email.is_empty() => email.clone(),
        _ => "Contact".to_string(),
    }
}

fn prayer_subtitle(prayer: &Prayer, contacts: &[Contact]) -> String {
    let names: Vec<&str> = contacts
        .iter()
        .filter(|c| prayer.references(&c.id))
        .map(|c| c.name.as_str())
        .collect();

    if names.is_empty() {
        "Prayer".to_string()
    } else {
        format!("For {}", names.join(", "))
    }
}
