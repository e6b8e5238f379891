//! Contact record and related types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp::iso_millis;

/// A person the user prays for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Unique identifier, assigned at creation and never changed
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<Relationship>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,

    /// Refreshed on every mutation
    #[serde(with = "iso_millis")]
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// Build a contact from creation input, stamping both timestamps with `now`.
    pub fn from_new(input: NewContact, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            relationship: input.relationship,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Text used by free-text search: name, email, phone, relationship, notes.
    pub fn searchable_text(&self) -> String {
        let relationship = self.relationship.map(|r| r.as_str().to_string());
        [
            Some(self.name.clone()),
            self.email.clone(),
            self.phone.clone(),
            relationship,
            self.notes.clone(),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// How the user knows a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relationship {
    Friend,
    Family,
    Church,
    Colleague,
    Other,
}

impl Relationship {
    pub const ALL: [Relationship; 5] = [
        Relationship::Friend,
        Relationship::Family,
        Relationship::Church,
        Relationship::Colleague,
        Relationship::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::Friend => "Friend",
            Relationship::Family => "Family",
            Relationship::Church => "Church",
            Relationship::Colleague => "Colleague",
            Relationship::Other => "Other",
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relationship {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Relationship::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown relationship: {}", s))
    }
}

/// Input for `RecordStore::add_contact`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub relationship: Option<Relationship>,
    pub notes: Option<String>,
}

impl NewContact {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationship = Some(relationship);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Partial update for a contact.
///
/// `None` leaves a field untouched. For optional fields `Some(None)` clears
/// the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub relationship: Option<Option<Relationship>>,
    pub notes: Option<Option<String>>,
}

impl ContactPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: Option<String>) -> Self {
        self.email = Some(email);
        self
    }

    pub fn phone(mut self, phone: Option<String>) -> Self {
        self.phone = Some(phone);
        self
    }

    pub fn relationship(mut self, relationship: Option<Relationship>) -> Self {
        self.relationship = Some(relationship);
        self
    }

    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = Some(notes);
        self
    }

    /// Merge into `contact`. Timestamps are the caller's concern.
    pub fn apply(self, contact: &mut Contact) {
        if let Some(name) = self.name {
            contact.name = name;
        }
        if let Some(email) = self.email {
            contact.email = email;
        }
        if let Some(phone) = self.phone {
            contact.phone = phone;
        }
        if let Some(relationship) = self.relationship {
            contact.relationship = relationship;
        }
        if let Some(notes) = self.notes {
            contact.notes = notes;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(now: DateTime<Utc>) -> Contact {
        Contact::from_new(
            NewContact::new("Alice")
                .with_relationship(Relationship::Friend)
                .with_email("alice@example.com"),
            "c1".to_string(),
            now,
        )
    }

    #[test]
    fn test_from_new_sets_equal_timestamps() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        let contact = sample(now);
        assert_eq!(contact.id, "c1");
        assert_eq!(contact.created_at, contact.updated_at);
        assert_eq!(contact.relationship, Some(Relationship::Friend));
    }

    #[test]
    fn test_serializes_camel_case_without_absent_fields() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        let value = serde_json::to_value(sample(now)).unwrap();
        assert_eq!(value["createdAt"], "2026-10-19T08:00:00.000Z");
        assert_eq!(value["relationship"], "Friend");
        assert!(value.get("phone").is_none());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn test_deserializes_stored_contact_with_unknown_fields() {
        let json = r#"{
            "id": "1729000000000",
            "name": "Bob",
            "relationship": "Church",
            "favorite": true,
            "createdAt": "2024-10-15T13:46:40.000Z",
            "updatedAt": "2024-10-16T13:46:40.000Z"
        }"#;
        let contact: Contact = serde_json::from_str(json).unwrap();
        assert_eq!(contact.name, "Bob");
        assert_eq!(contact.relationship, Some(Relationship::Church));
        assert!(contact.email.is_none());
        assert!(contact.updated_at > contact.created_at);
    }

    #[test]
    fn test_patch_sets_and_clears() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        let mut contact = sample(now);
        ContactPatch::default()
            .name("Alicia")
            .email(None)
            .phone(Some("555-0100".to_string()))
            .apply(&mut contact);

        assert_eq!(contact.name, "Alicia");
        assert_eq!(contact.email, None);
        assert_eq!(contact.phone.as_deref(), Some("555-0100"));
        assert_eq!(contact.relationship, Some(Relationship::Friend));
    }

    #[test]
    fn test_relationship_from_str() {
        assert_eq!("family".parse::<Relationship>().unwrap(), Relationship::Family);
        assert_eq!(" Colleague ".parse::<Relationship>().unwrap(), Relationship::Colleague);
        assert!("neighbor".parse::<Relationship>().is_err());
    }

    #[test]
    fn test_searchable_text() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        let contact = sample(now);
        assert_eq!(contact.searchable_text(), "Alice alice@example.com Friend");
    }
}
