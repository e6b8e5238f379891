//! Prayer record and related types
//!
//! A prayer request is linked to one or more contacts by id. Answering a
//! prayer is recorded by `is_answered` plus the optional `date_answered`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp::{iso_millis, iso_millis_option};

/// A prayer request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prayer {
    /// Unique identifier, assigned at creation and never changed
    pub id: String,

    /// Contacts this prayer is for, in the order they were chosen
    #[serde(default)]
    pub contact_ids: Vec<String>,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub is_answered: bool,

    #[serde(with = "iso_millis")]
    pub date_requested: DateTime<Utc>,

    /// Set when the prayer becomes answered, cleared when it is reopened
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_millis_option")]
    pub date_answered: Option<DateTime<Utc>>,

    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "iso_millis")]
    pub updated_at: DateTime<Utc>,
}

impl Prayer {
    /// Build a prayer from creation input. `date_requested` defaults to `now`.
    pub fn from_new(input: NewPrayer, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            contact_ids: input.contact_ids,
            title: input.title,
            description: input.description,
            is_answered: input.is_answered,
            date_requested: input.date_requested.unwrap_or(now),
            date_answered: input.date_answered,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if this prayer is linked to `contact_id`
    pub fn references(&self, contact_id: &str) -> bool {
        self.contact_ids.iter().any(|id| id == contact_id)
    }

    /// Text used by free-text search: title and description.
    pub fn searchable_text(&self) -> String {
        match &self.description {
            Some(description) if !description.is_empty() => format!("{} {}", self.title, description),
            _ => self.title.clone(),
        }
    }
}

/// Input for `RecordStore::add_prayer`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPrayer {
    pub contact_ids: Vec<String>,
    pub title: String,
    pub description: Option<String>,
    pub is_answered: bool,
    /// Defaults to the creation time when `None`
    pub date_requested: Option<DateTime<Utc>>,
    pub date_answered: Option<DateTime<Utc>>,
}

impl NewPrayer {
    pub fn new(title: impl Into<String>, contact_ids: Vec<String>) -> Self {
        Self {
            title: title.into(),
            contact_ids,
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_date_requested(mut self, date_requested: DateTime<Utc>) -> Self {
        self.date_requested = Some(date_requested);
        self
    }

    /// Create the prayer already answered on `date_answered`.
    pub fn answered_on(mut self, date_answered: DateTime<Utc>) -> Self {
        self.is_answered = true;
        self.date_answered = Some(date_answered);
        self
    }
}

/// Partial update for a prayer.
///
/// `None` leaves a field untouched. For optional fields `Some(None)` clears
/// the value. Applying a patch never infers `date_answered` from
/// `is_answered`; see `RecordStore::set_prayer_answered` for that.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrayerPatch {
    pub contact_ids: Option<Vec<String>>,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub is_answered: Option<bool>,
    pub date_requested: Option<DateTime<Utc>>,
    pub date_answered: Option<Option<DateTime<Utc>>>,
}

impl PrayerPatch {
    pub fn contact_ids(mut self, contact_ids: Vec<String>) -> Self {
        self.contact_ids = Some(contact_ids);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn is_answered(mut self, is_answered: bool) -> Self {
        self.is_answered = Some(is_answered);
        self
    }

    pub fn date_requested(mut self, date_requested: DateTime<Utc>) -> Self {
        self.date_requested = Some(date_requested);
        self
    }

    pub fn date_answered(mut self, date_answered: Option<DateTime<Utc>>) -> Self {
        self.date_answered = Some(date_answered);
        self
    }

    /// Merge into `prayer`. Timestamps other than the patched ones are the
    /// caller's concern.
    pub fn apply(self, prayer: &mut Prayer) {
        if let Some(contact_ids) = self.contact_ids {
            prayer.contact_ids = contact_ids;
        }
        if let Some(title) = self.title {
            prayer.title = title;
        }
        if let Some(description) = self.description {
            prayer.description = description;
        }
        if let Some(is_answered) = self.is_answered {
            prayer.is_answered = is_answered;
        }
        if let Some(date_requested) = self.date_requested {
            prayer.date_requested = date_requested;
        }
        if let Some(date_answered) = self.date_answered {
            prayer.date_answered = date_answered;
        }
    }
}
