//! Persisted key layout.

/// Prefix of the on-device data written by earlier app versions.
pub const DEFAULT_KEY_PREFIX: &str = "@prayer_app_";

/// The full set of keys under one prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub contacts: String,
    pub prayers: String,
    pub viewed_prayers: String,
    pub viewed_date: String,
    pub recent_searches: String,
}

impl StorageKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            contacts: format!("{}contacts", prefix),
            prayers: format!("{}prayers", prefix),
            viewed_prayers: format!("{}viewed_prayers", prefix),
            viewed_date: format!("{}viewed_date", prefix),
            recent_searches: format!("{}recent_searches", prefix),
        }
    }

    /// Keys holding user data; `clear_all_data` removes exactly these.
    pub fn data_keys(&self) -> Vec<String> {
        vec![
            self.contacts.clone(),
            self.prayers.clone(),
            self.viewed_prayers.clone(),
            self.viewed_date.clone(),
        ]
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keys_match_device_layout() {
        let keys = StorageKeys::default();
        assert_eq!(keys.contacts, "@prayer_app_contacts");
        assert_eq!(keys.prayers, "@prayer_app_prayers");
        assert_eq!(keys.viewed_prayers, "@prayer_app_viewed_prayers");
        assert_eq!(keys.viewed_date, "@prayer_app_viewed_date");
        assert_eq!(keys.recent_searches, "@prayer_app_recent_searches");
    }

    #[test]
    fn test_data_keys_exclude_recent_searches() {
        let keys = StorageKeys::with_prefix("t_");
        let data = keys.data_keys();
        assert_eq!(data.len(), 4);
        assert!(!data.contains(&keys.recent_searches));
    }
}
