//! Keyed record stores.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::media::MediaId;

/// A media URL observed directly on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRequestRecord {
    pub url: String,
    pub timestamp: DateTime<Utc>,
}

impl RawRequestRecord {
    /// Create a record stamped with the current time.
    pub fn now(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timestamp: Utc::now(),
        }
    }
}

/// One record per media id, plus the most recently accepted record overall.
#[derive(Debug, Clone)]
pub struct MediaStore<T> {
    by_media_id: HashMap<MediaId, T>,
    last_seen: Option<T>,
}

impl<T> Default for MediaStore<T> {
    fn default() -> Self {
        Self {
            by_media_id: HashMap::new(),
            last_seen: None,
        }
    }
}

impl<T: Clone> MediaStore<T> {
    /// Look up the record for a media id.
    pub fn get(&self, id: &MediaId) -> Option<&T> {
        self.by_media_id.get(id)
    }

    /// The most recently accepted record, whatever its id.
    pub fn last_seen(&self) -> Option<&T> {
        self.last_seen.as_ref()
    }

    /// Store a record under its id, replacing any previous one.
    pub fn insert(&mut self, id: MediaId, record: T) {
        self.by_media_id.insert(id, record);
    }

    /// Replace the fallback slot.
    pub fn set_last_seen(&mut self, record: T) {
        self.last_seen = Some(record);
    }

    /// Number of media ids with a record.
    pub fn len(&self) -> usize {
        self.by_media_id.len()
    }

    /// True when neither a keyed record nor a fallback is stored.
    pub fn is_empty(&self) -> bool {
        self.by_media_id.is_empty() && self.last_seen.is_none()
    }
}
