//! Tab session registry.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::media::VariantDescriptor;
use crate::session::store::{MediaStore, RawRequestRecord};

/// Identifier of a browser tab.
///
/// The browser reports `-1` for traffic that belongs to no tab, so only
/// non-negative values convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(u32);

impl TabId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for TabId {
    type Error = Error;

    fn try_from(raw: i64) -> Result<Self> {
        u32::try_from(raw)
            .map(Self)
            .map_err(|_| Error::MissingTabContext)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything observed for one tab.
#[derive(Debug, Default)]
pub struct TabSession {
    /// Media URLs requested directly by the page.
    pub requests: MediaStore<RawRequestRecord>,
    /// Renditions found in API responses.
    pub variants: MediaStore<VariantDescriptor>,
}

impl TabSession {
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty() && self.variants.is_empty()
    }
}

/// Owns every live tab session.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<TabId, TabSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the session for a tab, creating an empty one if needed.
    pub fn get_or_create(&mut self, tab: TabId) -> &mut TabSession {
        self.sessions.entry(tab).or_default()
    }

    /// Get the session for a tab without creating it.
    pub fn get(&self, tab: TabId) -> Option<&TabSession> {
        self.sessions.get(&tab)
    }

    /// Drop all state for a tab. Removing an unknown tab is a no-op.
    pub fn remove(&mut self, tab: TabId) -> bool {
        self.sessions.remove(&tab).is_some()
    }

    /// Number of tabs with tracked state.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
