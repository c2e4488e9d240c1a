use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A code → target mapping with a fixed validity window.
///
/// Records are append-only: nothing in the crate mutates one after
/// `LinkStore::put`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub code: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl LinkRecord {
    /// A record resolves while `now < expires_at`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// One successful resolution of a live code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub code: String,
    pub timestamp: DateTime<Utc>,
    /// Empty means direct / unknown
    #[serde(default)]
    pub referrer: String,
    pub approx_location: String,
}

impl ClickEvent {
    pub fn is_direct(&self) -> bool {
        self.referrer.is_empty()
    }
}
