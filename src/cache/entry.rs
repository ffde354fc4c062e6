use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Link;

/// Snapshot of the resolution-relevant fields of a link.
///
/// Disposable: never written back to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedLinkEntry {
    pub id: String,
    pub code: String,
    pub target_url: String,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&Link> for CachedLinkEntry {
    fn from(link: &Link) -> Self {
        Self {
            id: link.id.clone(),
            code: link.code.clone(),
            target_url: link.target_url.clone(),
            is_active: link.is_active,
            expires_at: link.expires_at,
        }
    }
}
