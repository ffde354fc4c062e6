use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short link as stored in the link store.
///
/// `code`, `target_url` and `owner_id` never change after creation;
/// `is_active` and `expires_at` change through updates, `clicks` only
/// through visit accounting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub code: String,
    pub target_url: String,
    pub owner_id: String,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Public short URL for this link under `base_url`
    pub fn short_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.code)
    }
}

/// Input for inserting a new link; id, counters and timestamps are assigned by the store
#[derive(Debug, Clone)]
pub struct NewLink {
    pub code: String,
    pub target_url: String,
    pub owner_id: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial update: `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPatch {
    pub is_active: Option<bool>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl LinkPatch {
    pub fn is_empty(&self) -> bool {
        self.is_active.is_none() && self.expires_at.is_none()
    }
}

/// Client metadata captured by the transport for one resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitContext {
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

impl VisitContext {
    pub fn new(ip_address: impl Into<String>) -> Self {
        Self {
            ip_address: ip_address.into(),
            user_agent: None,
            referrer: None,
        }
    }
}

/// One recorded resolution. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub id: i64,
    pub link_id: String,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub visited_at: DateTime<Utc>,
}

/// 分页结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, page_size: u64) -> Self {
        let pages = if page_size == 0 {
            0
        } else {
            total.div_ceil(page_size)
        };
        Self {
            items,
            total,
            page,
            page_size,
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_link() -> Link {
        let now = Utc::now();
        Link {
            id: "id-1".to_string(),
            code: "abc123".to_string(),
            target_url: "https://example.com/a".to_string(),
            owner_id: "user-1".to_string(),
            is_active: true,
            expires_at: None,
            clicks: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_short_url_trims_trailing_slash() {
        let link = sample_link();
        assert_eq!(link.short_url("https://sho.rt/"), "https://sho.rt/abc123");
        assert_eq!(link.short_url("https://sho.rt"), "https://sho.rt/abc123");
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(LinkPatch::default().is_empty());
        assert!(
            !LinkPatch {
                is_active: Some(false),
                expires_at: None,
            }
            .is_empty()
        );
    }

    #[test]
    fn test_page_count() {
        let page: Page<u8> = Page::new(vec![], 0, 1, 20);
        assert_eq!(page.pages, 0);
        let page: Page<u8> = Page::new(vec![], 41, 1, 20);
        assert_eq!(page.pages, 3);
    }
}
