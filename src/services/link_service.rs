//! Link management service
//!
//! The only entry point external callers use. Consults the cache before
//! the store on resolve, asks the lifecycle policy before acting, and runs
//! visit accounting on every successful resolve.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::{CacheResult, CachedLinkEntry, LinkCache};
use crate::config::LinksConfig;
use crate::errors::{Result, ShortgateError};
use crate::services::identity::Caller;
use crate::services::lifecycle::{ensure_owner_or_admin, ensure_usable};
use crate::services::visit_accountant::VisitAccountant;
use crate::storage::{Link, LinkPatch, LinkStore, NewLink, Page, Visit, VisitContext};
use crate::utils::url_validator::validate_target_url;
use crate::utils::{CUSTOM_CODE_MAX_LEN, CUSTOM_CODE_MIN_LEN, generate_random_code, is_valid_custom_code};

/// 管理员分页上限
pub const MAX_PAGE_SIZE: u64 = 100;

// ============ Request/Response DTOs ============

/// Request to create a new link
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateLinkRequest {
    pub target_url: String,
    /// Caller-chosen code; generated when absent
    pub custom_code: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Usage report for one link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkStatsReport {
    pub link: Link,
    pub total_clicks: i64,
    pub last_visit: Option<DateTime<Utc>>,
    /// Visits in the window per UTC day, keyed `YYYY-MM-DD`
    pub visits_by_date: BTreeMap<String, u64>,
    /// Newest visits first
    pub recent_visits: Vec<Visit>,
}

impl LinkStatsReport {
    fn build(link: Link, recent_visits: Vec<Visit>) -> Self {
        let mut visits_by_date = BTreeMap::new();
        for visit in &recent_visits {
            *visits_by_date
                .entry(visit.visited_at.format("%Y-%m-%d").to_string())
                .or_insert(0u64) += 1;
        }

        Self {
            total_clicks: link.clicks,
            last_visit: recent_visits.iter().map(|v| v.visited_at).max(),
            visits_by_date,
            recent_visits,
            link,
        }
    }
}

// ============ Service ============

pub struct LinkService {
    store: Arc<dyn LinkStore>,
    cache: Arc<dyn LinkCache>,
    accountant: VisitAccountant,
    settings: LinksConfig,
}

impl LinkService {
    pub fn new(store: Arc<dyn LinkStore>, cache: Arc<dyn LinkCache>, settings: LinksConfig) -> Self {
        Self {
            accountant: VisitAccountant::new(store.clone()),
            store,
            cache,
            settings,
        }
    }

    pub fn settings(&self) -> &LinksConfig {
        &self.settings
    }

    /// Create a link owned by `caller`. Does not touch the cache.
    pub async fn create_link(&self, caller: &Caller, req: CreateLinkRequest) -> Result<Link> {
        let target_url = req.target_url.trim();
        validate_target_url(target_url)
            .map_err(|e| ShortgateError::validation(format!("Invalid target URL: {}", e)))?;

        let link = match req.custom_code {
            Some(code) => {
                self.create_with_custom_code(caller, code, target_url, req.expires_at)
                    .await?
            }
            None => {
                self.create_with_generated_code(caller, target_url, req.expires_at)
                    .await?
            }
        };

        info!(
            "LinkService: created link '{}' -> {} for owner {}",
            link.code, link.target_url, link.owner_id
        );
        Ok(link)
    }

    async fn create_with_custom_code(
        &self,
        caller: &Caller,
        code: String,
        target_url: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Link> {
        if !is_valid_custom_code(&code) {
            return Err(ShortgateError::validation(format!(
                "Custom code '{}' must be {}-{} characters of letters, digits, '_' or '-'",
                code, CUSTOM_CODE_MIN_LEN, CUSTOM_CODE_MAX_LEN
            )));
        }

        if self.store.find_by_code(&code).await?.is_some() {
            return Err(ShortgateError::conflict(format!(
                "Short code '{}' is already in use",
                code
            )));
        }

        // 并发创建时由存储层唯一索引兜底
        self.store
            .insert_link(NewLink {
                code: code.clone(),
                target_url: target_url.to_string(),
                owner_id: caller.id.clone(),
                expires_at,
            })
            .await
            .map_err(|e| match e {
                ShortgateError::Conflict(_) => {
                    ShortgateError::conflict(format!("Short code '{}' is already in use", code))
                }
                other => other,
            })
    }

    async fn create_with_generated_code(
        &self,
        caller: &Caller,
        target_url: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Link> {
        let attempts = self.settings.max_generation_attempts.max(1);
        let length = self.settings.code_length.max(1);

        for attempt in 1..=attempts {
            let code = generate_random_code(length);
            let new_link = NewLink {
                code: code.clone(),
                target_url: target_url.to_string(),
                owner_id: caller.id.clone(),
                expires_at,
            };

            match self.store.insert_link(new_link).await {
                Ok(link) => return Ok(link),
                Err(ShortgateError::Conflict(_)) => {
                    debug!(
                        "Generated code '{}' collided (attempt {}/{})",
                        code, attempt, attempts
                    );
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            "LinkService: no free code of length {} after {} attempts",
            length, attempts
        );
        Err(ShortgateError::resource_exhausted(format!(
            "Could not generate a unique short code after {} attempts",
            attempts
        )))
    }

    /// Resolve `code` to its target URL and account the visit
    pub async fn resolve(&self, code: &str, context: &VisitContext) -> Result<String> {
        let entry = match self.cache.get(code).await {
            CacheResult::Found(entry) => {
                debug!("Resolve '{}' served from cache", code);
                entry
            }
            CacheResult::Miss => {
                let link = self.store.find_by_code(code).await?.ok_or_else(|| {
                    ShortgateError::not_found(format!("Short code '{}' not found", code))
                })?;
                let entry = CachedLinkEntry::from(&link);
                self.cache.insert(code, entry.clone()).await;
                entry
            }
        };

        ensure_usable(&entry, Utc::now())?;

        let outcome = self.accountant.record(&entry.id, context).await;
        if !outcome.is_complete() {
            warn!(
                "LinkService: partial accounting for '{}' (visit: {}, click: {})",
                code, outcome.visit_recorded, outcome.click_counted
            );
        }

        Ok(entry.target_url)
    }

    /// All links of `owner_id`, newest first
    pub async fn list_owned_links(&self, owner_id: &str) -> Result<Vec<Link>> {
        self.store.list_by_owner(owner_id).await
    }

    pub async fn get_link_stats(&self, link_id: &str, caller: &Caller) -> Result<LinkStatsReport> {
        let link = self.load_link(link_id).await?;
        ensure_owner_or_admin(&link, caller)?;

        let visits = self
            .store
            .recent_visits(&link.id, self.settings.stats_window)
            .await?;

        Ok(LinkStatsReport::build(link, visits))
    }

    /// Change `is_active` and/or `expires_at`; code, target and owner are immutable.
    /// An empty patch only refreshes `updated_at`.
    pub async fn update_link(
        &self,
        link_id: &str,
        caller: &Caller,
        patch: LinkPatch,
    ) -> Result<Link> {
        let link = self.load_link(link_id).await?;
        ensure_owner_or_admin(&link, caller)?;

        if patch.is_empty() {
            debug!("Empty update for link {}; only updated_at changes", link.id);
        }

        let updated = self.store.update_link(&link.id, patch).await?;
        self.invalidate_if_configured(&updated.code).await;

        info!(
            "LinkService: updated link '{}' (active: {}, expires_at: {:?})",
            updated.code, updated.is_active, updated.expires_at
        );
        Ok(updated)
    }

    /// Delete a link and its visits. Returns the number of visits removed.
    pub async fn delete_link(&self, link_id: &str, caller: &Caller) -> Result<u64> {
        let link = self.load_link(link_id).await?;
        ensure_owner_or_admin(&link, caller)?;

        let removed = self.store.delete_link(&link.id).await?;
        self.invalidate_if_configured(&link.code).await;

        info!(
            "LinkService: deleted link '{}' and {} visits",
            link.code, removed
        );
        Ok(removed)
    }

    /// Every link in the system, newest first. Admin only.
    pub async fn list_all_links(
        &self,
        caller: &Caller,
        page: u64,
        page_size: u64,
    ) -> Result<Page<Link>> {
        if !caller.is_admin() {
            return Err(ShortgateError::forbidden(
                "Listing all links requires the ADMIN role",
            ));
        }

        self.store
            .list_page(page.max(1), page_size.clamp(1, MAX_PAGE_SIZE))
            .await
    }

    async fn load_link(&self, link_id: &str) -> Result<Link> {
        self.store
            .find_by_id(link_id)
            .await?
            .ok_or_else(|| ShortgateError::not_found(format!("Link {} not found", link_id)))
    }

    async fn invalidate_if_configured(&self, code: &str) {
        if self.settings.invalidate_cache_on_write {
            self.cache.remove(code).await;
            debug!("Cache entry for '{}' invalidated", code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn link() -> Link {
        let now = Utc::now();
        Link {
            id: "id-1".to_string(),
            code: "abc123".to_string(),
            target_url: "https://example.com/a".to_string(),
            owner_id: "owner".to_string(),
            is_active: true,
            expires_at: None,
            clicks: 3,
            created_at: now,
            updated_at: now,
        }
    }

    fn visit(id: i64, visited_at: DateTime<Utc>) -> Visit {
        Visit {
            id,
            link_id: "id-1".to_string(),
            ip_address: "127.0.0.1".to_string(),
            user_agent: None,
            referrer: None,
            visited_at,
        }
    }

    #[test]
    fn test_stats_report_histogram_by_utc_day() {
        let visits = vec![
            visit(3, Utc.with_ymd_and_hms(2025, 3, 2, 23, 59, 0).unwrap()),
            visit(2, Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 1).unwrap()),
            visit(1, Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()),
        ];

        let report = LinkStatsReport::build(link(), visits);

        assert_eq!(report.total_clicks, 3);
        assert_eq!(
            report.last_visit,
            Some(Utc.with_ymd_and_hms(2025, 3, 2, 23, 59, 0).unwrap())
        );
        assert_eq!(report.visits_by_date.get("2025-03-02"), Some(&2));
        assert_eq!(report.visits_by_date.get("2025-03-01"), Some(&1));
        assert_eq!(report.recent_visits.len(), 3);
    }

    #[test]
    fn test_stats_report_without_visits() {
        let report = LinkStatsReport::build(link(), vec![]);
        assert!(report.last_visit.is_none());
        assert!(report.visits_by_date.is_empty());
    }
}
