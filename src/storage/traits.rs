use async_trait::async_trait;

use crate::errors::Result;
use crate::storage::models::{Link, LinkPatch, NewLink, Page, Visit, VisitContext};

/// Durable source of truth for links and their visits.
///
/// Implementations must enforce code uniqueness themselves: a duplicate
/// `code` on [`LinkStore::insert_link`] fails with
/// [`ShortgateError::Conflict`](crate::errors::ShortgateError::Conflict),
/// whatever the caller checked beforehand. Click increments must be atomic
/// at the storage layer.
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Backend name for logs ("sqlite", "mysql", "postgres", ...)
    fn backend_name(&self) -> &str;

    async fn insert_link(&self, link: NewLink) -> Result<Link>;

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Link>>;

    /// All links of one owner, newest first
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Link>>;

    /// All links, newest first, one page at a time (page is 1-based)
    async fn list_page(&self, page: u64, page_size: u64) -> Result<Page<Link>>;

    /// Apply the non-empty fields of `patch`; NotFound if the link is gone
    async fn update_link(&self, id: &str, patch: LinkPatch) -> Result<Link>;

    /// Delete every visit of the link, then the link. Returns the number of visits removed.
    async fn delete_link(&self, id: &str) -> Result<u64>;

    async fn insert_visit(&self, link_id: &str, context: &VisitContext) -> Result<Visit>;

    /// `clicks = clicks + 1`, executed as a single statement
    async fn increment_clicks(&self, link_id: &str) -> Result<()>;

    /// Newest `limit` visits of a link
    async fn recent_visits(&self, link_id: &str, limit: u64) -> Result<Vec<Visit>>;

    /// Release the underlying connections
    async fn close(&self) -> Result<()>;
}
