//! `LinkStore` implementation for SeaOrmStorage

use async_trait::async_trait;

use super::SeaOrmStorage;
use crate::errors::{Result, ShortgateError};
use crate::storage::models::{Link, LinkPatch, NewLink, Page, Visit, VisitContext};
use crate::storage::traits::LinkStore;

#[async_trait]
impl LinkStore for SeaOrmStorage {
    fn backend_name(&self) -> &str {
        &self.backend_name
    }

    async fn insert_link(&self, new_link: NewLink) -> Result<Link> {
        self.create(new_link).await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>> {
        self.get_by_code(code).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Link>> {
        self.get_by_id(id).await
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Link>> {
        self.load_owned(owner_id).await
    }

    async fn list_page(&self, page: u64, page_size: u64) -> Result<Page<Link>> {
        self.load_paginated(page, page_size).await
    }

    async fn update_link(&self, id: &str, patch: LinkPatch) -> Result<Link> {
        self.patch(id, patch).await
    }

    async fn delete_link(&self, id: &str) -> Result<u64> {
        self.remove(id).await
    }

    async fn insert_visit(&self, link_id: &str, context: &VisitContext) -> Result<Visit> {
        self.append_visit(link_id, context).await
    }

    async fn increment_clicks(&self, link_id: &str) -> Result<()> {
        self.bump_clicks(link_id).await
    }

    async fn recent_visits(&self, link_id: &str, limit: u64) -> Result<Vec<Visit>> {
        self.load_recent_visits(link_id, limit).await
    }

    async fn close(&self) -> Result<()> {
        self.db.clone().close().await.map_err(|e| {
            ShortgateError::database_connection(format!("Failed to close database: {}", e))
        })
    }
}
