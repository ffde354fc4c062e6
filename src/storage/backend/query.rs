//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use tracing::{debug, error};

use super::converters::{link_model_to_link, visit_model_to_visit};
use super::{SeaOrmStorage, retry};
use crate::errors::Result;
use crate::storage::models::{Link, Page, Visit};

use migration::entities::{link, visit};

impl SeaOrmStorage {
    pub async fn get_by_code(&self, code: &str) -> Result<Option<Link>> {
        let db = &self.db;

        let model = retry::run(self.retry_policy, &format!("load link '{}'", code), || async {
            link::Entity::find()
                .filter(link::Column::Code.eq(code))
                .one(db)
                .await
        })
        .await
        .inspect_err(|e| error!("Link lookup by code failed: {}", e))?;

        Ok(model.map(link_model_to_link))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Link>> {
        let db = &self.db;
        let id_owned = id.to_string();

        let model = retry::run(self.retry_policy, &format!("load link {}", id), || async {
            link::Entity::find_by_id(&id_owned).one(db).await
        })
        .await?;

        Ok(model.map(link_model_to_link))
    }

    pub async fn load_owned(&self, owner_id: &str) -> Result<Vec<Link>> {
        let db = &self.db;
        let models = retry::run(
            self.retry_policy,
            &format!("list links of owner '{}'", owner_id),
            || async {
                link::Entity::find()
                    .filter(link::Column::OwnerId.eq(owner_id))
                    .order_by_desc(link::Column::CreatedAt)
                    .all(db)
                    .await
            },
        )
        .await?;

        debug!("Loaded {} links for owner {}", models.len(), owner_id);
        Ok(models.into_iter().map(link_model_to_link).collect())
    }

    /// 分页加载全部链接（按创建时间倒序）
    pub async fn load_paginated(&self, page: u64, page_size: u64) -> Result<Page<Link>> {
        let page = page.max(1);
        let page_size = page_size.max(1);

        let db = &self.db;

        let total = retry::run(self.retry_policy, "count links", || async {
            link::Entity::find().count(db).await
        })
        .await?;

        let models = retry::run(self.retry_policy, &format!("list links page {}", page), || async {
            link::Entity::find()
                .order_by_desc(link::Column::CreatedAt)
                .offset((page - 1) * page_size)
                .limit(page_size)
                .all(db)
                .await
        })
        .await?;

        let items = models.into_iter().map(link_model_to_link).collect();
        Ok(Page::new(items, total, page, page_size))
    }

    /// 最近的 N 条访问记录（新的在前）
    pub async fn load_recent_visits(&self, link_id: &str, limit: u64) -> Result<Vec<Visit>> {
        let db = &self.db;

        let models = retry::run(
            self.retry_policy,
            &format!("load visits of link {}", link_id),
            || async {
                visit::Entity::find()
                    .filter(visit::Column::LinkId.eq(link_id))
                    .order_by_desc(visit::Column::VisitedAt)
                    .order_by_desc(visit::Column::Id)
                    .limit(limit)
                    .all(db)
                    .await
            },
        )
        .await?;

        Ok(models.into_iter().map(visit_model_to_visit).collect())
    }
}
