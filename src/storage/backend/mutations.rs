//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, ExprTrait, QueryFilter,
    TransactionTrait,
};
use tracing::{debug, info};

use super::converters::{
    link_model_to_link, new_link_to_active_model, visit_to_active_model,
};
use super::SeaOrmStorage;
use super::retry::{self, to_store_error};
use crate::errors::{Result, ShortgateError};
use crate::storage::models::{Link, LinkPatch, NewLink, Visit, VisitContext};

use migration::entities::{link, visit};

impl SeaOrmStorage {
    /// 插入新链接；code 冲突由唯一索引拒绝
    pub async fn create(&self, new_link: NewLink) -> Result<Link> {
        let db = &self.db;
        let now = Utc::now();
        let id = uuid::Uuid::new_v4().to_string();
        let active_model = new_link_to_active_model(&new_link, &id, now);

        retry::run(
            self.retry_policy,
            &format!("insert link '{}'", new_link.code),
            || async { link::Entity::insert(active_model.clone()).exec(db).await },
        )
        .await?;

        info!("Link created: {} ({})", new_link.code, id);

        Ok(Link {
            id,
            code: new_link.code,
            target_url: new_link.target_url,
            owner_id: new_link.owner_id,
            is_active: true,
            expires_at: new_link.expires_at,
            clicks: 0,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn patch(&self, id: &str, patch: LinkPatch) -> Result<Link> {
        let db = &self.db;

        let existing = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| ShortgateError::not_found(format!("Link {} not found", id)))?;

        let mut active_model = link::ActiveModel {
            id: Set(existing.id.clone()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(is_active) = patch.is_active {
            active_model.is_active = Set(is_active);
        }
        if let Some(expires_at) = patch.expires_at {
            active_model.expires_at = Set(Some(expires_at));
        }

        let model = retry::run(self.retry_policy, &format!("update link {}", id), || async {
            active_model.clone().update(db).await
        })
        .await?;

        info!("Link updated: {}", model.code);
        Ok(link_model_to_link(model))
    }

    /// 先删除访问记录，再删除链接（同一事务内）
    pub async fn remove(&self, id: &str) -> Result<u64> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| to_store_error("begin delete transaction", e))?;

        let visits = visit::Entity::delete_many()
            .filter(visit::Column::LinkId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| to_store_error(&format!("delete visits of link {}", id), e))?;

        let result = link::Entity::delete_by_id(id.to_string())
            .exec(&txn)
            .await
            .map_err(|e| to_store_error(&format!("delete link {}", id), e))?;

        if result.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| to_store_error("roll back delete", e))?;
            return Err(ShortgateError::not_found(format!("Link {} not found", id)));
        }

        txn.commit()
            .await
            .map_err(|e| to_store_error("commit delete", e))?;

        info!(
            "Link deleted: {} ({} visits removed)",
            id, visits.rows_affected
        );
        Ok(visits.rows_affected)
    }

    pub async fn append_visit(&self, link_id: &str, context: &VisitContext) -> Result<Visit> {
        let db = &self.db;
        let visited_at = Utc::now();
        let active_model = visit_to_active_model(link_id, context, visited_at);

        let result = retry::run(
            self.retry_policy,
            &format!("record visit of link {}", link_id),
            || async { visit::Entity::insert(active_model.clone()).exec(db).await },
        )
        .await?;

        debug!("Visit recorded for link {}", link_id);

        Ok(Visit {
            id: result.last_insert_id,
            link_id: link_id.to_string(),
            ip_address: context.ip_address.clone(),
            user_agent: context.user_agent.clone(),
            referrer: context.referrer.clone(),
            visited_at,
        })
    }

    /// 原子自增：UPDATE links SET clicks = clicks + 1 WHERE id = ?
    pub async fn bump_clicks(&self, link_id: &str) -> Result<()> {
        let db = &self.db;

        let result = retry::run(
            self.retry_policy,
            &format!("increment clicks of link {}", link_id),
            || async {
                link::Entity::update_many()
                    .col_expr(
                        link::Column::Clicks,
                        Expr::col(link::Column::Clicks).add(Expr::val(1i64)),
                    )
                    .filter(link::Column::Id.eq(link_id))
                    .exec(db)
                    .await
            },
        )
        .await?;

        if result.rows_affected == 0 {
            return Err(ShortgateError::not_found(format!(
                "Link {} not found",
                link_id
            )));
        }
        Ok(())
    }
}
