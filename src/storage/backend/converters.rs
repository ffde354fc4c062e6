use chrono::{DateTime, Utc};

use crate::storage::models::{Link, NewLink, Visit, VisitContext};
use migration::entities::{link, visit};

/// 将 Sea-ORM Model 转换为 Link
pub fn link_model_to_link(model: link::Model) -> Link {
    Link {
        id: model.id,
        code: model.code,
        target_url: model.target_url,
        owner_id: model.owner_id,
        is_active: model.is_active,
        expires_at: model.expires_at,
        clicks: model.clicks.max(0),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// 新链接转换为 ActiveModel：id 和时间戳在这里分配，计数从 0 开始
pub fn new_link_to_active_model(
    new_link: &NewLink,
    id: &str,
    now: DateTime<Utc>,
) -> link::ActiveModel {
    use sea_orm::ActiveValue::Set;

    link::ActiveModel {
        id: Set(id.to_string()),
        code: Set(new_link.code.clone()),
        target_url: Set(new_link.target_url.clone()),
        owner_id: Set(new_link.owner_id.clone()),
        is_active: Set(true),
        expires_at: Set(new_link.expires_at),
        clicks: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

pub fn visit_model_to_visit(model: visit::Model) -> Visit {
    Visit {
        id: model.id,
        link_id: model.link_id,
        ip_address: model.ip_address,
        user_agent: model.user_agent,
        referrer: model.referrer,
        visited_at: model.visited_at,
    }
}

/// 访问记录 ActiveModel（id 由数据库自增）
pub fn visit_to_active_model(
    link_id: &str,
    context: &VisitContext,
    visited_at: DateTime<Utc>,
) -> visit::ActiveModel {
    use sea_orm::ActiveValue::Set;

    visit::ActiveModel {
        link_id: Set(link_id.to_string()),
        ip_address: Set(context.ip_address.clone()),
        user_agent: Set(context.user_agent.clone()),
        referrer: Set(context.referrer.clone()),
        visited_at: Set(visited_at),
        ..Default::default()
    }
}
