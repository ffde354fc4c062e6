//! Link commands

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::errors::Result;
use crate::interfaces::cli::print_json;
use crate::services::{Caller, CreateLinkRequest, LinkService};
use crate::storage::{Link, LinkPatch, VisitContext};

/// A link together with its public short URL
#[derive(Serialize)]
struct LinkView<'a> {
    #[serde(flatten)]
    link: &'a Link,
    short_url: String,
}

impl<'a> LinkView<'a> {
    fn new(link: &'a Link, base_url: &str) -> Self {
        Self {
            short_url: link.short_url(base_url),
            link,
        }
    }
}

pub async fn create(
    service: &LinkService,
    caller: &Caller,
    target_url: String,
    custom_code: Option<String>,
    expires_at: Option<DateTime<Utc>>,
) -> Result<()> {
    let link = service
        .create_link(
            caller,
            CreateLinkRequest {
                target_url,
                custom_code,
                expires_at,
            },
        )
        .await?;

    let view = LinkView::new(&link, &service.settings().base_url);
    eprintln!("{} {}", "Created".green().bold(), view.short_url.cyan());
    print_json(&view)
}

pub async fn resolve(
    service: &LinkService,
    code: String,
    ip: String,
    user_agent: Option<String>,
    referrer: Option<String>,
) -> Result<()> {
    let context = VisitContext {
        ip_address: ip,
        user_agent,
        referrer,
    };
    let target_url = service.resolve(&code, &context).await?;

    print_json(&serde_json::json!({
        "code": code,
        "target_url": target_url,
    }))
}

pub async fn list(service: &LinkService, owner_id: &str) -> Result<()> {
    let links = service.list_owned_links(owner_id).await?;
    let base_url = &service.settings().base_url;

    eprintln!(
        "{} {} links owned by {}",
        "ℹ".bold().blue(),
        links.len().to_string().green(),
        owner_id.cyan()
    );
    let views: Vec<LinkView<'_>> = links.iter().map(|l| LinkView::new(l, base_url)).collect();
    print_json(&views)
}

pub async fn list_all(
    service: &LinkService,
    caller: &Caller,
    page: u64,
    page_size: u64,
) -> Result<()> {
    let page = service.list_all_links(caller, page, page_size).await?;
    eprintln!(
        "{} page {}/{} ({} links total)",
        "ℹ".bold().blue(),
        page.page,
        page.pages.max(1),
        page.total
    );
    print_json(&page)
}

pub async fn stats(service: &LinkService, caller: &Caller, link_id: &str) -> Result<()> {
    let report = service.get_link_stats(link_id, caller).await?;
    print_json(&report)
}

pub async fn update(
    service: &LinkService,
    caller: &Caller,
    link_id: &str,
    is_active: Option<bool>,
    expires_at: Option<DateTime<Utc>>,
) -> Result<()> {
    let link = service
        .update_link(
            link_id,
            caller,
            LinkPatch {
                is_active,
                expires_at,
            },
        )
        .await?;

    eprintln!("{} {}", "Updated".green().bold(), link.code.cyan());
    print_json(&LinkView::new(&link, &service.settings().base_url))
}

pub async fn delete(service: &LinkService, caller: &Caller, link_id: &str) -> Result<()> {
    let visits_removed = service.delete_link(link_id, caller).await?;

    eprintln!("{} {}", "Deleted".green().bold(), link_id.cyan());
    print_json(&serde_json::json!({
        "id": link_id,
        "visits_removed": visits_removed,
    }))
}
