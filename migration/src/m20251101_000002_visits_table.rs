//! 访问记录表迁移
//!
//! visits 表只追加不修改；link_id 外键保证删除链接前必须先清理访问记录。

use sea_orm_migration::prelude::*;

use crate::m20251101_000001_links_table::Links;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Visits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Visits::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Visits::LinkId).string_len(36).not_null())
                    .col(ColumnDef::new(Visits::IpAddress).text().not_null())
                    .col(ColumnDef::new(Visits::UserAgent).text().null())
                    .col(ColumnDef::new(Visits::Referrer).text().null())
                    .col(
                        ColumnDef::new(Visits::VisitedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_visits_link_id")
                            .from(Visits::Table, Visits::LinkId)
                            .to(Links::Table, Links::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 单链接时间序列查询（统计窗口）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_visits_link_time")
                    .table(Visits::Table)
                    .col(Visits::LinkId)
                    .col(Visits::VisitedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_visits_link_time").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Visits::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Visits {
    #[sea_orm(iden = "visits")]
    Table,
    Id,
    LinkId,
    IpAddress,
    UserAgent,
    Referrer,
    VisitedAt,
}
