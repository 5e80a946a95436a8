use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // No foreign key on user_id: deleting a user is guarded by an explicit
        // "has assigned notes" check instead.
        manager
            .create_table(
                Table::create()
                    .table(Notes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notes::UserId).integer().not_null())
                    .col(ColumnDef::new(Notes::Title).string().not_null())
                    .col(ColumnDef::new(Notes::TitleKey).string().not_null())
                    .col(ColumnDef::new(Notes::Text).string().not_null())
                    .col(ColumnDef::new(Notes::Client).string().not_null())
                    .col(
                        ColumnDef::new(Notes::Completed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Notes::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Notes::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notes_title_key")
                    .table(Notes::Table)
                    .col(Notes::TitleKey)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notes_user_id")
                    .table(Notes::Table)
                    .col(Notes::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Notes {
    Table,
    Id,
    UserId,
    Title,
    TitleKey,
    Text,
    Client,
    Completed,
    CreatedAt,
    UpdatedAt,
}
