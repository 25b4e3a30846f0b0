use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Conversation history filters on both participants and sorts by time
        manager
            .create_index(
                Index::create()
                    .name("messages_sender_receiver_timestamp")
                    .table((Alias::new("securechat"), Alias::new("messages")))
                    .col(Alias::new("sender_id"))
                    .col(Alias::new("receiver_id"))
                    .col(Alias::new("timestamp"))
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("audit_logs_user_timestamp")
                    .table((Alias::new("securechat"), Alias::new("audit_logs")))
                    .col(Alias::new("user_id"))
                    .col(Alias::new("timestamp"))
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("audit_logs_user_timestamp")
                    .table((Alias::new("securechat"), Alias::new("audit_logs")))
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("messages_sender_receiver_timestamp")
                    .table((Alias::new("securechat"), Alias::new("messages")))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
