use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            r#"
            CREATE TABLE IF NOT EXISTS securechat.users (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                username VARCHAR(255) NOT NULL UNIQUE,
                email VARCHAR(255) NOT NULL UNIQUE,
                password_hash VARCHAR(255) NOT NULL,
                public_key TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            );
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE IF NOT EXISTS securechat.messages (
                id UUID PRIMARY KEY,
                sender_id UUID NOT NULL REFERENCES securechat.users (id) ON DELETE CASCADE,
                receiver_id UUID NOT NULL REFERENCES securechat.users (id) ON DELETE CASCADE,
                encrypted_content TEXT NOT NULL,
                iv VARCHAR(255) NOT NULL,
                sender_public_key TEXT NOT NULL,
                timestamp TIMESTAMPTZ NOT NULL DEFAULT now(),
                is_delivered BOOLEAN NOT NULL DEFAULT false,
                is_read BOOLEAN NOT NULL DEFAULT false
            );
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE IF NOT EXISTS securechat.contacts (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                user_id UUID NOT NULL REFERENCES securechat.users (id) ON DELETE CASCADE,
                contact_id UUID NOT NULL REFERENCES securechat.users (id) ON DELETE CASCADE,
                added_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                UNIQUE (user_id, contact_id)
            );
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE IF NOT EXISTS securechat.audit_logs (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                user_id UUID NOT NULL REFERENCES securechat.users (id) ON DELETE CASCADE,
                event_type VARCHAR(255) NOT NULL,
                chat_id VARCHAR(255),
                device_info TEXT,
                timestamp TIMESTAMPTZ NOT NULL DEFAULT now()
            );
            "#,
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TABLE IF EXISTS securechat.audit_logs;
                DROP TABLE IF EXISTS securechat.contacts;
                DROP TABLE IF EXISTS securechat.messages;
                DROP TABLE IF EXISTS securechat.users;
                "#,
            )
            .await?;

        Ok(())
    }
}
