use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The api_keys table stores vaulted credentials. The key material
        // itself is only ever stored encrypted (AES-256-GCM, base64-encoded).
        let create_table_sql = r#"
            CREATE TABLE IF NOT EXISTS mcp_chat.api_keys (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                name VARCHAR(255) NOT NULL,
                encrypted_key TEXT NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

                CONSTRAINT api_keys_name_unique UNIQUE(name)
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_table_sql)
            .await?;

        // Lookups are by provider name
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_api_keys_name ON mcp_chat.api_keys(name)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS mcp_chat.idx_api_keys_name")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS mcp_chat.api_keys")
            .await?;

        Ok(())
    }
}
