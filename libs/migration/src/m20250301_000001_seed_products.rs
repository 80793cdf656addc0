use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            INSERT INTO products (name, price, in_stock, created_utc, updated_utc)
            VALUES
                ('Keyboard', 29.99, true, NOW(), NOW()),
                ('Mouse', 14.99, true, NOW(), NOW()),
                ('Monitor', 199.00, false, NOW(), NOW()),
                ('Test', 14.99, true, NOW(), NOW()),
                ('Test1', 199.00, false, NOW(), NOW())
            "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                "DELETE FROM products WHERE name IN ('Keyboard', 'Mouse', 'Monitor', 'Test', 'Test1')",
            )
            .await?;

        Ok(())
    }
}
