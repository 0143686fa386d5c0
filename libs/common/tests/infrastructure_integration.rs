//! Integration tests for the infrastructure components
//!
//! These tests verify that the PostgreSQL database is reachable and that
//! the bundled migrations produce the expected schema. They need a running
//! database pointed to by `DATABASE_URL`.

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use sqlx::Row;

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_database_schema_after_migrations() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    run_migrations(&pool).await?;
    // Migrations are idempotent once recorded
    run_migrations(&pool).await?;

    let row = sqlx::query(
        r#"
        SELECT COUNT(*) AS tables
        FROM information_schema.tables
        WHERE table_name IN ('users', 'appointments')
        "#,
    )
    .fetch_one(&pool)
    .await?;

    let tables: i64 = row.get("tables");
    assert_eq!(tables, 2, "Expected users and appointments tables");

    Ok(())
}
