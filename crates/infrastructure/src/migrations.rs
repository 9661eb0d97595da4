use sqlx::{migrate::Migrator, PgPool};
use thiserror::Error;

/// 工作区根目录 `migrations/` 下的全部迁移脚本，编译期嵌入。
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Error)]
#[error("database migration failed: {0}")]
pub struct MigrationError(#[from] sqlx::migrate::MigrateError);

pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrationError> {
    MIGRATOR.run(pool).await?;
    tracing::info!(count = MIGRATOR.iter().count(), "database migrations applied");
    Ok(())
}
