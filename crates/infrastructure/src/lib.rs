//! 基础设施层实现。
//!
//! 提供 PostgreSQL 仓储与数据库迁移，实现领域层定义的仓储接口。

pub mod migrations;
pub mod repository;

pub use migrations::{run_migrations, MigrationError, MIGRATOR};
pub use repository::{
    create_pg_pool, PgApplicationRepository, PgMessageRepository, PgStorage, PgUserDirectory,
};
