//! 主应用程序入口
//!
//! 加载配置、初始化日志、装配存储后端并启动 Axum Web API 服务。

mod demo;

use std::sync::Arc;

use application::{
    InMemoryApplicationStore, InMemoryMessageStore, InMemoryUserDirectory, LocalMessageNotifier,
    MessagingService, MessagingServiceDependencies, SystemClock,
};
use config::{AppConfig, StorageBackend};
use domain::{ApplicationRepository, MessageRepository, UserDirectory};
use infrastructure::{create_pg_pool, run_migrations, PgStorage};
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState, JwtService};

struct Stores {
    applications: Arc<dyn ApplicationRepository>,
    messages: Arc<dyn MessageRepository>,
    users: Arc<dyn UserDirectory>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(config.log.json);

    tracing::info!(config = ?config.sanitized(), "configuration loaded");

    let stores = match config.storage.backend {
        StorageBackend::Postgres => {
            let pool =
                create_pg_pool(&config.database.url, config.database.max_connections).await?;
            run_migrations(&pool).await?;
            let storage = PgStorage::new(pool);
            Stores {
                applications: storage.application_repository,
                messages: storage.message_repository,
                users: storage.user_directory,
            }
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; data is lost on restart");
            let applications = InMemoryApplicationStore::new();
            let users = InMemoryUserDirectory::new();
            demo::seed(&applications, &users).await;
            Stores {
                applications: Arc::new(applications),
                messages: Arc::new(InMemoryMessageStore::new()),
                users: Arc::new(users),
            }
        }
    };

    let notifier = Arc::new(LocalMessageNotifier::default());
    spawn_notice_logger(&notifier);

    let messaging_service = MessagingService::new(MessagingServiceDependencies {
        application_repository: stores.applications,
        message_repository: stores.messages,
        user_directory: stores.users,
        clock: Arc::new(SystemClock),
        notifier,
    });

    let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
    if config.storage.backend == StorageBackend::Memory {
        demo::log_tokens(&jwt_service);
    }

    let state = AppState::new(Arc::new(messaging_service), jwt_service)
        .with_cors_origins(config.server.cors_origins.clone());

    let app = router(state);
    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(address = %address, "hirechat messaging server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

// 实时推送不在本服务范围内，这里只记录新消息事件
fn spawn_notice_logger(notifier: &LocalMessageNotifier) {
    let mut receiver = notifier.subscribe();
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(notice) => tracing::debug!(
                    application_id = %notice.application_id,
                    recipient_id = %notice.recipient_id,
                    message_id = %notice.message.id,
                    "new message notice"
                ),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "notice logger lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
