use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use configs::{AppConfig, CorsConfig, DatabaseConfig};
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::cors::OriginPolicy;
use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::product::{repo::seaorm::SeaOrmProductRepository, ProductService};

/// Compose the application from its collaborators. Called once per process
/// (and once per test app).
pub fn build_app(cors: &CorsConfig, products: ProductService) -> Router {
    let state = ServerState { products };
    routes::build_router(state, OriginPolicy::from_config(cors))
}

/// Open the product store.
///
/// With `fail_fast` unset, an unreachable database is logged and replaced by a
/// lazily connecting pool: the server keeps answering (500 for product routes)
/// and recovers once the database comes up. Pending migrations are retried in
/// the background until then.
pub async fn connect_store(cfg: &DatabaseConfig) -> Result<DatabaseConnection, StartupError> {
    match models::db::connect_with_config(cfg).await {
        Ok(db) => {
            info!("connection with DB established");
            if cfg.auto_migrate {
                migration::Migrator::up(&db, None)
                    .await
                    .map_err(|e| StartupError::Migration(e.to_string()))?;
                info!("migrations applied");
            }
            Ok(db)
        }
        Err(e) if cfg.fail_fast => Err(StartupError::Database(e.to_string())),
        Err(e) => {
            error!(error = %e, "An error occurred with the connection to the DB");
            let db = models::db::connect_lazy_with_config(cfg)
                .await
                .map_err(|e| StartupError::Database(e.to_string()))?;
            if cfg.auto_migrate {
                tokio::spawn(migrate_when_reachable(db.clone(), MIGRATION_RETRY_INTERVAL));
            }
            Ok(db)
        }
    }
}

const MIGRATION_RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// Retry the migrator until the database answers. Product routes keep
/// returning 500 until the schema exists.
async fn migrate_when_reachable(db: DatabaseConnection, every: Duration) {
    loop {
        match migration::Migrator::up(&db, None).await {
            Ok(()) => {
                info!("deferred migrations applied");
                return;
            }
            Err(e) => {
                warn!(error = %e, retry_in_secs = every.as_secs(), "migrations pending; database still unreachable");
                tokio::time::sleep(every).await;
            }
        }
    }
}

/// Resolves on Ctrl+C (and SIGTERM on unix).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

/// Build the app from a loaded config and serve until `shutdown` resolves.
pub async fn run_with_config<F>(cfg: AppConfig, shutdown: F) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let db = connect_store(&cfg.database).await?;
    let products = ProductService::new(Arc::new(SeaOrmProductRepository::new(db)));
    let app = build_app(&cfg.cors, products);

    let addr: SocketAddr = cfg
        .server
        .bind_addr()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))?;
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(anyhow::Error::from)?;
    info!(addr = %listener.local_addr().map_err(anyhow::Error::from)?, frontend = ?cfg.cors.frontend_url, "products api listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(anyhow::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_db() -> DatabaseConfig {
        DatabaseConfig {
            url: "postgres://u:p@127.0.0.1:1/db".into(),
            min_connections: 1,
            max_connections: 1,
            connect_timeout_secs: 1,
            acquire_timeout_secs: 1,
            ..DatabaseConfig::default()
        }
    }

    #[tokio::test]
    async fn deferred_migrations_keep_retrying_while_db_is_down() {
        let db = models::db::connect_lazy_with_config(&unreachable_db()).await.unwrap();
        let res = tokio::time::timeout(
            Duration::from_secs(3),
            migrate_when_reachable(db, Duration::from_millis(100)),
        )
        .await;
        assert!(res.is_err(), "retry loop must not give up while the database is unreachable");
    }

    #[tokio::test]
    async fn deferred_migrations_finish_once_db_is_reachable() {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return;
        }
        let Ok(url) = std::env::var("DATABASE_URL") else { return };
        let cfg = DatabaseConfig { url, ..unreachable_db() };
        let Ok(db) = models::db::connect_with_config(&cfg).await else { return };
        let res = tokio::time::timeout(
            Duration::from_secs(30),
            migrate_when_reachable(db, Duration::from_millis(100)),
        )
        .await;
        assert!(res.is_ok());
    }
}
