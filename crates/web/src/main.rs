use anyhow::Context;
use storage::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use web::audit::{run_retry_worker, AuditRecorder};
use web::config::Config;
use web::features::config::cache::{ConfigCache, DEFAULT_TTL};
use web::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db = Database::new(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    db.run_migrations().await.context("Failed to run migrations")?;

    let (audit, retry_rx) = AuditRecorder::new(db.clone());
    let retry_tx = audit.retry_sender();
    tokio::spawn(run_retry_worker(db.clone(), retry_tx, retry_rx));

    let state = AppState {
        db,
        config: ConfigCache::new(DEFAULT_TTL),
        audit,
    };

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, web::router(state)).await?;

    Ok(())
}
