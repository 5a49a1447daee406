//! DormDine API server binary.
//!
//! Serves the REST API over PostgreSQL when a database URL is configured,
//! otherwise over an in-memory store.

use std::sync::Arc;

use clap::Parser;
use dormdine_api::AppState;
use dormdine_api::config::ApiConfig;
use dormdine_core::payments::{PaymentGateway, StripeGateway, UnconfiguredGateway};
use dormdine_core::store::{DocumentStore, MemoryStore, PgDocumentStore};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

/// CLI arguments. Flags override the environment.
#[derive(Parser, Debug)]
#[command(name = "dormdine_server", about = "DormDine API server")]
struct Args {
    /// Address to listen on (defaults to `BIND_ADDR`, else `127.0.0.1:$PORT`).
    #[arg(long)]
    bind: Option<String>,

    /// PostgreSQL connection URL (defaults to `DATABASE_URL`; unset = in-memory store).
    #[arg(long)]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, env = "MAX_CONNECTIONS", default_value_t = 5)]
    max_connections: u32,

    /// Browser origin allowed to send credentialed requests (repeatable).
    #[arg(long = "allowed-origin")]
    allowed_origins: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,dormdine_api=debug,dormdine_core=debug")
            }),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env();
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if args.database_url.is_some() {
        config.database_url = args.database_url;
    }
    if !args.allowed_origins.is_empty() {
        config.allowed_origins = args.allowed_origins;
    }

    info!(bind = %config.bind_addr, "starting dormdine_server");

    let store: Arc<dyn DocumentStore> = match &config.database_url {
        Some(url) => {
            info!(max_connections = args.max_connections, "connecting to PostgreSQL");
            let pool = PgPoolOptions::new()
                .max_connections(args.max_connections)
                .acquire_timeout(std::time::Duration::from_secs(30))
                .connect(url)
                .await?;

            info!("running database migrations");
            dormdine_api::migrate(&pool).await?;
            Arc::new(PgDocumentStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, using the in-memory store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let payments: Arc<dyn PaymentGateway> = match &config.stripe_secret_key {
        Some(key) => Arc::new(StripeGateway::new(key.clone())),
        None => {
            warn!("STRIPE_SECRET_KEY not set, payment intents are disabled");
            Arc::new(UnconfiguredGateway)
        }
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    let app = dormdine_api::router(AppState::new(store, payments, config));

    info!(addr = %local_addr, "REST API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_parse_repeatable_origins() {
        let args = Args::parse_from([
            "dormdine_server",
            "--bind",
            "0.0.0.0:8080",
            "--allowed-origin",
            "http://a.test",
            "--allowed-origin",
            "http://b.test",
        ]);
        assert_eq!(args.bind.as_deref(), Some("0.0.0.0:8080"));
        assert_eq!(args.allowed_origins.len(), 2);
        assert!(args.database_url.is_none());
    }
}
