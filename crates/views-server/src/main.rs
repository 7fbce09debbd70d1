mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use views_api::AppStateInner;
use views_api::policy::{AuthorizationPolicy, OwnerOnlyPolicy, TrustedClientPolicy};
use views_api::routes;
use views_crypto::{CredentialCodec, TokenConfig, TokenIssuer};
use views_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "views_server=debug,views_api=debug,views_db=info,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = Arc::new(Database::open(&config.database_path)?);

    let tokens = TokenIssuer::new(TokenConfig {
        secret: config.jwt_secret.clone(),
        ttl: config.token_ttl,
    })?;
    if config.token_ttl.is_none() {
        warn!("VIEWS_TOKEN_TTL_SECS unset: issued tokens never expire");
    }

    let policy: Arc<dyn AuthorizationPolicy> = if config.enforce_ownership {
        info!("Ownership checks enabled");
        Arc::new(OwnerOnlyPolicy)
    } else {
        Arc::new(TrustedClientPolicy)
    };

    let state = AppStateInner::new(db, CredentialCodec::new(), tokens, policy);

    let app = routes::router(state)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Views server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    ctrl_c.await.ok();
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
