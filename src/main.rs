use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use recoshelf::{
    config::Config,
    db::{create_pool, CatalogStore, MemoryCatalogStore, PgCatalogStore},
    middleware::AdminAuth,
    routes::{create_router, AppState},
    services::{seed::seed_demo, GenreResolver, MetadataProvider, TmdbProvider},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("recoshelf=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.admin_password.is_none() {
        tracing::warn!("ADMIN_PASSWORD is not set; admin login is disabled");
    }

    let provider: Arc<dyn MetadataProvider> = Arc::new(TmdbProvider::from_config(&config)?);
    let genres = Arc::new(GenreResolver::new(
        provider.clone(),
        config.genre_cache_ttl(),
    ));

    let store: Arc<dyn CatalogStore> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = create_pool(url).await?;
            Arc::new(PgCatalogStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; records are kept in memory only");
            Arc::new(MemoryCatalogStore::new())
        }
    };

    if config.seed_demo {
        seed_demo(store.as_ref()).await?;
    }

    let state = AppState {
        store,
        provider,
        genres,
        admin: AdminAuth::new(config.admin_password.clone()),
    };
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
