use std::sync::Arc;

use anyhow::Context;
use chrono::Duration;

use crate::auth::{CredentialStore, MemoryCredentialStore, PasswordHasher, TokenService};
use crate::config::AppConfig;
use crate::database::{MemoryStore, PgStore, ProductStore, SalesReports};
use crate::router;
use crate::state::AppState;

pub async fn handle() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    config.validate().context("Invalid configuration")?;
    tracing::info!("Starting Products API in {:?} mode", config.environment);

    let bind_addr = config.bind_addr();
    let state = build_state(config).await?;
    let app = router::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Products API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

/// Wire credentials, token service and storage from configuration.
pub async fn build_state(config: AppConfig) -> anyhow::Result<AppState> {
    let hasher = PasswordHasher::new(config.security.password_hash_cost);
    let credentials = load_credentials(&config, &hasher)?;

    let ttl = Duration::try_minutes(config.security.token_ttl_minutes)
        .context("SECURITY_TOKEN_TTL_MINUTES is out of range")?;
    let tokens = TokenService::new(&config.security.jwt_secret, ttl).context("Failed to initialize token service")?;

    let (products, reports): (Arc<dyn ProductStore>, Arc<dyn SalesReports>) = match config.database.url {
        Some(_) => {
            let store = Arc::new(
                PgStore::connect(&config.database, config.reports.clone())
                    .await
                    .context("Failed to connect to database")?,
            );
            (store.clone() as Arc<dyn ProductStore>, store as Arc<dyn SalesReports>)
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; using the in-memory store");
            let store = Arc::new(MemoryStore::new(config.reports.clone()));
            (store.clone() as Arc<dyn ProductStore>, store as Arc<dyn SalesReports>)
        }
    };

    Ok(AppState::new(config, tokens, credentials, products, reports))
}

fn load_credentials(config: &AppConfig, hasher: &PasswordHasher) -> anyhow::Result<Arc<dyn CredentialStore>> {
    let store = match config.security.users_file {
        Some(ref path) => {
            let store = MemoryCredentialStore::from_yaml_file(path)?;
            tracing::info!("Loaded {} users from {}", store.len(), path.display());
            store
        }
        None if config.is_development() => {
            tracing::warn!("SECURITY_USERS_FILE is not set; seeding development user 'admin'");
            MemoryCredentialStore::development(hasher)?
        }
        None => {
            tracing::warn!("SECURITY_USERS_FILE is not set; no user can log in");
            MemoryCredentialStore::new(Vec::new())?
        }
    };
    Ok(Arc::new(store))
}
