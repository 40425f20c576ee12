use std::sync::Arc;

use crate::auth::{CredentialStore, PasswordHasher, TokenService};
use crate::config::AppConfig;
use crate::database::{ProductStore, SalesReports};

/// Everything a handler needs, built once in `main` and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
    pub hasher: PasswordHasher,
    pub credentials: Arc<dyn CredentialStore>,
    pub products: Arc<dyn ProductStore>,
    pub reports: Arc<dyn SalesReports>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        tokens: TokenService,
        credentials: Arc<dyn CredentialStore>,
        products: Arc<dyn ProductStore>,
        reports: Arc<dyn SalesReports>,
    ) -> Self {
        let hasher = PasswordHasher::new(config.security.password_hash_cost);
        Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            hasher,
            credentials,
            products,
            reports,
        }
    }
}
