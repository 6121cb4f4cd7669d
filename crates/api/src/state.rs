use auth::{AuthError, AuthGuard, AuthService, TokenService, UserStore};
use catalog::{ProductService, ProductStore};
use std::sync::Arc;
use stockroom_core::{AuthConfig, Database};

/// Application state shared across all handlers
pub struct AppState {
    pub auth_service: AuthService,
    pub product_service: ProductService,
    pub guard: AuthGuard,
}

impl AppState {
    /// Wire every service to one database.
    pub fn new(db: Database, auth: &AuthConfig) -> Result<Self, AuthError> {
        let db = Arc::new(db);
        Self::with_stores(db.clone(), db, auth)
    }

    pub fn with_stores(
        users: Arc<dyn UserStore>,
        products: Arc<dyn ProductStore>,
        auth: &AuthConfig,
    ) -> Result<Self, AuthError> {
        let tokens = TokenService::new(&auth.jwt_secret, auth.token_expiry_seconds)?;

        Ok(Self {
            auth_service: AuthService::new(users, tokens.clone()),
            product_service: ProductService::new(products),
            guard: AuthGuard::new(tokens, auth.bypass),
        })
    }
}
