use crate::auth::TokenManager;
use crate::config::Config;
use crate::db::Database;
use crate::error::AppError;

/// Everything a request handler needs, built once at startup and shared through
/// `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub tokens: TokenManager,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(db: Database, tokens: TokenManager, bcrypt_cost: u32) -> Self {
        Self {
            db,
            tokens,
            bcrypt_cost,
        }
    }

    /// Connects the store described by `config` and prepares the token manager.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        let db = Database::connect(&config.database_url, config.database_max_connections).await?;
        let tokens = TokenManager::new(&config.jwt_secret, config.token_ttl_hours);
        Ok(Self::new(db, tokens, config.bcrypt_cost))
    }
}
