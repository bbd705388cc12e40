use sqlx::PgPool;

use gradebook_config::{CorsConfig, DatabaseConfig};
use gradebook_db::init_db_pool;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(db: PgPool, cors_config: CorsConfig) -> Self {
        Self { db, cors_config }
    }
}

pub async fn init_app_state(database: &DatabaseConfig) -> AppState {
    AppState {
        db: init_db_pool(database).await,
        cors_config: CorsConfig::from_env(),
    }
}
