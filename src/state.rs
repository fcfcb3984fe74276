use classroom_config::{CorsConfig, DatabaseConfig, ServerConfig};
use classroom_db::init_db_pool;
use sqlx::PgPool;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub server_config: ServerConfig,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(db: PgPool, server_config: ServerConfig, cors_config: CorsConfig) -> Self {
        Self {
            db,
            server_config,
            cors_config,
        }
    }
}

pub async fn init_app_state(database_config: &DatabaseConfig) -> Result<AppState, sqlx::Error> {
    Ok(AppState {
        db: init_db_pool(database_config).await?,
        server_config: ServerConfig::from_env(),
        cors_config: CorsConfig::from_env(),
    })
}
