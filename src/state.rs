use std::sync::Arc;

use memories_config::{CorsConfig, FederatedConfig, JwtConfig, ServerConfig, StorageConfig};
use memories_db::{PostRepository, Repositories, UserRepository, init_repositories};
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub users: Arc<dyn UserRepository>,
    pub jwt_config: JwtConfig,
    pub federated_config: FederatedConfig,
    pub cors_config: CorsConfig,
    pub server_config: ServerConfig,
}

impl AppState {
    /// State over the given repositories with configuration read from the environment.
    pub fn from_env(repos: Repositories) -> Self {
        Self {
            posts: repos.posts,
            users: repos.users,
            jwt_config: JwtConfig::from_env(),
            federated_config: FederatedConfig::from_env(),
            cors_config: CorsConfig::from_env(),
            server_config: ServerConfig::from_env(),
        }
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let repos = init_repositories(&StorageConfig::from_env()).await?;
    let state = AppState::from_env(repos);
    info!(
        federated = state.federated_config.is_enabled(),
        "Federated sign-in configured"
    );
    Ok(state)
}
