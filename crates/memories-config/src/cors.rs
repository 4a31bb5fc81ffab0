use crate::env_list;

#[derive(Clone, Debug)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        Self {
            allowed_origins: env_list(
                "ALLOWED_ORIGINS",
                "http://localhost:3000,http://localhost:5173",
            ),
        }
    }
}
