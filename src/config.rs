use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    pub jwt_secret: String,
}

impl Config {
    pub fn from_env() -> Result<Self, crate::error::AppError> {
        dotenv().ok();
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".into());
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);
        let jwt_secret = env::var("CHAT_JWT_SECRET")
            .map_err(|_| crate::error::AppError::Config("CHAT_JWT_SECRET missing".into()))?;
        if jwt_secret.trim().is_empty() {
            return Err(crate::error::AppError::Config(
                "CHAT_JWT_SECRET must not be empty".into(),
            ));
        }

        Ok(Self {
            bind_addr,
            port,
            jwt_secret,
        })
    }

    #[cfg(test)]
    pub fn test_defaults() -> Self {
        Self {
            bind_addr: "127.0.0.1".into(),
            port: 3000,
            jwt_secret: "test-secret".into(),
        }
    }
}
