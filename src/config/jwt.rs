use std::env;

/// Token signing settings, read once at startup.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_token_expiry: i64,
}

fn env_seconds(key: &str, default: i64) -> i64 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "change-me-before-deploying".to_string()),
            // 1 hour / 7 days
            access_token_expiry: env_seconds("JWT_ACCESS_EXPIRY", 3600),
            refresh_token_expiry: env_seconds("JWT_REFRESH_EXPIRY", 604800),
        }
    }
}
