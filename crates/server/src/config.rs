use std::net::SocketAddr;

use anyhow::{Context, Result};
use api::auth::AuthConfig;
use axum::http::HeaderValue;

const DEFAULT_DATABASE_URL: &str = "sqlite://leadspot.db?mode=rwc";
const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Process configuration, read from the environment (and `.env`).
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind: SocketAddr,
    pub auth: AuthConfig,
    pub cors_origins: Vec<HeaderValue>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let bind = std::env::var("BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
        let bind = bind
            .parse()
            .with_context(|| format!("BIND is not a socket address: {bind}"))?;

        let secret = std::env::var("AUTH_SECRET").unwrap_or_else(|_| {
            tracing::warn!("AUTH_SECRET not set, using the development secret");
            "dev-secret".into()
        });
        let mut auth = AuthConfig::new(secret);
        if let Ok(ttl) = std::env::var("TOKEN_TTL_MINUTES") {
            auth.token_ttl_minutes = ttl
                .parse()
                .with_context(|| format!("TOKEN_TTL_MINUTES is not a number: {ttl}"))?;
        }

        let cors_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
            Ok(list) => parse_origins(&list)?,
            Err(_) => Vec::new(),
        };

        Ok(Self {
            database_url,
            bind,
            auth,
            cors_origins,
        })
    }
}

fn parse_origins(list: &str) -> Result<Vec<HeaderValue>> {
    list.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin).with_context(|| format!("invalid CORS origin {origin}"))
        })
        .collect()
}
