use anyhow::{bail, Context, Result};
use axum::http::{HeaderValue, Method};
use tower_http::cors::CorsLayer;

pub struct Config {
    /// When unset the server runs on the in-memory store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub listen_addr: String,
    /// Comma-separated allowed CORS origins. If empty or "*", allows all origins (dev mode).
    pub cors_origins: String,
    pub hash_memory_kib: Option<u32>,
    pub hash_iterations: Option<u32>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            jwt_secret,
            listen_addr: lookup("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            cors_origins: lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string()),
            hash_memory_kib: parse_optional(&lookup, "HASH_MEMORY_KIB")?,
            hash_iterations: parse_optional(&lookup, "HASH_ITERATIONS")?,
        })
    }

    pub fn cors_layer(&self) -> CorsLayer {
        let origins = self.cors_origins.trim();
        if origins.is_empty() || origins == "*" {
            return CorsLayer::permissive();
        }

        let origins: Vec<HeaderValue> = origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([
                axum::http::header::AUTHORIZATION,
                axum::http::header::CONTENT_TYPE,
            ])
    }
}

fn parse_optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u32>> {
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .with_context(|| format!("{key} must be a positive integer, got {raw:?}"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", "Tomato")])).unwrap();
        assert_eq!(config.jwt_secret, "Tomato");
        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.cors_origins, "*");
        assert!(config.database_url.is_none());
        assert!(config.hash_memory_kib.is_none());
    }

    #[test]
    fn test_secret_is_required() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
        assert!(Config::from_lookup(lookup(&[("JWT_SECRET", "")])).is_err());
    }

    #[test]
    fn test_hash_cost_must_parse() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "Tomato"),
            ("HASH_MEMORY_KIB", "4096"),
            ("HASH_ITERATIONS", "3"),
            ("DATABASE_URL", ""),
        ]))
        .unwrap();
        assert_eq!(config.hash_memory_kib, Some(4096));
        assert_eq!(config.hash_iterations, Some(3));
        assert!(config.database_url.is_none());

        let err = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "Tomato"),
            ("HASH_ITERATIONS", "lots"),
        ]));
        assert!(err.is_err());
    }
}
