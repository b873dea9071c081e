use std::path::PathBuf;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use cookie::SameSite;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::auth::CookiePolicy;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_path: PathBuf,
    pub public_dir: PathBuf,
    /// Frontend allowed to call the API with credentials.
    pub frontend_origin: Option<String>,
    pub cookie_secure: bool,
    pub cookie_same_site: Option<SameSite>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            data_path: "data.json".into(),
            public_dir: "public".into(),
            frontend_origin: None,
            cookie_secure: false,
            cookie_same_site: None,
        }
    }
}

impl Config {
    /// Reads the process environment. `dotenv::var` loads `.env` on first use.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let port = match var("PORT") {
            Some(port) => port.parse::<u16>().with_context(|| format!("invalid PORT {port:?}"))?,
            None => defaults.port,
        };

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port,
            data_path: var("DATA_PATH").map(PathBuf::from).unwrap_or(defaults.data_path),
            public_dir: var("PUBLIC_DIR").map(PathBuf::from).unwrap_or(defaults.public_dir),
            frontend_origin: var("FRONTEND_ORIGIN"),
            cookie_secure: var("COOKIE_SECURE").is_some_and(|value| value == "true"),
            cookie_same_site: var("COOKIE_SAMESITE").and_then(|value| parse_same_site(&value)),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cookie_policy(&self) -> CookiePolicy {
        CookiePolicy {
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
        }
    }

    /// Exactly the configured frontend with credentials, or any origin
    /// without them.
    pub fn cors_layer(&self) -> anyhow::Result<CorsLayer> {
        let Some(origin) = &self.frontend_origin else {
            return Ok(CorsLayer::permissive());
        };

        let origin = HeaderValue::from_str(origin)
            .with_context(|| format!("invalid FRONTEND_ORIGIN {origin:?}"))?;
        Ok(CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE]))
    }
}

fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.to_ascii_lowercase().as_str() {
        "none" => Some(SameSite::None),
        "lax" => Some(SameSite::Lax),
        "strict" => Some(SameSite::Strict),
        _ => {
            warn!(value, "ignoring unknown COOKIE_SAMESITE");
            None
        }
    }
}
