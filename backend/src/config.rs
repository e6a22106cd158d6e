//! Process configuration.
//!
//! Everything is read once at startup from the environment (a `.env` file in
//! the working directory is honoured) and handed to the parts that need it.
//! Nothing here is global: `main` owns the [`AppConfig`] and passes the
//! Shopify half to [`crate::shopify::ShopifyClient`] and the upload half to the
//! route handlers.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_UPLOAD_FOLDER: &str = "uploads";
const DEFAULT_API_VERSION: &str = "2023-10";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024; // 100 MB

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Credentials and endpoint of the Shopify Admin API.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Store domain such as `my-shop.myshopify.com`. A value that already
    /// starts with `http://` or `https://` is used as the base URL verbatim.
    pub store_domain: String,
    pub access_token: String,
    pub api_version: String,
    /// Request timeout for the outbound call. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ShopifyConfig {
    /// Full URL of the Admin GraphQL endpoint.
    pub fn graphql_url(&self) -> String {
        let domain = self.store_domain.trim_end_matches('/');
        let base = if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{}", domain)
        };
        format!("{}/admin/api/{}/graphql.json", base, self.api_version)
    }
}

// Keeps the access token out of logs.
impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store_domain", &self.store_domain)
            .field("access_token", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Where uploads go and how large they may be.
#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub uploads: UploadSettings,
    pub shopify: ShopifyConfig,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let port = match get("PORT") {
            Some(raw) => parse(&raw, "PORT")?,
            None => DEFAULT_PORT,
        };
        let max_upload_bytes = match get("MAX_UPLOAD_BYTES") {
            Some(raw) => parse(&raw, "MAX_UPLOAD_BYTES")?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };
        let timeout = match get("SHOPIFY_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(parse(&raw, "SHOPIFY_TIMEOUT_SECS")?)),
            None => None,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            uploads: UploadSettings {
                upload_dir: PathBuf::from(
                    get("UPLOAD_FOLDER").unwrap_or_else(|| DEFAULT_UPLOAD_FOLDER.to_string()),
                ),
                max_upload_bytes,
            },
            shopify: ShopifyConfig {
                store_domain: required("SHOPIFY_STORE_DOMAIN")?,
                access_token: required("SHOPIFY_ACCESS_TOKEN")?,
                api_version: get("SHOPIFY_API_VERSION")
                    .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
                timeout,
            },
        })
    }
}

fn parse<T: std::str::FromStr>(raw: &str, name: &'static str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: raw.to_string(),
    })
}
