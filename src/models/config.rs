use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const CONFIG_DIR: &str = "config";

/// What to do when an item form names a category that does not exist.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnknownCategoryPolicy {
    /// Fail the submission with a validation error on the `category` field.
    #[default]
    Reject,
    /// Persist the item without a category reference.
    Detach,
}

/// Configuration options for the catalog service.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Path of the SQLite database file.
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Glob used by Tera to load templates.
    pub templates_dir: String,
    /// Directory served under `/assets`.
    pub assets_dir: String,
    /// Signing key for flash message cookies; at least 64 bytes.
    pub secret_key: String,
    pub unknown_category: UnknownCategoryPolicy,
}

impl ServerConfig {
    /// Loads configuration from defaults, `config/default.yaml`,
    /// `config/{APP_ENV}.yaml` and `APP_*` environment variables, in that
    /// order of precedence.
    pub fn load() -> Result<Self, ConfigError> {
        let run_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());

        Config::builder()
            .set_default("database_url", "app.db")?
            .set_default("address", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("templates_dir", "templates/**/*")?
            .set_default("assets_dir", "./assets")?
            .set_default("unknown_category", "reject")?
            .add_source(File::with_name(&format!("{CONFIG_DIR}/default")).required(false))
            .add_source(File::with_name(&format!("{CONFIG_DIR}/{run_env}")).required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: "app.db".to_string(),
            address: "127.0.0.1".to_string(),
            port: 8080,
            templates_dir: "templates/**/*".to_string(),
            assets_dir: "./assets".to_string(),
            secret_key: String::new(),
            unknown_category: UnknownCategoryPolicy::Reject,
        }
    }
}
