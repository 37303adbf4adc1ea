use std::env;

use anyhow::Context;
use config::{Config, Environment, File};
use dotenvy::dotenv;
use editorial_common::database::DatabaseSettings;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_port: String,
    #[serde(default)]
    pub store: StoreKind,
    /// Required by the postgres store
    pub database: Option<DatabaseSettings>,
    #[serde(default)]
    pub authors: AuthorsSettings,
}

/// Where publications are kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Postgres,
    /// Process local, lost on restart
    Memory,
}

/// Location of the authors service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthorsSettings {
    pub url: String,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
}

impl Default for AuthorsSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
            connect_timeout_ms: 5000,
            read_timeout_ms: 10000,
        }
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        let run_mode = load_env("RUN_MODE", "development");

        let s = Config::builder()
            .add_source(File::with_name("./config/default"))
            .add_source(File::with_name(&format!("./config/{run_mode}")).required(false))
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Self::from_config(s)
    }

    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        config
            .try_deserialize()
            .with_context(|| "failed to read config")
    }
}

fn load_env(key: &str, default_value: &'static str) -> String {
    env::var(key).unwrap_or_else(|_| default_value.into())
}
