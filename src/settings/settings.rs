use crate::application_impl::JwtConfig;
use anyhow::{Result, anyhow};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub auth: Auth,
    pub store: Store,
    pub log: Log,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    pub issuer: String,
    pub audience: String,
    pub algorithm: String,
    pub access_ttl_secs: u64,
    pub refresh_ttl_secs: u64,
    /// Name of the environment variable holding the signing secret.
    pub secret_env: String,
}

#[derive(Debug, Deserialize)]
pub struct Store {
    pub backend: String, // "redis" or "memory"
    pub redis_dsn: String,
    /// How often the memory backend sweeps expired entries.
    #[serde(default = "default_purge_interval_secs")]
    pub purge_interval_secs: u64,
}

fn default_purge_interval_secs() -> u64 {
    60
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

/// Settings file, overridden by `TOKENKEEPER__SECTION__KEY` variables.
pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .add_source(Environment::with_prefix("TOKENKEEPER").separator("__"))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}

impl Auth {
    /// Token configuration, with the secret read from `secret_env`.
    pub fn jwt_config(&self) -> Result<JwtConfig> {
        let secret = std::env::var(&self.secret_env).unwrap_or_default();
        self.jwt_config_with_secret(secret.into_bytes())
    }

    pub fn jwt_config_with_secret(&self, secret: Vec<u8>) -> Result<JwtConfig> {
        let cfg = JwtConfig::try_new(secret)
            .map_err(|e| anyhow!("{e} (expected in ${})", self.secret_env))?
            .with_issuer(&self.issuer)
            .with_audience(&self.audience)
            .with_algorithm(&self.algorithm)?
            .with_ttls(
                Duration::from_secs(self.access_ttl_secs),
                Duration::from_secs(self.refresh_ttl_secs),
            )?;
        Ok(cfg)
    }
}
