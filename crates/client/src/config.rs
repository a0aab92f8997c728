//! Client configuration: defaults < `restock.toml` < `RESTOCK_*` environment.

use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use restock_ai::{PolicyError, RestockConfig};
use restock_core::{DomainError, StoreId};
use restock_observability::LogFormat;

pub const DEFAULT_CONFIG_FILE: &str = "restock.toml";
pub const ENV_PREFIX: &str = "RESTOCK_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<PolicyError> for ConfigError {
    fn from(err: PolicyError) -> Self {
        Self::Invalid(err.to_string())
    }
}

impl From<DomainError> for ConfigError {
    fn from(err: DomainError) -> Self {
        Self::Invalid(err.to_string())
    }
}

/// Where the inventory list comes from at session start.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventorySource {
    #[default]
    Synthetic,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the recommendation service.
    pub base_url: String,
    /// Per-request timeout; 0 disables it.
    pub timeout_secs: u64,
    /// Location used when a single-item request names none.
    pub store_id: String,
    pub safety_stock: i64,
    pub case_size: i64,
    pub inventory_source: InventorySource,
    pub seed: Option<u64>,
    pub log_format: LogFormat,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let policy = RestockConfig::default();
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: 30,
            store_id: "S001".to_string(),
            safety_stock: policy.safety_stock(),
            case_size: policy.case_size(),
            inventory_source: InventorySource::default(),
            seed: None,
            log_format: LogFormat::default(),
        }
    }
}

impl ClientConfig {
    /// Layered sources, lowest precedence first.
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(ClientConfig::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(path).extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url cannot be empty".to_string()));
        }
        self.policy()?;
        self.default_store()?;
        Ok(())
    }

    pub fn policy(&self) -> Result<RestockConfig, PolicyError> {
        RestockConfig::new(self.safety_stock, self.case_size)
    }

    pub fn default_store(&self) -> Result<StoreId, DomainError> {
        StoreId::new(&self.store_id)
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_apply_without_sources() {
        Jail::expect_with(|_jail| {
            let config: ClientConfig = ClientConfig::figment("missing.toml").extract()?;
            assert_eq!(config, ClientConfig::default());
            assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "restock.toml",
                r#"
                    base_url = "http://forecast.internal:9000"
                    case_size = 24
                    inventory_source = "remote"
                "#,
            )?;
            jail.set_env("RESTOCK_CASE_SIZE", "12");
            jail.set_env("RESTOCK_LOG_FORMAT", "pretty");

            let config: ClientConfig = ClientConfig::figment("restock.toml").extract()?;
            assert_eq!(config.base_url, "http://forecast.internal:9000");
            assert_eq!(config.case_size, 12);
            assert_eq!(config.inventory_source, InventorySource::Remote);
            assert_eq!(config.log_format, LogFormat::Pretty);
            assert_eq!(config.safety_stock, 75);
            Ok(())
        });
    }

    #[test]
    fn invalid_policy_is_rejected() {
        let config = ClientConfig {
            case_size: 0,
            ..ClientConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn zero_timeout_disables_it() {
        let config = ClientConfig {
            timeout_secs: 0,
            ..ClientConfig::default()
        };
        assert_eq!(config.timeout(), None);
    }
}
