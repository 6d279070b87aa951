//! Service configuration from environment variables.

use shop_rank::RerankConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
    #[error("{key} must be set")]
    Missing { key: &'static str },
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub listen: SocketAddr,
    pub reviews_path: PathBuf,
    pub meta_path: PathBuf,
    /// Search endpoint of the retrieval engine.
    pub retrieval_url: String,
    pub retrieval_api_key: Option<String>,
    pub error_budget: f64,
    pub rerank_deadline: Option<Duration>,
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or empty keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listen = parse(
            "SHOP_LISTEN",
            get("SHOP_LISTEN").unwrap_or_else(|| "0.0.0.0:8002".to_string()),
        )?;
        let error_budget: f64 = match get("SHOP_ERROR_BUDGET") {
            Some(v) => parse("SHOP_ERROR_BUDGET", v)?,
            None => RerankConfig::default().error_budget,
        };
        if !(error_budget.is_finite() && error_budget > 0.0) {
            return Err(ConfigError::Invalid {
                key: "SHOP_ERROR_BUDGET",
                value: error_budget.to_string(),
            });
        }
        let retrieval_url = get("SHOP_RETRIEVAL_URL").ok_or(ConfigError::Missing {
            key: "SHOP_RETRIEVAL_URL",
        })?;
        let rerank_deadline = match get("SHOP_RERANK_DEADLINE_MS") {
            Some(v) => Some(Duration::from_millis(parse("SHOP_RERANK_DEADLINE_MS", v)?)),
            None => None,
        };

        Ok(Self {
            listen,
            reviews_path: get("SHOP_REVIEWS_PATH")
                .unwrap_or_else(|| "Data/Musical_Instruments_5.json".to_string())
                .into(),
            meta_path: get("SHOP_META_PATH")
                .unwrap_or_else(|| "Data/meta_Musical_Instruments.json".to_string())
                .into(),
            retrieval_url,
            retrieval_api_key: get("SHOP_RETRIEVAL_API_KEY"),
            error_budget,
            rerank_deadline,
        })
    }

    pub fn rerank_config(&self) -> RerankConfig {
        let config = RerankConfig::default().with_error_budget(self.error_budget);
        match self.rerank_deadline {
            Some(d) => config.with_deadline(d),
            None => config,
        }
    }
}
