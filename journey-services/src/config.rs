//! Configuration for the journey services.

use liberation::{PolicyConfig, DEFAULT_HISTORY_CAP};
use serde::{Deserialize, Serialize};

use crate::types::{Result, ServiceError};

/// Configuration for the service layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Liberation policy applied by every service
    pub policy: PolicyConfig,
    /// Journey history settings
    pub history: HistoryConfig,
    /// Content review settings
    pub content: ContentConfig,
    /// Revenue review settings
    pub revenue: RevenueConfig,
    /// General settings
    pub general: GeneralConfig,
}

impl ServicesConfig {
    /// Load config from YAML and check the embedded policy.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.policy.check()?;
        if config.history.cap == 0 {
            return Err(ServiceError::InvalidRequest(
                "history.cap must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Journey history configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Stages kept per user
    pub cap: usize,
    /// Idle time after which a user's history is dropped (seconds).
    /// `None` keeps histories for the life of the process.
    pub expiry_secs: Option<u64>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            cap: DEFAULT_HISTORY_CAP,
            expiry_secs: None,
        }
    }
}

/// Content review configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Community benefit a submission must reach
    pub min_community_benefit: f64,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            min_community_benefit: 0.6,
        }
    }
}

/// Revenue review configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueConfig {
    /// Ceiling on creator + platform + community fund shares
    pub max_total_share: f64,
}

impl Default for RevenueConfig {
    fn default() -> Self {
        Self {
            max_total_share: 1.0,
        }
    }
}

/// General configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
