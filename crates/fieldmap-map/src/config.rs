//! Matching thresholds and ranking service settings.

use std::time::Duration;

use fieldmap_model::{LOW_CONFIDENCE_BELOW, OVERRIDE_SCORE_FLOOR, REFINE_BELOW};

/// Environment variable holding the ranking service endpoint.
pub const ENV_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
/// Environment variable holding the ranking service key.
pub const ENV_API_KEY: &str = "AZURE_OPENAI_API_KEY";
/// Environment variable holding the model deployment name.
pub const ENV_DEPLOYMENT: &str = "AZURE_OPENAI_DEPLOYMENT";
/// Environment variable overriding the API version.
pub const ENV_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";

pub const DEFAULT_API_VERSION: &str = "2024-08-01-preview";
pub const DEFAULT_RANK_TIMEOUT: Duration = Duration::from_secs(60);

/// Score thresholds used by the matching engine and review sessions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchThresholds {
    /// Rows scoring below this are re-ranked by the refinement pass.
    pub refine_below: f64,
    /// Rows scoring below this are flagged as low confidence.
    pub low_confidence: f64,
    /// Minimum score of a row after a reviewer assigned it a target.
    pub override_floor: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            refine_below: REFINE_BELOW,
            low_confidence: LOW_CONFIDENCE_BELOW,
            override_floor: OVERRIDE_SCORE_FLOOR,
        }
    }
}

/// Connection settings of the chat-completions ranking service.
#[derive(Clone, PartialEq)]
pub struct RankerConfig {
    pub endpoint: String,
    pub api_key: String,
    pub deployment: String,
    pub api_version: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for RankerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankerConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RankerConfig {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            deployment: deployment.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: DEFAULT_RANK_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads the settings from the process environment.
    ///
    /// Returns `None` unless endpoint, key and deployment are all set.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let present = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let endpoint = present(ENV_ENDPOINT)?;
        let api_key = present(ENV_API_KEY)?;
        let deployment = present(ENV_DEPLOYMENT)?;
        let mut config = Self::new(endpoint, api_key, deployment);
        if let Some(version) = present(ENV_API_VERSION) {
            config.api_version = version;
        }
        Some(config)
    }

    /// Chat-completions URL of the configured deployment.
    pub fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }
}
