//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `LABELCHECK_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_BATCH_CONCURRENCY, DEFAULT_MODELS, DEFAULT_REQUEST_TIMEOUT,
};
use crate::retry::RetryPolicy;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `LABELCHECK_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// OpenAI-compatible endpoint. Default: `https://api.openai.com/v1`.
    pub api_base_url: String,

    /// Model credential. Required unless `mock_provider` is set.
    pub api_key: Option<String>,

    /// Primary model first, then fallbacks.
    pub models: Vec<String>,

    /// Per-call HTTP timeout. Default: 60s.
    pub request_timeout: Duration,

    /// Rate-limit backoff and content-policy retry settings.
    pub retry: RetryPolicy,

    /// Parallelism limit for batch verification. Default: `4`.
    pub batch_concurrency: usize,

    /// Serve canned model responses instead of calling a provider.
    pub mock_provider: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: None,
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            retry: RetryPolicy::default(),
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
            mock_provider: false,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "LABELCHECK_PORT";
    const ENV_BIND_ADDR: &'static str = "LABELCHECK_BIND_ADDR";
    const ENV_API_BASE_URL: &'static str = "LABELCHECK_API_BASE_URL";
    pub const ENV_API_KEY: &'static str = "LABELCHECK_API_KEY";
    const ENV_MODELS: &'static str = "LABELCHECK_MODELS";
    const ENV_REQUEST_TIMEOUT_SECS: &'static str = "LABELCHECK_REQUEST_TIMEOUT_SECS";
    const ENV_RETRY_INITIAL_DELAY_MS: &'static str = "LABELCHECK_RETRY_INITIAL_DELAY_MS";
    const ENV_RETRY_MAX_DELAY_MS: &'static str = "LABELCHECK_RETRY_MAX_DELAY_MS";
    const ENV_RETRY_MAX_ROUNDS: &'static str = "LABELCHECK_RETRY_MAX_ROUNDS";
    const ENV_CONTENT_POLICY_DELAY_MS: &'static str = "LABELCHECK_CONTENT_POLICY_DELAY_MS";
    const ENV_BATCH_CONCURRENCY: &'static str = "LABELCHECK_BATCH_CONCURRENCY";
    pub const ENV_MOCK_PROVIDER: &'static str = "LABELCHECK_MOCK_PROVIDER";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let api_base_url = Self::parse_string_from_env(Self::ENV_API_BASE_URL, defaults.api_base_url);
        let api_key = Self::parse_optional_string_from_env(Self::ENV_API_KEY);
        let models = Self::parse_models_from_env(defaults.models)?;
        let request_timeout = Duration::from_secs(Self::parse_u64_from_env(
            Self::ENV_REQUEST_TIMEOUT_SECS,
            defaults.request_timeout.as_secs(),
        ));
        let retry = RetryPolicy {
            initial_delay: Self::parse_millis_from_env(
                Self::ENV_RETRY_INITIAL_DELAY_MS,
                defaults.retry.initial_delay,
            ),
            max_delay: Self::parse_millis_from_env(
                Self::ENV_RETRY_MAX_DELAY_MS,
                defaults.retry.max_delay,
            ),
            max_rounds: Self::parse_u64_from_env(
                Self::ENV_RETRY_MAX_ROUNDS,
                defaults.retry.max_rounds as u64,
            ) as u32,
            content_policy_delay: Self::parse_millis_from_env(
                Self::ENV_CONTENT_POLICY_DELAY_MS,
                defaults.retry.content_policy_delay,
            ),
        };
        let batch_concurrency = Self::parse_batch_concurrency_from_env(defaults.batch_concurrency)?;
        let mock_provider = Self::parse_optional_string_from_env(Self::ENV_MOCK_PROVIDER).is_some();

        Ok(Self {
            port,
            bind_addr,
            api_base_url,
            api_key,
            models,
            request_timeout,
            retry,
            batch_concurrency,
            mock_provider,
        })
    }

    /// Checks invariants that `from_env` cannot enforce field by field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.models.is_empty() {
            return Err(ConfigError::EmptyModelList);
        }
        if self.batch_concurrency == 0 {
            return Err(ConfigError::InvalidBatchConcurrency {
                value: self.batch_concurrency.to_string(),
            });
        }
        self.retry
            .validate()
            .map_err(|reason| ConfigError::InvalidRetryPolicy { reason })?;
        Ok(())
    }

    /// The model credential, or the error to report when it is needed but absent.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingEnvVar {
            name: Self::ENV_API_KEY,
        })
    }

    /// Whether a model call can be made at all.
    pub fn is_model_configured(&self) -> bool {
        self.mock_provider || self.api_key.is_some()
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_models_from_env(default: Vec<String>) -> Result<Vec<String>, ConfigError> {
        match env::var(Self::ENV_MODELS) {
            Ok(value) => {
                let models: Vec<String> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .collect();
                if models.is_empty() {
                    return Err(ConfigError::EmptyModelList);
                }
                Ok(models)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_batch_concurrency_from_env(default: usize) -> Result<usize, ConfigError> {
        match env::var(Self::ENV_BATCH_CONCURRENCY) {
            Ok(value) => match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(ConfigError::InvalidBatchConcurrency { value }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_millis_from_env(var_name: &str, default: Duration) -> Duration {
        Duration::from_millis(Self::parse_u64_from_env(var_name, default.as_millis() as u64))
    }
}
