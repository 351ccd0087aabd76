use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::config_env::{optional_trimmed_env, parse_u64_env};
use crate::llm::OpenRouterGatewayConfig;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_PRESET_STORE_PATH: &str = "smart_compose_presets.json";
const MEMORY_PRESET_STORE: &str = "memory";
const DEFAULT_REQUEST_BODY_LIMIT_BYTES: u64 = 64 * 1024;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: String,
    /// `None` keeps presets in memory only.
    pub preset_store_path: Option<PathBuf>,
    pub request_body_limit_bytes: u64,
    /// `None` when no provider key is configured.
    pub openrouter: Option<OpenRouterGatewayConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid integer in env var {0}")]
    ParseInt(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failed to load .env file: {0}")]
    Dotenv(String),
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let preset_store_path = match optional_trimmed_env("PRESET_STORE_PATH") {
            Some(value) if value.eq_ignore_ascii_case(MEMORY_PRESET_STORE) => None,
            Some(value) => Some(PathBuf::from(value)),
            None => Some(PathBuf::from(DEFAULT_PRESET_STORE_PATH)),
        };

        Ok(Self {
            bind_addr: env::var("API_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            preset_store_path,
            request_body_limit_bytes: parse_u64_env(
                "REQUEST_BODY_LIMIT_BYTES",
                DEFAULT_REQUEST_BODY_LIMIT_BYTES,
            )?,
            openrouter: OpenRouterGatewayConfig::from_env()?,
        })
    }
}

/// Loads `.env` from the working directory if present.
pub fn load_dotenv() -> Result<(), ConfigError> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(ConfigError::Dotenv(err.to_string())),
    }
}
