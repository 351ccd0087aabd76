use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::contracts::ComposeCapability;
use super::prompts::PromptTemplate;

pub type LlmGatewayFuture<'a> =
    Pin<Box<dyn Future<Output = Result<LlmGatewayResponse, LlmGatewayError>> + Send + 'a>>;

#[derive(Debug, Clone)]
pub struct LlmGatewayRequest {
    pub requester_id: Option<String>,
    pub capability: ComposeCapability,
    pub system_prompt: String,
    pub prompt: String,
    pub output_schema: Value,
    pub temperature: f64,
}

impl LlmGatewayRequest {
    pub fn from_template(template: PromptTemplate, prompt: String) -> Self {
        Self {
            requester_id: None,
            capability: template.capability,
            system_prompt: template.system_prompt.to_string(),
            prompt,
            output_schema: template.output_schema,
            temperature: template.temperature,
        }
    }

    pub fn with_requester_id(mut self, requester_id: impl AsRef<str>) -> Self {
        let trimmed = requester_id.as_ref().trim();
        if !trimmed.is_empty() {
            self.requester_id = Some(trimmed.to_string());
        }
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmTokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmGatewayResponse {
    pub model: String,
    pub provider_request_id: Option<String>,
    pub output: Value,
    pub usage: Option<LlmTokenUsage>,
}

#[derive(Debug, Error)]
pub enum LlmGatewayError {
    #[error("llm provider request timed out")]
    Timeout,
    #[error("llm provider request failed: {0}")]
    ProviderFailure(String),
    #[error("llm provider returned an invalid payload: {0}")]
    InvalidProviderPayload(String),
}

/// Opaque model capability: takes a rendered prompt plus the expected output
/// schema and yields a structured JSON value or a failure.
pub trait LlmGateway: Send + Sync {
    fn generate<'a>(&'a self, request: LlmGatewayRequest) -> LlmGatewayFuture<'a>;
}

pub const UNCONFIGURED_PROVIDER_CODE: &str = "llm_provider_unconfigured";

/// Stands in for a real provider when no API key is configured. Every call
/// fails, which routes variant generation onto the deterministic fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredGateway;

impl LlmGateway for UnconfiguredGateway {
    fn generate<'a>(&'a self, _request: LlmGatewayRequest) -> LlmGatewayFuture<'a> {
        Box::pin(async {
            Err(LlmGatewayError::ProviderFailure(
                UNCONFIGURED_PROVIDER_CODE.to_string(),
            ))
        })
    }
}
