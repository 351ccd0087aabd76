use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::fallback::fallback_variants;
use crate::composer::NotificationTone;
use crate::llm::{
    ComposeCapability, ComposeOutputContract, LlmExecutionSource, LlmGateway, LlmGatewayError,
    LlmGatewayRequest, LlmTelemetryEvent, generate_with_telemetry, render_variants_prompt,
    template_for_capability, validate_output_value,
};

/// Wire shape of the generation entrypoint: `{ "baseMessage", "tone" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRequest {
    #[serde(default)]
    pub base_message: String,
    #[serde(default)]
    pub tone: String,
}

impl VariantRequest {
    pub fn new(base_message: impl Into<String>, tone: impl Into<String>) -> Self {
        Self {
            base_message: base_message.into(),
            tone: tone.into(),
        }
    }
}

/// Always exactly three variants, in "Variant 1/2/3" order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub variants: [String; 3],
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VariantRequestError {
    #[error("base message must not be empty")]
    EmptyBaseMessage,
    #[error("tone '{0}' is not one of formal, informal, urgent, friendly, playful, professional")]
    InvalidTone(String),
}

impl VariantRequestError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyBaseMessage => "empty_base_message",
            Self::InvalidTone(_) => "invalid_tone",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantSource {
    Model,
    Fallback,
}

impl VariantSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    Timeout,
    ProviderFailure,
    InvalidProviderPayload,
    OffContractOutput(&'static str),
}

impl FallbackReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::ProviderFailure => "provider_failure",
            Self::InvalidProviderPayload => "invalid_provider_payload",
            Self::OffContractOutput(reason) => reason,
        }
    }

    fn from_gateway_error(err: &LlmGatewayError) -> Self {
        match err {
            LlmGatewayError::Timeout => Self::Timeout,
            LlmGatewayError::ProviderFailure(_) => Self::ProviderFailure,
            LlmGatewayError::InvalidProviderPayload(_) => Self::InvalidProviderPayload,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VariantGeneration {
    pub result: GenerationResult,
    pub tone: NotificationTone,
    pub source: VariantSource,
    pub fallback_reason: Option<FallbackReason>,
    pub telemetry: LlmTelemetryEvent,
}

/// Validates input, asks the model for three variants and substitutes the
/// deterministic fallback whenever the model does not honour the contract.
/// Holds no per-call state; clones share the gateway.
#[derive(Clone)]
pub struct VariantGenerationService {
    gateway: Arc<dyn LlmGateway>,
}

impl VariantGenerationService {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self { gateway }
    }

    pub async fn generate(
        &self,
        request: &VariantRequest,
    ) -> Result<GenerationResult, VariantRequestError> {
        self.generate_detailed(request, None)
            .await
            .map(|generation| generation.result)
    }

    pub async fn generate_detailed(
        &self,
        request: &VariantRequest,
        requester_id: Option<&str>,
    ) -> Result<VariantGeneration, VariantRequestError> {
        let tone = validate_request(request)?;

        let mut gateway_request = LlmGatewayRequest::from_template(
            template_for_capability(ComposeCapability::NotificationVariants),
            render_variants_prompt(&request.base_message, tone),
        );
        if let Some(requester_id) = requester_id {
            gateway_request = gateway_request.with_requester_id(requester_id);
        }

        let (result, telemetry) = generate_with_telemetry(
            self.gateway.as_ref(),
            LlmExecutionSource::ApiNotificationVariants,
            gateway_request,
        )
        .await;

        let outcome = match result {
            Ok(response) => match validate_output_value(
                ComposeCapability::NotificationVariants,
                &response.output,
            ) {
                Ok(contract) => model_variants(contract)
                    .ok_or(FallbackReason::OffContractOutput("contract_mismatch")),
                Err(err) => {
                    debug!(error = %err, "model variants failed output validation");
                    Err(FallbackReason::OffContractOutput(err.reason()))
                }
            },
            Err(err) => {
                debug!(error = %err, "model variants request failed");
                Err(FallbackReason::from_gateway_error(&err))
            }
        };

        let generation = match outcome {
            Ok(variants) => VariantGeneration {
                result: GenerationResult { variants },
                tone,
                source: VariantSource::Model,
                fallback_reason: None,
                telemetry,
            },
            Err(reason) => {
                warn!(
                    event = "notification_variants_fallback",
                    metric_name = "notification_variants_fallback",
                    reason = reason.as_str(),
                    tone = tone.as_str(),
                    latency_ms = telemetry.latency_ms,
                    "model output unavailable; serving fallback variants"
                );
                VariantGeneration {
                    result: GenerationResult {
                        variants: fallback_variants(&request.base_message, tone),
                    },
                    tone,
                    source: VariantSource::Fallback,
                    fallback_reason: Some(reason),
                    telemetry,
                }
            }
        };

        Ok(generation)
    }
}

fn validate_request(request: &VariantRequest) -> Result<NotificationTone, VariantRequestError> {
    if request.base_message.trim().is_empty() {
        return Err(VariantRequestError::EmptyBaseMessage);
    }

    request
        .tone
        .parse::<NotificationTone>()
        .map_err(|_| VariantRequestError::InvalidTone(request.tone.clone()))
}

fn model_variants(contract: ComposeOutputContract) -> Option<[String; 3]> {
    match contract {
        ComposeOutputContract::NotificationVariants(output) => output.variants.try_into().ok(),
        ComposeOutputContract::PastNotificationsSummary(_) => None,
    }
}
