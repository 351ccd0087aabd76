use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::{
    ComposeCapability, ComposeOutputContract, LlmExecutionSource, LlmGateway, LlmGatewayError,
    LlmGatewayRequest, LlmTelemetryEvent, OutputValidationError, generate_with_telemetry,
    render_summary_prompt, template_for_capability, validate_output_value,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    #[serde(default)]
    pub past_notifications: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
}

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("past notifications must not be empty")]
    EmptyInput,
    #[error("summary model call failed: {0}")]
    Gateway(#[from] LlmGatewayError),
    #[error("summary model output was rejected: {0}")]
    Output(#[from] OutputValidationError),
}

/// Summarizes a block of previously sent notifications. Unlike variant
/// generation there is no placeholder text, so model failures surface.
#[derive(Clone)]
pub struct PastNotificationsSummarizer {
    gateway: Arc<dyn LlmGateway>,
}

impl PastNotificationsSummarizer {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self { gateway }
    }

    pub async fn summarize(
        &self,
        request: &SummaryRequest,
    ) -> (Result<SummaryResult, SummaryError>, Option<LlmTelemetryEvent>) {
        if request.past_notifications.trim().is_empty() {
            return (Err(SummaryError::EmptyInput), None);
        }

        let gateway_request = LlmGatewayRequest::from_template(
            template_for_capability(ComposeCapability::PastNotificationsSummary),
            render_summary_prompt(request.past_notifications.trim()),
        );
        let (result, telemetry) = generate_with_telemetry(
            self.gateway.as_ref(),
            LlmExecutionSource::ApiNotificationSummary,
            gateway_request,
        )
        .await;

        let summary = result.map_err(SummaryError::from).and_then(|response| {
            match validate_output_value(
                ComposeCapability::PastNotificationsSummary,
                &response.output,
            )? {
                ComposeOutputContract::PastNotificationsSummary(output) => Ok(SummaryResult {
                    summary: output.summary.trim().to_string(),
                }),
                ComposeOutputContract::NotificationVariants(_) => {
                    Err(SummaryError::Output(OutputValidationError::BlankSummary))
                }
            }
        });

        (summary, Some(telemetry))
    }
}
