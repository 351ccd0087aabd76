pub mod contracts;
pub mod gateway;
pub mod observability;
pub mod openrouter;
pub mod prompts;
pub mod validation;

pub use contracts::{
    ComposeCapability, ComposeOutputContract, ContractError, NOTIFICATION_VARIANT_COUNT,
    NotificationVariantsOutput, PastNotificationsSummaryOutput, output_schema,
};
pub use gateway::{
    LlmGateway, LlmGatewayError, LlmGatewayFuture, LlmGatewayRequest, LlmGatewayResponse,
    LlmTokenUsage, UnconfiguredGateway,
};
pub use observability::{
    LlmExecutionSource, LlmTelemetryEvent, ProviderDegradationAlert, ProviderHealthTracker,
    ProviderHealthTransition, generate_with_telemetry,
};
pub use openrouter::{OpenRouterConfigError, OpenRouterGateway, OpenRouterGatewayConfig};
pub use prompts::{
    PromptTemplate, render_summary_prompt, render_variants_prompt, template_for_capability,
};
pub use validation::{OutputValidationError, validate_output_json, validate_output_value};
