use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::{
    ComposeCapability, LlmGateway, LlmGatewayError, LlmGatewayRequest, LlmGatewayResponse,
};

pub const PROVIDER_DEGRADATION_FAILURE_THRESHOLD: u32 = 5;
pub const PROVIDER_DEGRADATION_DURATION_THRESHOLD: Duration = Duration::from_secs(120);
const DEFAULT_PROVIDER: &str = "openrouter";

#[derive(Debug, Clone, Copy)]
pub enum LlmExecutionSource {
    ApiNotificationVariants,
    ApiNotificationSummary,
}

impl LlmExecutionSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApiNotificationVariants => "api_notification_variants",
            Self::ApiNotificationSummary => "api_notification_summary",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmTelemetryEvent {
    pub source: &'static str,
    pub capability: &'static str,
    pub outcome: &'static str,
    pub latency_ms: u64,
    pub provider: String,
    pub model: Option<String>,
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
    pub estimated_cost_usd: Option<f64>,
    pub error_type: Option<&'static str>,
}

impl LlmTelemetryEvent {
    pub fn succeeded(&self) -> bool {
        self.outcome == "success"
    }
}

pub async fn generate_with_telemetry(
    llm_gateway: &dyn LlmGateway,
    source: LlmExecutionSource,
    request: LlmGatewayRequest,
) -> (
    Result<LlmGatewayResponse, LlmGatewayError>,
    LlmTelemetryEvent,
) {
    let capability = request.capability;
    let started_at = Instant::now();
    let result = llm_gateway.generate(request).await;
    let telemetry = telemetry_for_result(source, capability, started_at.elapsed(), &result);
    (result, telemetry)
}

fn telemetry_for_result(
    source: LlmExecutionSource,
    capability: ComposeCapability,
    latency: Duration,
    result: &Result<LlmGatewayResponse, LlmGatewayError>,
) -> LlmTelemetryEvent {
    let latency_ms = duration_to_millis(latency);
    match result {
        Ok(response) => {
            let usage = response.usage.clone().unwrap_or_default();
            let has_usage = response.usage.is_some();
            let estimated_cost_usd = if has_usage {
                estimate_cost_usd(
                    &response.model,
                    usage.prompt_tokens,
                    usage.completion_tokens,
                )
            } else {
                None
            };

            LlmTelemetryEvent {
                source: source.as_str(),
                capability: capability.as_str(),
                outcome: "success",
                latency_ms,
                provider: provider_from_model(&response.model),
                model: Some(response.model.clone()),
                prompt_tokens: has_usage.then_some(usage.prompt_tokens),
                completion_tokens: has_usage.then_some(usage.completion_tokens),
                total_tokens: has_usage.then_some(usage.total_tokens),
                estimated_cost_usd,
                error_type: None,
            }
        }
        Err(err) => LlmTelemetryEvent {
            source: source.as_str(),
            capability: capability.as_str(),
            outcome: "failure",
            latency_ms,
            provider: DEFAULT_PROVIDER.to_string(),
            model: None,
            prompt_tokens: None,
            completion_tokens: None,
            total_tokens: None,
            estimated_cost_usd: None,
            error_type: Some(error_type(err)),
        },
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    let millis = duration.as_millis();
    u64::try_from(millis).unwrap_or(u64::MAX)
}

fn provider_from_model(model: &str) -> String {
    model
        .split_once('/')
        .map(|(provider, _)| provider.trim())
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_PROVIDER)
        .to_string()
}

fn error_type(error: &LlmGatewayError) -> &'static str {
    match error {
        LlmGatewayError::Timeout => "timeout",
        LlmGatewayError::ProviderFailure(_) => "provider_failure",
        LlmGatewayError::InvalidProviderPayload(_) => "invalid_provider_payload",
    }
}

fn estimate_cost_usd(model: &str, prompt_tokens: u32, completion_tokens: u32) -> Option<f64> {
    let pricing = pricing_for_model(model)?;
    let prompt = f64::from(prompt_tokens);
    let completion = f64::from(completion_tokens);
    let total = (prompt * pricing.input_per_million + completion * pricing.output_per_million)
        / 1_000_000.0;
    Some((total * 1_000_000.0).round() / 1_000_000.0)
}

#[derive(Debug, Clone, Copy)]
struct ModelPricing {
    input_per_million: f64,
    output_per_million: f64,
}

fn pricing_for_model(model: &str) -> Option<ModelPricing> {
    let normalized = model.trim().to_ascii_lowercase();
    if normalized.starts_with("google/gemini-2.0-flash") {
        return Some(ModelPricing {
            input_per_million: 0.10,
            output_per_million: 0.40,
        });
    }

    if normalized.starts_with("openai/gpt-4o-mini") {
        return Some(ModelPricing {
            input_per_million: 0.15,
            output_per_million: 0.60,
        });
    }

    None
}

#[derive(Debug, Clone)]
pub struct ProviderDegradationAlert {
    pub consecutive_failures: u32,
    pub degraded_for_seconds: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ProviderHealthTransition {
    pub degradation_alert: Option<ProviderDegradationAlert>,
    pub recovered: bool,
}

#[derive(Debug, Default)]
struct ProviderHealthState {
    consecutive_failures: u32,
    first_failure_at: Option<Instant>,
    alert_open: bool,
}

/// Tracks how often model calls end up degraded (provider failure or
/// off-contract output). Owned by the application state and shared by handle.
#[derive(Debug)]
pub struct ProviderHealthTracker {
    failure_threshold: u32,
    duration_threshold: Duration,
    state: Mutex<ProviderHealthState>,
}

impl Default for ProviderHealthTracker {
    fn default() -> Self {
        Self::new(
            PROVIDER_DEGRADATION_FAILURE_THRESHOLD,
            PROVIDER_DEGRADATION_DURATION_THRESHOLD,
        )
    }
}

impl ProviderHealthTracker {
    pub fn new(failure_threshold: u32, duration_threshold: Duration) -> Self {
        Self {
            failure_threshold,
            duration_threshold,
            state: Mutex::new(ProviderHealthState::default()),
        }
    }

    pub fn record(&self, succeeded: bool, now: Instant) -> ProviderHealthTransition {
        let mut state = self.lock_state();

        if succeeded {
            let recovered = state.alert_open;
            state.consecutive_failures = 0;
            state.first_failure_at = None;
            state.alert_open = false;
            return ProviderHealthTransition {
                degradation_alert: None,
                recovered,
            };
        }

        if state.consecutive_failures == 0 {
            state.first_failure_at = Some(now);
        }

        state.consecutive_failures = state.consecutive_failures.saturating_add(1);
        let degraded_for = state
            .first_failure_at
            .map(|started| now.saturating_duration_since(started))
            .unwrap_or_default();

        if !state.alert_open
            && state.consecutive_failures >= self.failure_threshold
            && degraded_for >= self.duration_threshold
        {
            state.alert_open = true;
            return ProviderHealthTransition {
                degradation_alert: Some(ProviderDegradationAlert {
                    consecutive_failures: state.consecutive_failures,
                    degraded_for_seconds: degraded_for.as_secs(),
                }),
                recovered: false,
            };
        }

        ProviderHealthTransition::default()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ProviderHealthState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use serde_json::json;

    use super::{
        LlmExecutionSource, ProviderHealthTracker, estimate_cost_usd, generate_with_telemetry,
        provider_from_model,
    };
    use crate::llm::{
        ComposeCapability, LlmGatewayRequest, LlmGatewayResponse, LlmTokenUsage,
        UnconfiguredGateway, template_for_capability,
    };
    use crate::llm::gateway::{LlmGateway, LlmGatewayFuture};

    struct FixedGateway;

    impl LlmGateway for FixedGateway {
        fn generate<'a>(&'a self, _request: LlmGatewayRequest) -> LlmGatewayFuture<'a> {
            Box::pin(async {
                Ok(LlmGatewayResponse {
                    model: "google/gemini-2.0-flash-001".to_string(),
                    provider_request_id: None,
                    output: json!({ "variants": ["a", "b", "c"] }),
                    usage: Some(LlmTokenUsage {
                        prompt_tokens: 1_000,
                        completion_tokens: 500,
                        total_tokens: 1_500,
                    }),
                })
            })
        }
    }

    fn request() -> LlmGatewayRequest {
        LlmGatewayRequest::from_template(
            template_for_capability(ComposeCapability::NotificationVariants),
            "prompt".to_string(),
        )
    }

    #[tokio::test]
    async fn success_telemetry_includes_usage_and_cost() {
        let (result, telemetry) = generate_with_telemetry(
            &FixedGateway,
            LlmExecutionSource::ApiNotificationVariants,
            request(),
        )
        .await;

        assert!(result.is_ok());
        assert!(telemetry.succeeded());
        assert_eq!(telemetry.provider, "google");
        assert_eq!(telemetry.capability, "notification_variants");
        assert_eq!(telemetry.total_tokens, Some(1_500));
        assert_eq!(telemetry.estimated_cost_usd, Some(0.0003));
    }

    #[tokio::test]
    async fn failure_telemetry_records_error_type() {
        let (result, telemetry) = generate_with_telemetry(
            &UnconfiguredGateway,
            LlmExecutionSource::ApiNotificationVariants,
            request(),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(telemetry.outcome, "failure");
        assert_eq!(telemetry.error_type, Some("provider_failure"));
        assert!(telemetry.model.is_none());
    }

    #[test]
    fn provider_is_derived_from_model_prefix() {
        assert_eq!(provider_from_model("openai/gpt-4o-mini"), "openai");
        assert_eq!(provider_from_model("local-model"), "openrouter");
        assert_eq!(estimate_cost_usd("unknown/model", 10, 10), None);
    }

    #[test]
    fn tracker_alerts_once_after_sustained_failures_and_reports_recovery() {
        let tracker = ProviderHealthTracker::new(3, Duration::from_secs(60));
        let start = Instant::now();

        assert!(tracker.record(false, start).degradation_alert.is_none());
        assert!(
            tracker
                .record(false, start + Duration::from_secs(30))
                .degradation_alert
                .is_none()
        );
        let alert = tracker
            .record(false, start + Duration::from_secs(61))
            .degradation_alert
            .expect("third sustained failure should alert");
        assert_eq!(alert.consecutive_failures, 3);
        assert_eq!(alert.degraded_for_seconds, 61);

        assert!(
            tracker
                .record(false, start + Duration::from_secs(90))
                .degradation_alert
                .is_none(),
            "alert should not repeat while open"
        );

        let transition = tracker.record(true, start + Duration::from_secs(120));
        assert!(transition.recovered);


        // A fresh outage needs the full threshold again.
        let restart = start + Duration::from_secs(200);
        assert!(tracker.record(false, restart).degradation_alert.is_none());
        assert!(
            tracker
                .record(false, restart + Duration::from_secs(61))
                .degradation_alert
                .is_none()
        );
        assert!(
            tracker
                .record(false, restart + Duration::from_secs(62))
                .degradation_alert
                .is_some()
        );
    }
}
