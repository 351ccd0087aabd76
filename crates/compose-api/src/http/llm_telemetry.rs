use std::time::Instant;

use shared::llm::{LlmTelemetryEvent, ProviderHealthTracker};
use tracing::{info, warn};

/// Logs one model call and feeds the provider health tracker. `degraded`
/// covers both failed calls and successful calls whose output was rejected.
pub(super) fn record_llm_call(
    provider_health: &ProviderHealthTracker,
    request_id: &str,
    telemetry: &LlmTelemetryEvent,
    degraded: bool,
) {
    log_llm_telemetry(request_id, telemetry);

    let transition = provider_health.record(!degraded, Instant::now());
    if let Some(alert) = transition.degradation_alert.as_ref() {
        warn!(
            event = "llm_provider_degradation_alert",
            metric_name = "llm_provider_degradation",
            request_id = request_id,
            provider = telemetry.provider.as_str(),
            consecutive_failures = alert.consecutive_failures,
            degraded_for_seconds = alert.degraded_for_seconds,
            "llm provider degraded; notifications are being served from fallback copy"
        );
    }
    if transition.recovered {
        info!(
            event = "llm_provider_recovered",
            metric_name = "llm_provider_degradation",
            request_id = request_id,
            provider = telemetry.provider.as_str(),
            "llm provider recovered"
        );
    }
}

fn log_llm_telemetry(request_id: &str, telemetry: &LlmTelemetryEvent) {
    if telemetry.succeeded() {
        info!(
            metric_name = "llm_request",
            source = telemetry.source,
            capability = telemetry.capability,
            outcome = telemetry.outcome,
            request_id = request_id,
            provider = telemetry.provider.as_str(),
            model = ?telemetry.model,
            latency_ms = telemetry.latency_ms,
            prompt_tokens = ?telemetry.prompt_tokens,
            completion_tokens = ?telemetry.completion_tokens,
            total_tokens = ?telemetry.total_tokens,
            estimated_cost_usd = ?telemetry.estimated_cost_usd,
            "llm request metrics"
        );
    } else {
        warn!(
            metric_name = "llm_request",
            source = telemetry.source,
            capability = telemetry.capability,
            outcome = telemetry.outcome,
            request_id = request_id,
            provider = telemetry.provider.as_str(),
            latency_ms = telemetry.latency_ms,
            error_type = ?telemetry.error_type,
            "llm request metrics"
        );
    }
}
