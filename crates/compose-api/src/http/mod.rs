use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use shared::llm::{LlmGateway, ProviderHealthTracker};
use shared::notifications::{PastNotificationsSummarizer, VariantGenerationService};
use shared::presets::PresetStore;

mod compose;
mod errors;
mod health;
mod llm_telemetry;
mod observability;
mod presets;
mod schedule;
mod summary;
mod variants;

pub use variants::VARIANTS_SOURCE_HEADER;

#[derive(Clone)]
pub struct AppState {
    pub variants: VariantGenerationService,
    pub summarizer: PastNotificationsSummarizer,
    pub presets: Arc<PresetStore>,
    pub provider_health: Arc<ProviderHealthTracker>,
    pub request_body_limit_bytes: u64,
}

impl AppState {
    /// Both model-backed flows share one gateway and one health tracker.
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        presets: Arc<PresetStore>,
        request_body_limit_bytes: u64,
    ) -> Self {
        Self {
            variants: VariantGenerationService::new(gateway.clone()),
            summarizer: PastNotificationsSummarizer::new(gateway),
            presets,
            provider_health: Arc::new(ProviderHealthTracker::default()),
            request_body_limit_bytes,
        }
    }
}

pub fn build_router(app_state: AppState) -> Router {
    let body_limit = usize::try_from(app_state.request_body_limit_bytes).unwrap_or(usize::MAX);

    Router::new()
        .route("/healthz", get(health::healthz))
        .route(
            "/v1/notifications/variants",
            post(variants::generate_variants),
        )
        .route(
            "/v1/notifications/summary",
            post(summary::summarize_past_notifications),
        )
        .route(
            "/v1/notifications/schedule",
            post(schedule::schedule_notification),
        )
        .route("/v1/compose", post(compose::compose))
        .route(
            "/v1/presets",
            get(presets::list_presets).post(presets::save_preset),
        )
        .route("/v1/presets/{preset_id}", get(presets::get_preset))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(
            observability::request_observability_middleware,
        ))
        .with_state(app_state)
}
