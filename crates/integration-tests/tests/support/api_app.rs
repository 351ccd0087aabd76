use std::path::PathBuf;
use std::sync::Arc;

use compose_api::http::{AppState, build_router};
use shared::llm::LlmGateway;
use shared::presets::PresetStore;
use uuid::Uuid;

const TEST_REQUEST_BODY_LIMIT_BYTES: u64 = 16 * 1024;

pub fn build_test_router(gateway: Arc<dyn LlmGateway>) -> axum::Router {
    build_test_router_with_presets(gateway, Arc::new(PresetStore::in_memory()))
}

pub fn build_test_router_with_presets(
    gateway: Arc<dyn LlmGateway>,
    presets: Arc<PresetStore>,
) -> axum::Router {
    build_router(AppState::new(
        gateway,
        presets,
        TEST_REQUEST_BODY_LIMIT_BYTES,
    ))
}

pub fn scratch_preset_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("compose-api-it-{}", Uuid::new_v4()))
        .join("presets.json")
}
