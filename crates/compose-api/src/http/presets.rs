use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shared::models::{ListPresetsResponse, SavePresetRequest, SavePresetResponse};
use tracing::info;

use super::AppState;
use super::errors::{json_rejection_response, not_found_response, preset_store_error_response};

pub(super) async fn list_presets(State(state): State<AppState>) -> Response {
    let items = state.presets.list().await;
    (StatusCode::OK, Json(ListPresetsResponse { items })).into_response()
}

pub(super) async fn get_preset(
    State(state): State<AppState>,
    Path(preset_id): Path<String>,
) -> Response {
    match state.presets.get(&preset_id).await {
        Some(preset) => (StatusCode::OK, Json(preset)).into_response(),
        None => not_found_response("preset_not_found", "Preset not found"),
    }
}

pub(super) async fn save_preset(
    State(state): State<AppState>,
    payload: Result<Json<SavePresetRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return json_rejection_response(rejection),
    };

    let preset = match state.presets.save(&req.name, req.form).await {
        Ok(preset) => preset,
        Err(err) => return preset_store_error_response(err),
    };

    info!(preset_id = %preset.id, "preset saved");
    let message = format!("Preset \"{}\" has been saved.", preset.name);
    (
        StatusCode::OK,
        Json(SavePresetResponse { preset, message }),
    )
        .into_response()
}
