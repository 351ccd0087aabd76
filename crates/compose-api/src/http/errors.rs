use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shared::models::{ErrorBody, ErrorResponse};
use shared::presets::PresetStoreError;
use tracing::error;

fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: message.to_string(),
            },
        }),
    )
        .into_response()
}

pub(super) fn bad_request_response(code: &str, message: &str) -> Response {
    error_response(StatusCode::BAD_REQUEST, code, message)
}

pub(super) fn not_found_response(code: &str, message: &str) -> Response {
    error_response(StatusCode::NOT_FOUND, code, message)
}

pub(super) fn bad_gateway_response(code: &str, message: &str) -> Response {
    error_response(StatusCode::BAD_GATEWAY, code, message)
}

/// Malformed or mistyped JSON bodies get the same envelope as domain errors.
pub(super) fn json_rejection_response(rejection: JsonRejection) -> Response {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            "payload_too_large",
            "Request body is too large",
        );
    }

    bad_request_response("invalid_request", &rejection.body_text())
}

pub(super) fn preset_store_error_response(err: PresetStoreError) -> Response {
    match err {
        PresetStoreError::EmptyName => bad_request_response(
            "preset_name_required",
            "Please enter a name for your preset.",
        ),
        other => {
            error!("preset store error: {other}");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "preset_store_error",
                "Failed to save preset",
            )
        }
    }
}
