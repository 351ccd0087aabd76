use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shared::notifications::{SummaryError, SummaryRequest};
use tracing::warn;

use super::AppState;
use super::errors::{bad_gateway_response, bad_request_response, json_rejection_response};
use super::llm_telemetry::record_llm_call;
use super::observability::RequestContext;

pub(super) async fn summarize_past_notifications(
    State(state): State<AppState>,
    Extension(request_context): Extension<RequestContext>,
    payload: Result<Json<SummaryRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return json_rejection_response(rejection),
    };

    let (result, telemetry) = state.summarizer.summarize(&req).await;
    if let Some(telemetry) = telemetry.as_ref() {
        record_llm_call(
            &state.provider_health,
            &request_context.request_id,
            telemetry,
            result.is_err(),
        );
    }

    match result {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(SummaryError::EmptyInput) => bad_request_response(
            "empty_input",
            "Please enter some past notifications to summarize.",
        ),
        Err(err) => {
            warn!(
                request_id = %request_context.request_id,
                error = %err,
                "past notifications summary failed"
            );
            bad_gateway_response(
                "summary_unavailable",
                "Could not summarize notifications. Please try again.",
            )
        }
    }
}
