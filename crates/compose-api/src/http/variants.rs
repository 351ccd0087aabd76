use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, State};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use shared::notifications::{VariantRequest, VariantSource};

use super::AppState;
use super::errors::{bad_request_response, json_rejection_response};
use super::llm_telemetry::record_llm_call;
use super::observability::RequestContext;

/// Tells callers whether the body came from the model or the fallback.
pub const VARIANTS_SOURCE_HEADER: &str = "x-variants-source";

pub(super) async fn generate_variants(
    State(state): State<AppState>,
    Extension(request_context): Extension<RequestContext>,
    payload: Result<Json<VariantRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return json_rejection_response(rejection),
    };

    let generation = match state
        .variants
        .generate_detailed(&req, Some(&request_context.request_id))
        .await
    {
        Ok(generation) => generation,
        Err(err) => return bad_request_response(err.code(), &err.to_string()),
    };

    record_llm_call(
        &state.provider_health,
        &request_context.request_id,
        &generation.telemetry,
        generation.source == VariantSource::Fallback,
    );

    (
        StatusCode::OK,
        [(
            HeaderName::from_static(VARIANTS_SOURCE_HEADER),
            HeaderValue::from_static(generation.source.as_str()),
        )],
        Json(generation.result),
    )
        .into_response()
}
