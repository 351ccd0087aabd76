use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shared::composer::validate_composer_form;
use shared::models::{ComposeRequest, ComposeResponse};
use shared::notifications::{VariantRequest, VariantRequestError, VariantSource};
use shared::preview::build_previews;

use super::AppState;
use super::errors::{bad_request_response, json_rejection_response};
use super::llm_telemetry::record_llm_call;
use super::observability::RequestContext;

const COMPOSE_READY_MESSAGE: &str = "Previews are ready below.";

/// Server-side form submit: validate, generate, group previews per channel.
pub(super) async fn compose(
    State(state): State<AppState>,
    Extension(request_context): Extension<RequestContext>,
    payload: Result<Json<ComposeRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return json_rejection_response(rejection),
    };
    let form = match req.into_form() {
        Ok(form) => form,
        Err(unknown) => {
            let err = VariantRequestError::InvalidTone(unknown.0);
            return bad_request_response(err.code(), &err.to_string());
        }
    };

    if let Err(field_errors) = validate_composer_form(&form) {
        let message = field_errors
            .iter()
            .map(|field_error| field_error.message)
            .collect::<Vec<_>>()
            .join(" ");
        return bad_request_response("invalid_form", &message);
    }

    let request = VariantRequest::new(form.base_message.clone(), form.tone.as_str());
    let generation = match state
        .variants
        .generate_detailed(&request, Some(&request_context.request_id))
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

    let previews = build_previews(&generation.result, &form.channels);
    let response = ComposeResponse {
        variants: generation.result.variants,
        tone: generation.tone,
        previews,
        message: COMPOSE_READY_MESSAGE.to_string(),
    };

    (StatusCode::OK, Json(response)).into_response()
}
