use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use shared::schedule::{ScheduleRequest, simulate_schedule};
use tracing::info;

use super::errors::{bad_request_response, json_rejection_response};

/// Confirms a simulated send. Nothing is queued or delivered.
pub(super) async fn schedule_notification(
    payload: Result<Json<ScheduleRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return json_rejection_response(rejection),
    };

    match simulate_schedule(&req, Utc::now()) {
        Ok(confirmation) => {
            info!(
                channel = confirmation.channel.as_str(),
                scheduled_for = %confirmation.scheduled_for,
                time_zone = %confirmation.time_zone,
                "notification schedule simulated"
            );
            (StatusCode::OK, Json(confirmation)).into_response()
        }
        Err(err) => bad_request_response("invalid_schedule", &err.to_string()),
    }
}
