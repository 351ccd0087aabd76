mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;
use shared::notifications::fallback_variants;

use support::api_app::build_test_router;
use support::gateway_mock::{MockLlmGateway, MockReply};
use support::{request, send_json};

const SHIPPED_MESSAGE: &str = "Your package has shipped and will arrive soon";

#[tokio::test]
async fn model_variants_are_returned_in_order_with_model_source() {
    let gateway = MockLlmGateway::scripted(vec![MockReply::Output(json!({
        "variants": [
            "Good news! Your package is on its way.",
            "Your order has shipped and arrives soon.",
            "Heads up: your package is en route!"
        ]
    }))]);
    let app = build_test_router(gateway.clone());

    let response = send_json(
        &app,
        request(
            Method::POST,
            "/v1/notifications/variants",
            Some(json!({ "baseMessage": SHIPPED_MESSAGE, "tone": "friendly" })),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("x-variants-source"), Some("model"));
    assert_eq!(
        response.body,
        json!({
            "variants": [
                "Good news! Your package is on its way.",
                "Your order has shipped and arrives soon.",
                "Heads up: your package is en route!"
            ]
        })
    );

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].capability, "notification_variants");
    assert!(calls[0].prompt.contains(&format!("Base Message: {SHIPPED_MESSAGE}")));
    assert!(calls[0].prompt.contains("Tone: friendly"));
}

#[tokio::test]
async fn provider_timeout_serves_fallback_variants() {
    let gateway = MockLlmGateway::scripted(vec![MockReply::Timeout]);
    let app = build_test_router(gateway);

    let response = send_json(
        &app,
        request(
            Method::POST,
            "/v1/notifications/variants",
            Some(json!({ "baseMessage": "Flash sale", "tone": "urgent" })),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("x-variants-source"), Some("fallback"));
    assert_eq!(
        response.body,
        json!({
            "variants": [
                "Flash sale (urgent tone) - Variant 1",
                "Flash sale (urgent tone) - Variant 2",
                "Flash sale (urgent tone) - Variant 3"
            ]
        })
    );
}

#[tokio::test]
async fn short_model_output_is_replaced_by_fallback() {
    let gateway = MockLlmGateway::scripted(vec![MockReply::Output(json!({
        "variants": ["only one", "only two"]
    }))]);
    let app = build_test_router(gateway);

    let response = send_json(
        &app,
        request(
            Method::POST,
            "/v1/notifications/variants",
            Some(json!({ "baseMessage": SHIPPED_MESSAGE, "tone": "friendly" })),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("x-variants-source"), Some("fallback"));
    let expected = fallback_variants(SHIPPED_MESSAGE, "friendly".parse().expect("tone"));
    assert_eq!(response.body, json!({ "variants": expected }));
    assert_eq!(
        response.body["variants"][0],
        "Your package has shipped and w... (friendly tone) - Variant 1"
    );
}

#[tokio::test]
async fn unusable_provider_payloads_all_fall_back() {
    let gateway = MockLlmGateway::scripted(vec![
        MockReply::ProviderFailure("status=401 code=unauthorized"),
        MockReply::InvalidPayload("content was not json"),
        MockReply::Output(json!({ "message": "wrong field" })),
        MockReply::Output(json!({ "variants": ["a", "  ", "c"] })),
    ]);
    let app = build_test_router(gateway.clone());

    for _ in 0..4 {
        let response = send_json(
            &app,
            request(
                Method::POST,
                "/v1/notifications/variants",
                Some(json!({ "baseMessage": "Reminder: meeting at 3pm", "tone": "professional" })),
            ),
        )
        .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.header("x-variants-source"), Some("fallback"));
        assert_eq!(
            response.body["variants"][2],
            "Reminder: meeting at 3pm (professional tone) - Variant 3"
        );
    }

    assert_eq!(gateway.calls().len(), 4);
}

#[tokio::test]
async fn empty_base_message_is_rejected_before_the_model_call() {
    let gateway = MockLlmGateway::failing();
    let app = build_test_router(gateway.clone());

    for base_message in ["", "   \n\t"] {
        let response = send_json(
            &app,
            request(
                Method::POST,
                "/v1/notifications/variants",
                Some(json!({ "baseMessage": base_message, "tone": "formal" })),
            ),
        )
        .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error_code(), "empty_base_message");
    }

    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn unknown_or_miscased_tone_is_rejected() {
    let gateway = MockLlmGateway::failing();
    let app = build_test_router(gateway.clone());

    for tone in ["sarcastic", "Formal", ""] {
        let response = send_json(
            &app,
            request(
                Method::POST,
                "/v1/notifications/variants",
                Some(json!({ "baseMessage": SHIPPED_MESSAGE, "tone": tone })),
            ),
        )
        .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error_code(), "invalid_tone");
    }

    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn mistyped_base_message_gets_the_error_envelope() {
    let gateway = MockLlmGateway::failing();
    let app = build_test_router(gateway.clone());

    let response = send_json(
        &app,
        request(
            Method::POST,
            "/v1/notifications/variants",
            Some(json!({ "baseMessage": 42, "tone": "formal" })),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "invalid_request");
    assert!(response.body["error"]["message"].is_string());
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn request_id_is_echoed_and_forwarded_to_the_gateway() {
    let gateway = MockLlmGateway::failing();
    let app = build_test_router(gateway.clone());

    let mut variants_request = request(
        Method::POST,
        "/v1/notifications/variants",
        Some(json!({ "baseMessage": SHIPPED_MESSAGE, "tone": "playful" })),
    );
    variants_request.headers_mut().insert(
        "x-request-id",
        "it-variants-1".parse().expect("header value"),
    );

    let response = send_json(&app, variants_request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("x-request-id"), Some("it-variants-1"));
    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].requester_id.as_deref(), Some("it-variants-1"));
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = build_test_router(MockLlmGateway::failing());

    let response = send_json(&app, request(Method::GET, "/healthz", None)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "ok": true }));
}
