//! Integration tests for the activity endpoint, driven in-process with `tower::ServiceExt::oneshot`.
//!
//! Covers: emulator transport returning replies inline, HTTP transport posting replies to the
//! serviceUrl, malformed payloads, failed turns mapped to error envelopes, health and the nested
//! management router.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::Router;
use handler_chain::HandlerChain;
use serde_json::{json, Value};
use storebot_channel::{build_router, HttpChannelAdapter, Transport};
use storebot_core::{Handler, HandlerError, HandlerResponse, TurnContext};
use tower::ServiceExt;

/// Replies with "echo: <text>"; fails with StateUnavailable on "fail".
struct EchoHandler;

#[async_trait]
impl Handler for EchoHandler {
    async fn handle(&self, turn: &TurnContext) -> storebot_core::Result<HandlerResponse> {
        let text = turn.activity().message_text().unwrap_or_default().to_string();
        if text == "fail" {
            return Err(HandlerError::StateUnavailable(turn.conversation_id().to_string()).into());
        }
        turn.send_text(&format!("echo: {}", text)).await;
        Ok(HandlerResponse::Stop)
    }
}

fn chain() -> HandlerChain {
    HandlerChain::new().add_handler(Arc::new(EchoHandler))
}

fn post_activity(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/messages")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_emulator_returns_replies_inline() {
    let app = build_router(chain(), Transport::Emulator, None);

    let response = app
        .oneshot(post_activity(json!({
            "type": "message",
            "id": "in-1",
            "channelId": "emulator",
            "from": { "id": "user-1" },
            "recipient": { "id": "bot-1" },
            "conversation": { "id": "conv-1" },
            "text": "hello"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let activities = body["activities"].as_array().unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0]["text"], "echo: hello");
    assert_eq!(activities[0]["replyToId"], "in-1");
    assert_eq!(activities[0]["recipient"]["id"], "user-1");
}

#[tokio::test]
async fn test_http_transport_posts_reply_to_service_url() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v3/conversations/conv-1/activities/in-1")
        .match_body(mockito::Matcher::PartialJson(json!({ "text": "echo: hi" })))
        .with_status(200)
        .create_async()
        .await;

    let app = build_router(
        chain(),
        Transport::Http(Arc::new(HttpChannelAdapter::new())),
        None,
    );

    let response = app
        .oneshot(post_activity(json!({
            "type": "message",
            "id": "in-1",
            "channelId": "webchat",
            "serviceUrl": server.url(),
            "conversation": { "id": "conv-1" },
            "text": "hi"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_http_transport_delivery_failure_does_not_fail_turn() {
    let app = build_router(
        chain(),
        Transport::Http(Arc::new(HttpChannelAdapter::new())),
        None,
    );

    let response = app
        .oneshot(post_activity(json!({
            "type": "message",
            "conversation": { "id": "conv-1" },
            "text": "no service url"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_payload_is_bad_request() {
    let app = build_router(chain(), Transport::Emulator, None);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/messages")
                .body(Body::from("{ nope"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "INVALID_ACTIVITY");
}

#[tokio::test]
async fn test_failed_turn_sends_nothing_and_reports_state_unavailable() {
    let app = build_router(chain(), Transport::Emulator, None);

    let response = app
        .oneshot(post_activity(json!({
            "type": "message",
            "conversation": { "id": "conv-9" },
            "text": "fail"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "STATE_UNAVAILABLE");
    assert!(body.get("activities").is_none());
}

#[tokio::test]
async fn test_health() {
    let app = build_router(chain(), Transport::Emulator, None);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_admin_router_mounted_under_sdk_only_when_given() {
    let admin = Router::new().route("/status", get(|| async { "engine ok" }));

    let with_admin = build_router(chain(), Transport::Emulator, Some(admin));
    let response = with_admin
        .oneshot(Request::builder().uri("/sdk/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let without_admin = build_router(chain(), Transport::Emulator, None);
    let response = without_admin
        .oneshot(Request::builder().uri("/sdk/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
