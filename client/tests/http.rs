use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::StreamExt;
use local_client::driver::{complete, run_basic_chat, run_streaming_chat};
use local_client::stream::content_fragments;
use local_client::{ChatCompletions, Client, ClientError};
use request::{ChatCompletionsRequest, Message};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

const API_KEY: &str = "test-key";

#[derive(Clone, Default)]
struct Seen {
    bodies: Arc<Mutex<Vec<Value>>>,
}

impl Seen {
    fn last(&self) -> Value {
        self.bodies.lock().unwrap().last().cloned().unwrap()
    }
}

fn sse_chunk(content: &str) -> String {
    let chunk = json!({
        "id": "chatcmpl-1",
        "object": "chat.completion.chunk",
        "created": 1_700_000_000,
        "model": "ai/smollm2",
        "choices": [{"index": 0, "delta": {"content": content}, "finish_reason": null}]
    });
    format!("data: {chunk}\n\n")
}

async fn chat_completions(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    seen.bodies.lock().unwrap().push(body.clone());

    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some("Bearer test-key");
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "invalid api key").into_response();
    }

    match body["model"].as_str() {
        Some("missing-model") => {
            return (StatusCode::NOT_FOUND, "model not found").into_response();
        }
        Some("garbage") => return "this is not json".into_response(),
        Some("loading") => {
            return Json(json!({"error": {"code": 503, "message": "model is loading"}}))
                .into_response();
        }
        Some("overflow") => {
            let mut events = sse_chunk("Once");
            events.push_str(
                "data: {\"error\":{\"code\":400,\"message\":\"context size exceeded\",\"type\":\"exceed_context_size_error\"}}\n\n",
            );
            events.push_str("data: [DONE]\n\n");
            return ([(header::CONTENT_TYPE, "text/event-stream")], events).into_response();
        }
        _ => {}
    }

    if body["stream"] == true {
        let mut events = String::from(": keep-alive\n\n");
        events.push_str("data: {\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\"}}]}\n\n");
        for fragment in ["Once", " upon", " a time"] {
            events.push_str(&sse_chunk(fragment));
        }
        events.push_str("data: [DONE]\n\n");
        return ([(header::CONTENT_TYPE, "text/event-stream")], events).into_response();
    }

    Json(json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": body["model"],
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "Hello from the fake server"},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 5, "completion_tokens": 5, "total_tokens": 10}
    }))
    .into_response()
}

async fn models(headers: HeaderMap) -> Response {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some("Bearer test-key");
    if !authorized {
        return StatusCode::FORBIDDEN.into_response();
    }
    Json(json!({"object": "list", "data": [{"id": "ai/smollm2", "object": "model"}]}))
        .into_response()
}

async fn spawn_server() -> (String, Seen) {
    let seen = Seen::default();
    let app = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .route("/v1/models", get(models))
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/v1"), seen)
}

fn hello(model: &str) -> ChatCompletionsRequest {
    ChatCompletionsRequest::builder(model)
        .message(Message::user("Hello! How are you?"))
        .build()
}

#[tokio::test]
async fn create_returns_first_choice_content() {
    let (base_url, seen) = spawn_server().await;
    let client = Client::new(&base_url, API_KEY);

    let content = complete(&client, &hello("ai/smollm2")).await.unwrap();

    assert_eq!(content, "Hello from the fake server");
    let body = seen.last();
    assert_eq!(body["model"], "ai/smollm2");
    assert_eq!(
        body["messages"],
        json!([{"role": "user", "content": "Hello! How are you?"}])
    );
    assert!(body.get("temperature").is_none());
    assert!(body.get("stream").is_none());
}

#[tokio::test]
async fn create_tolerates_trailing_slash_in_base_url() {
    let (base_url, _) = spawn_server().await;
    let client = Client::new(&format!("{base_url}/"), API_KEY);

    let response = client.create(&hello("ai/smollm2")).await.unwrap();
    assert_eq!(response.usage.map(|u| u.total_tokens), Some(10));
}

#[tokio::test]
async fn rejected_key_is_authentication_error() {
    let (base_url, _) = spawn_server().await;
    let client = Client::new(&base_url, "wrong-key");

    let err = client.create(&hello("ai/smollm2")).await.unwrap_err();

    match err {
        ClientError::Authentication { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(body, "invalid api key");
        }
        other => panic!("expected authentication error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_status_is_api_error() {
    let (base_url, _) = spawn_server().await;
    let client = Client::new(&base_url, API_KEY);

    let err = client.create(&hello("missing-model")).await.unwrap_err();

    match err {
        ClientError::Api { status, body } => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(body, "model not found");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_malformed_response() {
    let (base_url, _) = spawn_server().await;
    let client = Client::new(&base_url, API_KEY);

    let err = client.create(&hello("garbage")).await.unwrap_err();
    assert!(matches!(err, ClientError::MalformedResponse(_)));
}

#[tokio::test]
async fn error_body_with_success_status_is_server_error() {
    let (base_url, _) = spawn_server().await;
    let client = Client::new(&base_url, API_KEY);

    let err = client.create(&hello("loading")).await.unwrap_err();

    match err {
        ClientError::Server(message) => assert_eq!(message, "model is loading"),
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn refused_connection_is_connection_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = Client::new(&format!("http://{addr}/v1"), API_KEY);

    let err = client.create(&hello("ai/smollm2")).await.unwrap_err();
    assert!(matches!(err, ClientError::Connection(_)));
}

#[tokio::test]
async fn non_http_base_url_is_invalid_config() {
    let client = Client::new("ftp://localhost/v1", API_KEY);

    let err = client.create(&hello("ai/smollm2")).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidConfig(_)));
}

#[tokio::test]
async fn create_stream_yields_fragments_in_order() {
    let (base_url, seen) = spawn_server().await;
    let client = Client::new(&base_url, API_KEY);

    let chunks = client.create_stream(&hello("ai/smollm2")).await.unwrap();
    let fragments: Vec<String> = content_fragments(chunks)
        .map(|f| f.unwrap())
        .collect()
        .await;

    assert_eq!(fragments, vec!["Once", " upon", " a time"]);
    assert_eq!(seen.last()["stream"], true);
}

#[tokio::test]
async fn streaming_chat_reports_error_event_mid_stream() {
    let (base_url, _) = spawn_server().await;
    let client = Client::new(&base_url, API_KEY);
    let mut out = Vec::new();

    run_streaming_chat(&client, "overflow", "Tell me a long story.", &mut out)
        .await
        .unwrap();

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.starts_with("\n--- Streaming Response ---\nOnce"));
    assert!(printed.contains(
        "An error occurred: server reported an error: context size exceeded (exceed_context_size_error)"
    ));
    assert!(!printed.contains("End of Stream"));
}

#[tokio::test]
async fn create_stream_surfaces_status_before_streaming() {
    let (base_url, _) = spawn_server().await;
    let client = Client::new(&base_url, "wrong-key");

    let err = client
        .create_stream(&hello("ai/smollm2"))
        .await
        .err()
        .expect("stream should not open");
    assert!(matches!(err, ClientError::Authentication { .. }));
}

#[tokio::test]
async fn ping_checks_models_endpoint() {
    let (base_url, _) = spawn_server().await;

    Client::new(&base_url, API_KEY).ping().await.unwrap();

    let err = Client::new(&base_url, "wrong-key").ping().await.unwrap_err();
    assert!(matches!(err, ClientError::Authentication { .. }));
}

#[tokio::test]
async fn basic_chat_end_to_end() {
    let (base_url, seen) = spawn_server().await;
    let client = Client::new(&base_url, API_KEY);
    let mut out = Vec::new();

    run_basic_chat(&client, "ai/smollm2", "Hello! How are you?", &mut out)
        .await
        .unwrap();

    let printed = String::from_utf8(out).unwrap();
    assert_eq!(
        printed,
        "Sending request to local model...\nResponse from model:\nHello from the fake server\n"
    );
    assert_eq!(seen.bodies.lock().unwrap().len(), 1);
}
