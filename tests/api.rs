use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use stadstuin::{
    ai::{MockChatClient, MockImageGenerationClient, OpenAiChatClient, OpenAiImageClient},
    api::{create_app, AppState},
    models::{Wish, DEFAULT_ALLOWED_ORIGINS},
};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHAT_PATH: &str = "/openai/deployments/gpt-4o/chat/completions";
const IMAGE_PATH: &str = "/openai/deployments/dall-e-3/images/generations";

fn default_origins() -> Vec<String> {
    DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect()
}

fn app_with(chat: Arc<MockChatClient>, image_gen: Arc<MockImageGenerationClient>) -> Router {
    create_app(AppState::new(chat, image_gen), &default_origins()).unwrap()
}

/// App wired to real upstream clients pointed at `server`.
fn app_for_upstream(server: &MockServer) -> Router {
    let chat = OpenAiChatClient::new(format!("{}{}", server.uri(), CHAT_PATH), "chat-key".into());
    let image_gen = OpenAiImageClient::new(
        format!("{}{}", server.uri(), IMAGE_PATH),
        "image-key".into(),
        "dall-e-3".into(),
    );
    create_app(
        AppState::new(Arc::new(chat), Arc::new(image_gen)),
        &default_origins(),
    )
    .unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_index_returns_identity() {
    let app = app_with(
        Arc::new(MockChatClient::new()),
        Arc::new(MockImageGenerationClient::new()),
    );

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Stadstuin Backend API");
}

#[tokio::test]
async fn test_build_prompt_returns_upstream_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "X" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for_upstream(&server);
    let (status, body) = send(
        &app,
        post_json("/build_prompt", r#"{"wishes":[{"name":"Iris","wish":"a pond"}]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "prompt": "X" }));
}

#[tokio::test]
async fn test_build_prompt_missing_choices_is_bad_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "cmpl-1" })))
        .mount(&server)
        .await;

    let app = app_for_upstream(&server);
    let (status, body) = send(&app, post_json("/build_prompt", r#"{"wishes":[]}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_build_prompt_upstream_failure_is_bad_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let app = app_for_upstream(&server);
    let (status, body) = send(&app, post_json("/build_prompt", r#"{"wishes":[]}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("500"));
}

#[tokio::test]
async fn test_build_prompt_passes_wishes_in_order() {
    let chat = Arc::new(MockChatClient::new().with_prompt_response("scene".to_string()));
    let app = app_with(chat.clone(), Arc::new(MockImageGenerationClient::new()));

    let (status, _) = send(
        &app,
        post_json(
            "/build_prompt",
            r#"{"wishes":[{"name":"A","wish":"one"},{"name":"B","wish":"two"}]}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, post_json("/build_prompt", "{}")).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(
        chat.received_wishes(),
        vec![
            vec![
                Wish {
                    name: "A".to_string(),
                    wish: "one".to_string(),
                },
                Wish {
                    name: "B".to_string(),
                    wish: "two".to_string(),
                },
            ],
            vec![],
        ]
    );
}

#[tokio::test]
async fn test_build_prompt_invalid_json_is_bad_request() {
    let chat = Arc::new(MockChatClient::new());
    let app = app_with(chat.clone(), Arc::new(MockImageGenerationClient::new()));

    let (status, body) = send(&app, post_json("/build_prompt", "{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(chat.get_call_count(), 0);
}

#[tokio::test]
async fn test_generate_image_requires_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = app_for_upstream(&server);

    for body in ["{}", r#"{"prompt":""}"#, r#"{"prompt":null}"#] {
        let (status, response) = send(&app, post_json("/generate_image", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({ "error": "Prompt is required" }));
    }
}

#[tokio::test]
async fn test_generate_image_returns_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(IMAGE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": [{ "url": "http://img" }] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for_upstream(&server);
    let (status, body) = send(
        &app,
        post_json("/generate_image", r#"{"prompt":"a garden by the gracht"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "imageUrl": "http://img" }));
}

#[tokio::test]
async fn test_generate_image_upstream_error_is_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(IMAGE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
        .mount(&server)
        .await;

    let app = app_for_upstream(&server);
    let (status, body) = send(&app, post_json("/generate_image", r#"{"prompt":"garden"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_request_does_not_affect_next_one() {
    let image_gen = Arc::new(
        MockImageGenerationClient::new()
            .with_failure("upstream down".to_string())
            .with_image_url("http://img/ok".to_string()),
    );
    let app = app_with(Arc::new(MockChatClient::new()), image_gen.clone());

    let (status, _) = send(&app, post_json("/generate_image", r#"{"prompt":"p"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, body) = send(&app, post_json("/generate_image", r#"{"prompt":"p"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "imageUrl": "http://img/ok" }));
    assert_eq!(image_gen.get_call_count(), 2);
}

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri("/build_prompt")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_cors_allows_whitelisted_origins() {
    let app = app_with(
        Arc::new(MockChatClient::new()),
        Arc::new(MockImageGenerationClient::new()),
    );

    for origin in DEFAULT_ALLOWED_ORIGINS {
        let response = app.clone().oneshot(preflight(origin)).await.unwrap();
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            origin
        );
    }
}

#[tokio::test]
async fn test_cors_rejects_other_origins() {
    let app = app_with(
        Arc::new(MockChatClient::new()),
        Arc::new(MockImageGenerationClient::new()),
    );

    let response = app
        .clone()
        .oneshot(preflight("http://evil.example"))
        .await
        .unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());

    let mut request = post_json("/generate_image", r#"{"prompt":"p"}"#);
    request
        .headers_mut()
        .insert(header::ORIGIN, "http://localhost:4000".parse().unwrap());
    let response = app.oneshot(request).await.unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[test]
fn test_invalid_origin_is_config_error() {
    let state = AppState::new(
        Arc::new(MockChatClient::new()),
        Arc::new(MockImageGenerationClient::new()),
    );
    let err = create_app(state, &["http://bad\norigin".to_string()]).unwrap_err();
    assert!(err.to_string().contains("CORS origin"));
}
