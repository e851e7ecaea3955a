//! OpenRouter client against a mock chat completions server.

use precis::{Config, LlmClient, LlmError, OpenRouterClient};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenRouterClient {
    let base = format!("{}/api/v1/", server.uri());
    let config = Config::from_lookup(|key| match key {
        "OPENROUTER_API_KEY" => Some("sk-test".into()),
        "LLM_MODEL_NAME" => Some("test/model".into()),
        "LLM_TEMPERATURE" => Some("0.5".into()),
        "OPENROUTER_BASE_URL" => Some(base.clone()),
        _ => None,
    })
    .unwrap();
    OpenRouterClient::new(&config).unwrap()
}

#[tokio::test]
async fn completion_text_is_returned_trimmed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "test/model",
            "temperature": 0.5,
            "messages": [{ "role": "user", "content": "Summarize this." }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "  A summary.\n" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.model(), "test/model");
    assert_eq!(client.complete("Summarize this.").await.unwrap(), "A summary.");
}

#[tokio::test]
async fn error_status_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let err = client_for(&server).complete("x").await.unwrap_err();
    match err {
        LlmError::Api { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "rate limited");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_choices_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = client_for(&server).complete("x").await.unwrap_err();
    assert!(matches!(err, LlmError::Parse(_)));
}

#[tokio::test]
async fn null_content_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": null } }]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).complete("x").await.unwrap_err();
    assert!(matches!(err, LlmError::Parse(_)));
}

#[tokio::test]
async fn non_json_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).complete("x").await.unwrap_err();
    assert!(matches!(err, LlmError::Parse(_)));
}
