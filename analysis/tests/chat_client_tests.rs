//! Chat-completions client and generator against a local stub server.

use derma_analysis::{
    build_messages, canned_analysis, AnalysisConfig, AnalysisGenerator, AnalysisServiceError,
    ChatBackend, ChatCompletionClient, ChatRequest,
};
use derma_test_support::{closed_port_url, StubServer};
use reqwest::blocking::Client;
use std::time::Duration;

fn client(base_url: &str, timeout: Duration) -> ChatCompletionClient {
    let http = Client::builder().no_proxy().timeout(timeout).build().unwrap();
    ChatCompletionClient::with_client(http, base_url, "sk-test-0123456789abcdef")
}

fn request() -> ChatRequest {
    ChatRequest {
        model: "gpt-3.5-turbo".to_string(),
        messages: build_messages("acne", 0.85, "Use gentle cleanser twice daily"),
        max_tokens: 2000,
        temperature: 0.3,
    }
}

fn envelope(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-1",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
    .to_string()
}

#[test]
fn test_request_shape_and_content() {
    let server = StubServer::respond(200, &envelope("hello"));
    let client = client(&server.url, Duration::from_secs(5));

    assert_eq!(client.complete(&request()).unwrap(), "hello");

    let received = server.received();
    assert!(received.starts_with("POST /chat/completions"));
    assert!(received.contains("Bearer sk-test-0123456789abcdef"));
    assert!(received.contains("\"max_tokens\":2000"));
    assert!(received.contains("\"model\":\"gpt-3.5-turbo\""));
}

#[test]
fn test_status_error() {
    let server = StubServer::respond(401, r#"{"error": "bad key"}"#);
    let err = client(&server.url, Duration::from_secs(5)).complete(&request()).unwrap_err();
    assert!(matches!(err, AnalysisServiceError::Status(401)));
}

#[test]
fn test_envelope_without_choices() {
    let server = StubServer::respond(200, r#"{"choices": []}"#);
    let err = client(&server.url, Duration::from_secs(5)).complete(&request()).unwrap_err();
    assert!(matches!(err, AnalysisServiceError::MalformedResponse(_)));
}

#[test]
fn test_connection_refused() {
    let err = client(&closed_port_url(), Duration::from_secs(5))
        .complete(&request())
        .unwrap_err();
    assert!(matches!(err, AnalysisServiceError::Connection(_)));
}

#[test]
fn test_timeout_falls_back_to_canned() {
    let server = StubServer::respond_after(Duration::from_secs(3), 200, &envelope("late"));
    let backend = client(&server.url, Duration::from_millis(500));

    assert!(matches!(
        backend.complete(&request()),
        Err(AnalysisServiceError::Timeout)
    ));

    let server = StubServer::respond_after(Duration::from_secs(3), 200, &envelope("late"));
    let generator = AnalysisGenerator::with_backend(
        Box::new(client(&server.url, Duration::from_millis(500))),
        &AnalysisConfig::default(),
    );
    assert_eq!(
        generator.generate("acne", 0.85, "Use gentle cleanser twice daily"),
        canned_analysis("acne", "Use gentle cleanser twice daily", 0.85)
    );
}

#[test]
fn test_prose_reply_is_sectioned() {
    let prose = "1. OVERVIEW\nAcne affects hair follicles.\n\n2. DETECTION DETAILS\nComedones were visible.\n\n3. RECOMMENDATIONS\nCleanse gently.\n\n4. IMPORTANT NOTES\nThis is not a diagnosis.\n\n5. NEXT STEPS\nBook a dermatologist visit.";
    let server = StubServer::respond(200, &envelope(prose));
    let generator = AnalysisGenerator::with_backend(
        Box::new(client(&server.url, Duration::from_secs(5))),
        &AnalysisConfig::default(),
    );

    let analysis = generator.generate("acne", 0.85, "Use gentle cleanser twice daily");

    assert_eq!(analysis.overview, "Acne affects hair follicles.");
    assert_eq!(analysis.detection_details, "Comedones were visible.");
    assert_eq!(analysis.recommendations, "Cleanse gently.");
    assert_eq!(analysis.important_notes, "This is not a diagnosis.");
    assert_eq!(analysis.next_steps, "Book a dermatologist visit.");
}
