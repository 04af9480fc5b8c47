//! Wire-level tests for `GeminiClient`.
//!
//! Each test starts a one-shot HTTP server on 127.0.0.1 that records the
//! request it receives and answers with a canned status and body.

use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use studykit_core::config::{LlmConfig, StudykitConfig};
use studykit_core::timetable::TimetableRequest;
use studykit_llm::{
    CompletionBackend, CompletionResult, GeminiClient, LlmError, PromptRequest, StudyAssistant,
};

const API_KEY: &str = "wire-test-key";

/// A request as seen by the fake server.
struct Captured {
    request_line: String,
    body: Value,
}

/// Serve exactly one response, returning the base URL and a handle that
/// yields the captured request.
async fn serve_once(status: u16, body: String) -> (String, JoinHandle<Captured>) {
    let declared_len = body.len();
    serve_with_length(status, body, declared_len).await
}

/// Like [`serve_once`], but announces `declared_len` as the Content-Length.
/// A length longer than `body` leaves the client with a truncated body.
async fn serve_with_length(
    status: u16,
    body: String,
    declared_len: usize,
) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");

        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let header_end = loop {
            let n = socket.read(&mut chunk).await.expect("read");
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = find(&buf, b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .find_map(|l| {
                let (name, value) = l.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.expect("read body");
            assert!(n > 0, "client closed mid-body");
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {declared_len}\r\nConnection: close\r\n\r\n{body}"
        );
        socket.write_all(response.as_bytes()).await.expect("write");
        socket.shutdown().await.ok();

        Captured {
            request_line: head.lines().next().unwrap_or_default().to_string(),
            body: serde_json::from_slice(&buf[header_end..header_end + content_length])
                .unwrap_or(Value::Null),
        }
    });

    (format!("http://{addr}"), handle)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn reply_with_text(text: &str) -> String {
    json!({
        "candidates": [
            { "content": { "role": "model", "parts": [ { "text": text } ] }, "finishReason": "STOP" }
        ]
    })
    .to_string()
}

/// Local test servers must be reached directly, whatever proxy the
/// environment sets.
fn direct_http() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().expect("http client")
}

fn client_for(base_url: &str) -> GeminiClient {
    let config = LlmConfig::default()
        .with_api_key(API_KEY)
        .with_base_url(base_url);
    GeminiClient::with_http_client(&config, direct_http()).expect("valid config")
}

// ---------------------------------------------------------------------------
// Request construction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn plain_request_targets_model_with_key() {
    let (url, server) = serve_once(200, reply_with_text("ok")).await;
    let client = client_for(&url);

    client.complete_text("Give me advice").await.expect("completion");
    let seen = server.await.expect("server task");

    assert!(seen.request_line.starts_with("POST /v1beta/models/gemini-2.0-flash:generateContent?"));
    assert!(seen.request_line.contains(&format!("key={API_KEY}")));
    assert_eq!(seen.body["contents"][0]["role"], "user");
    assert_eq!(seen.body["contents"][0]["parts"][0]["text"], "Give me advice");
    assert!(seen.body.get("generationConfig").is_none());
}

#[tokio::test]
async fn structured_request_sets_response_mime_type() {
    let (url, server) = serve_once(200, reply_with_text("[]")).await;
    let client = client_for(&url);

    client.complete_json("Quiz me").await.expect("completion");
    let seen = server.await.expect("server task");

    assert_eq!(seen.body["generationConfig"]["responseMimeType"], "application/json");
}

// ---------------------------------------------------------------------------
// Reply handling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn plain_text_is_returned_line_for_line() {
    let advice = "Here is my advice:\n* Start early\n- Review notes nightly\n  * keep going  \n";
    let (url, _server) = serve_once(200, reply_with_text(advice)).await;
    let client = client_for(&url);

    let request = PromptRequest::plain("SGPA advice please").expect("non-empty");
    let result = client.complete(&request).await.expect("completion");
    assert_eq!(result, CompletionResult::PlainText(advice.to_string()));
}

#[tokio::test]
async fn structured_text_is_parsed() {
    let (url, _server) = serve_once(200, reply_with_text(r#"{"Monday": []}"#)).await;
    let client = client_for(&url);

    let value = client.complete_json("timetable").await.expect("completion");
    assert_eq!(value, json!({ "Monday": [] }));
}

#[tokio::test]
async fn malformed_json_is_reported_with_raw_text() {
    let (url, _server) = serve_once(200, reply_with_text("Sure! Here is your quiz: [")).await;
    let client = client_for(&url);

    let err = client.complete_json("quiz").await.expect_err("malformed");
    match err {
        LlmError::MalformedOutput { raw, .. } => assert_eq!(raw, "Sure! Here is your quiz: ["),
        other => panic!("expected MalformedOutput, got {other:?}"),
    }
}

#[tokio::test]
async fn error_status_is_transport_error() {
    let body = r#"{"error":{"code":429,"message":"Resource has been exhausted"}}"#;
    let (url, _server) = serve_once(429, body.to_string()).await;
    let client = client_for(&url);

    let err = client.complete_text("advice").await.expect_err("rate limited");
    match err {
        LlmError::Transport { status, body: got } => {
            assert_eq!(status, Some(429));
            assert!(got.contains("Resource has been exhausted"));
        }
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn blocked_prompt_is_blocked_content() {
    let body = json!({
        "promptFeedback": {
            "blockReason": "SAFETY",
            "safetyRatings": [ { "category": "HARM_CATEGORY_HARASSMENT", "probability": "HIGH" } ]
        }
    })
    .to_string();
    let (url, _server) = serve_once(200, body).await;
    let client = client_for(&url);

    let err = client.complete_json("quiz").await.expect_err("blocked");
    assert!(matches!(err, LlmError::BlockedContent { ref reason, .. } if reason == "SAFETY"));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn missing_candidates_is_unexpected_shape() {
    let (url, _server) = serve_once(200, json!({ "usageMetadata": {} }).to_string()).await;
    let client = client_for(&url);

    let err = client.complete_text("advice").await.expect_err("no candidates");
    assert!(matches!(err, LlmError::UnexpectedShape(_)));
}

#[tokio::test]
async fn non_json_success_body_is_unexpected_shape() {
    let (url, _server) = serve_once(200, "<html>proxy error</html>".to_string()).await;
    let client = client_for(&url);

    let err = client.complete_text("advice").await.expect_err("html");
    assert!(matches!(err, LlmError::UnexpectedShape(_)));
}

#[tokio::test]
async fn unreachable_host_is_transport_error_without_status() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = client_for(&format!("http://{addr}"));
    let err = client.complete_text("advice").await.expect_err("refused");
    assert!(matches!(err, LlmError::Transport { status: None, .. }));
}

#[tokio::test]
async fn transport_errors_never_carry_the_api_key() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = client_for(&format!("http://{addr}"));
    let err = client.complete_text("advice").await.expect_err("refused");

    assert!(!err.to_string().contains(API_KEY), "key leaked: {err}");
    assert!(!format!("{err:?}").contains(API_KEY), "key leaked: {err:?}");
}

#[tokio::test]
async fn truncated_error_body_keeps_status() {
    let (url, _server) = serve_with_length(503, r#"{"error":"#.to_string(), 4096).await;
    let client = client_for(&url);

    let err = client.complete_text("advice").await.expect_err("truncated");
    match err {
        LlmError::Transport { status, body } => {
            assert_eq!(status, Some(503));
            assert!(!body.contains(API_KEY), "key leaked: {body}");
        }
        other => panic!("expected Transport, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// End to end through the assistant
// ---------------------------------------------------------------------------

#[tokio::test]
async fn assistant_generates_timetable_over_http() {
    let timetable = r#"{"Monday": [{"time": "09:00 - 10:00", "activity": "Maths"}], "Tuesday": []}"#;
    let (url, server) = serve_once(200, reply_with_text(timetable)).await;

    let mut config = StudykitConfig::default();
    config.llm = config.llm.with_api_key(API_KEY).with_base_url(&url);
    let client = GeminiClient::with_http_client(&config.llm, direct_http()).expect("valid config");
    let assistant = StudyAssistant::new(client, &config);

    let tt = assistant
        .generate_timetable(&TimetableRequest::new("Maths"))
        .await
        .expect("timetable");
    assert_eq!(tt.day_labels().collect::<Vec<_>>(), vec!["Monday", "Tuesday"]);

    let seen = server.await.expect("server task");
    assert_eq!(seen.body["generationConfig"]["responseMimeType"], "application/json");
}
