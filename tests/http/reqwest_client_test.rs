//! `ReqwestHttpClient` against a one-shot local HTTP server.

use std::sync::Arc;

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use batchbook_bridge::http::{sanitize_error_body, HttpClient, HttpError, ReqwestHttpClient};

/// Serve a single response and hand back the raw request that was received.
async fn serve_once(status_line: &str, body: &str) -> (String, oneshot::Receiver<String>) {
    let listener = match TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(err) => panic!("listener should bind: {err}"),
    };
    let addr = match listener.local_addr() {
        Ok(addr) => addr,
        Err(err) => panic!("listener should expose local addr: {err}"),
    };

    let (tx, rx) = oneshot::channel();
    let status_line_owned = status_line.to_owned();
    let body_owned = body.to_owned();
    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let request = read_request(&mut socket).await;

            let response = format!(
                "HTTP/1.1 {status_line_owned}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body_owned}",
                body_owned.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = tx.send(request);
        }
    });

    (format!("http://{addr}/api/v1/people.json"), rx)
}

/// Read headers plus `Content-Length` bytes of body.
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut raw = Vec::new();
    let mut chunk = [0_u8; 1024];
    loop {
        let read = socket.read(&mut chunk).await.unwrap_or(0);
        if read == 0 {
            break;
        }
        raw.extend_from_slice(&chunk[..read]);

        let text = String::from_utf8_lossy(&raw).into_owned();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if raw.len() >= header_end.saturating_add(4).saturating_add(content_length) {
                break;
            }
        }
    }
    String::from_utf8_lossy(&raw).into_owned()
}

#[tokio::test]
async fn get_sends_query_and_decodes_json() {
    let (url, request_rx) = serve_once("200 OK", r#"{"total":0,"people":[]}"#).await;
    let client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());

    let response = match client
        .get(&url, &[("auth_token", "tok"), ("email", "a@x.com")])
        .await
    {
        Ok(response) => response,
        Err(err) => panic!("request should complete: {err}"),
    };
    assert!(response.is_success());
    assert_eq!(response.body, json!({"total": 0, "people": []}));

    let request = request_rx.await.unwrap_or_default();
    assert!(request.starts_with("GET /api/v1/people.json?auth_token=tok&email=a%40x.com "));
}

#[tokio::test]
async fn post_sends_json_body() {
    let (url, request_rx) = serve_once("201 Created", r#"{"person":{"id":1}}"#).await;
    let client = ReqwestHttpClient::new();

    let payload = json!({"person": {"first_name": "Jane"}});
    let response = match client.post(&url, &[("auth_token", "tok")], &payload).await {
        Ok(response) => response,
        Err(err) => panic!("request should complete: {err}"),
    };
    assert_eq!(response.status, 201);
    assert_eq!(response.body["person"]["id"], 1);

    let request = request_rx.await.unwrap_or_default();
    assert!(request.starts_with("POST /api/v1/people.json?auth_token=tok "));
    assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
    assert!(request.ends_with(r#"{"person":{"first_name":"Jane"}}"#));
}

#[tokio::test]
async fn error_status_is_returned_not_raised() {
    let (url, _request_rx) = serve_once("401 Unauthorized", "not json").await;
    let client = ReqwestHttpClient::new();

    let response = match client.get(&url, &[("auth_token", "tok")]).await {
        Ok(response) => response,
        Err(err) => panic!("status errors are not transport errors: {err}"),
    };
    assert!(!response.is_success());
    assert_eq!(response.status, 401);
    assert_eq!(response.body, json!("not json"));
}

#[tokio::test]
async fn connection_failure_hides_token() {
    // Bind then drop to get a port with nothing listening.
    let addr = match TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => match listener.local_addr() {
            Ok(addr) => addr,
            Err(err) => panic!("listener should expose local addr: {err}"),
        },
        Err(err) => panic!("listener should bind: {err}"),
    };
    let client = ReqwestHttpClient::new();
    let result = client
        .get(&format!("http://{addr}/people.json"), &[("auth_token", "very-secret")])
        .await;

    let err = match result {
        Err(err) => err,
        Ok(response) => panic!("nothing is listening, got {response:?}"),
    };
    assert!(matches!(err, HttpError::Request(_)));
    assert!(!err.to_string().contains("very-secret"));
}

#[test]
fn sanitize_redacts_and_truncates() {
    let body = format!("failed for auth_token=abc123&x=1 secret-value {}", "x".repeat(400));
    let sanitized = sanitize_error_body(&body, "secret-value");
    assert!(!sanitized.contains("abc123"));
    assert!(!sanitized.contains("secret-value"));
    assert!(sanitized.starts_with("failed for auth_token=[REDACTED]&x=1 [REDACTED] "));
    assert!(sanitized.ends_with("...[truncated]"));
}

#[test]
fn sanitize_ignores_short_literal_secret() {
    let sanitized = sanitize_error_body("a bad request at /people.json?auth_token=a", "a");
    assert_eq!(sanitized, "a bad request at /people.json?auth_token=[REDACTED]");
}

#[test]
fn sanitize_collapses_whitespace() {
    assert_eq!(sanitize_error_body("  bad\n\n  request\t", ""), "bad request");
}
