//! Multipart uploads against a mock HTTP server.

use std::time::Duration;

use pagecraft_uploader::{
    HttpTransport, RawFile, TransferError, TransferRequest, Transport, UploadQueue, UploadStatus,
    UploaderConfig,
};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(endpoint: String) -> TransferRequest {
    TransferRequest {
        endpoint,
        field_name: "file".to_owned(),
        headers: Default::default(),
        file: RawFile::new("test.png", "image/png", b"xyz".to_vec()),
    }
}

#[tokio::test]
async fn test_multipart_post_returns_json_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"test.png\""))
        .and(body_string_contains("xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "url": "dummy.url" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let payload = HttpTransport::new()
        .send(request(format!("{}/upload", mock_server.uri())))
        .await
        .expect("upload should succeed");

    assert_eq!(payload, json!({ "url": "dummy.url" }));
}

#[tokio::test]
async fn test_custom_field_name_and_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(header("authorization", "Bearer token"))
        .and(body_string_contains("name=\"attachment\""))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut req = request(format!("{}/upload", mock_server.uri()));
    req.field_name = "attachment".to_owned();
    req.headers
        .insert("authorization".to_owned(), "Bearer token".to_owned());

    let payload = HttpTransport::new()
        .send(req)
        .await
        .expect("upload should succeed");
    assert!(payload.is_null());
}

#[tokio::test]
async fn test_with_client_uses_the_given_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(header("user-agent", "pagecraft-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("stored"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = reqwest::Client::builder()
        .user_agent("pagecraft-test/1.0")
        .timeout(Duration::from_secs(5))
        .build()
        .expect("client should build");

    let payload = HttpTransport::with_client(client)
        .send(request(format!("{}/upload", mock_server.uri())))
        .await
        .expect("upload should succeed");

    // A plain-text answer is kept as a string.
    assert_eq!(payload, json!("stored"));
}

#[tokio::test]
async fn test_server_error_status_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&mock_server)
        .await;

    let result = HttpTransport::new()
        .send(request(format!("{}/upload", mock_server.uri())))
        .await;

    assert_eq!(
        result,
        Err(TransferError::Status {
            status: 500,
            body: "internal".to_owned()
        })
    );
}

#[tokio::test]
async fn test_errno_envelope_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errno": 1,
            "message": "file type not allowed",
            "data": null
        })))
        .mount(&mock_server)
        .await;

    let result = HttpTransport::new()
        .send(request(format!("{}/upload", mock_server.uri())))
        .await;

    assert!(matches!(result, Err(TransferError::Rejected { errno: 1, .. })));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_request_error() {
    let result = HttpTransport::new()
        .send(request("http://127.0.0.1:9/upload".to_owned()))
        .await;

    assert!(matches!(result, Err(TransferError::Request(_))));
}

#[tokio::test]
async fn test_queue_over_http_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(body_string_contains("filename=\"good.png\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errno": 0,
            "data": { "urls": ["https://cdn.example.com/good.png"] }
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(body_string_contains("filename=\"bad.png\""))
        .respond_with(ResponseTemplate::new(413).set_body_string("too large"))
        .mount(&mock_server)
        .await;

    let config = UploaderConfig::new(format!("{}/upload", mock_server.uri()));
    let mut queue = UploadQueue::with_http(config).expect("runtime is available");

    queue.intake([
        RawFile::new("good.png", "image/png", b"good".to_vec()),
        RawFile::new("bad.png", "image/png", b"bad".to_vec()),
    ]);
    assert!(queue.settle_for(Duration::from_secs(10)).await);

    let good = &queue.records()[0];
    assert_eq!(good.status(), UploadStatus::Success);
    assert_eq!(good.uploaded_url(), Some("https://cdn.example.com/good.png"));

    let bad = &queue.records()[1];
    assert_eq!(bad.status(), UploadStatus::Error);
    assert!(
        bad.error().is_some_and(|e| e.contains("413")),
        "error detail should mention the status: {:?}",
        bad.error()
    );
}
