//! End-to-end tests of RequestClient over a real HTTP socket

use std::time::Duration;

use futures::future::join_all;
use serde_json::json;
use tryeino_client::{
    error::NETWORK_ERROR_MESSAGE, ApiError, ChatAnswer, ClientConfig, RequestClient, StatusCode,
};
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn client_for(server: &MockServer) -> RequestClient {
    let config = ClientConfig::new().with_base_url(format!("{}/api", server.uri()));
    RequestClient::new(config).unwrap()
}

#[tokio::test]
async fn test_upload_document_returns_parsed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/documents"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"title": "T", "content": "C"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Document uploaded successfully",
            "chunks": 1,
            "title": "T"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server).upload_document("T", "C").await.unwrap();

    assert_eq!(
        reply,
        json!({
            "message": "Document uploaded successfully",
            "chunks": 1,
            "title": "T"
        })
    );
}

#[tokio::test]
async fn test_reply_extra_fields_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "question": "q",
            "answer": "a",
            "sources": ["doc1"]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/documents"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "ok", "chunks": 1})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);

    let reply = client.ask_question("q").await.unwrap();
    assert_eq!(reply, json!({"question": "q", "answer": "a", "sources": ["doc1"]}));

    let reply = client.upload_document("T", "C").await.unwrap();
    assert_eq!(reply, json!({"message": "ok", "chunks": 1}));
}

#[tokio::test]
async fn test_blank_server_text_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "  "})))
        .mount(&server)
        .await;

    let err = client_for(&server).ask_question("q").await.unwrap_err();

    assert_eq!(err.message(), "  ");
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(err.data(), Some(&json!({"error": "  "})));
}

#[tokio::test]
async fn test_status_mapping_without_error_field() {
    let cases = [
        (400, "invalid request parameters"),
        (500, "internal server error"),
        (502, "gateway error"),
        (503, "service unavailable"),
        (504, "request timed out"),
    ];

    for (code, expected) in cases {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/documents"))
            .respond_with(ResponseTemplate::new(code).set_body_json(json!({})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .upload_document("T", "C")
            .await
            .unwrap_err();

        assert_eq!(err.message(), expected, "status {code}");
        assert_eq!(err.status(), Some(StatusCode::from_u16(code).unwrap()));
        assert_eq!(err.data(), Some(&json!({})));
    }
}

#[tokio::test]
async fn test_server_error_text_used_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Invalid request format"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).ask_question("").await.unwrap_err();

    assert_eq!(err.message(), "Invalid request format");
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn test_unmapped_status_with_plain_text_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(404).set_body_string("404 page not found"))
        .mount(&server)
        .await;

    let err = client_for(&server).ask_question("hello").await.unwrap_err();

    assert_eq!(err.message(), "request failed (status 404)");
    assert_eq!(err.data(), Some(&json!("404 page not found")));
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"question": "q", "answer": "a"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig::new()
        .with_base_url(format!("{}/api", server.uri()))
        .with_timeout(Duration::from_millis(100));
    let client = RequestClient::new(config).unwrap();

    let err = client.ask_question("q").await.unwrap_err();

    assert!(err.is_network_error());
    assert!(matches!(err, ApiError::Network { timed_out: true, .. }));
    assert_eq!(err.message(), NETWORK_ERROR_MESSAGE);
    assert!(err.status().is_none());
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Reserve a port, then release it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}/api", listener.local_addr().unwrap());
    drop(listener);

    let client = RequestClient::new(ClientConfig::new().with_base_url(base_url)).unwrap();
    let err = client.upload_document("T", "C").await.unwrap_err();

    assert!(matches!(err, ApiError::Network { timed_out: false, .. }));
}

#[tokio::test]
async fn test_check_connection_true_for_any_2xx() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({"question": "test"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client_for(&server).check_connection().await);
}

#[tokio::test]
async fn test_check_connection_false_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .mount(&server)
        .await;

    assert!(!client_for(&server).check_connection().await);
}

#[tokio::test]
async fn test_check_connection_false_for_relative_base() {
    let client = RequestClient::new(ClientConfig::default()).unwrap();
    assert!(!client.check_connection().await);
}

#[tokio::test]
async fn test_concurrent_questions_do_not_cross() {
    let server = MockServer::start().await;
    let questions = ["alpha", "beta", "gamma", "delta"];

    for question in questions {
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_json(json!({"question": question})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "question": question,
                        "answer": format!("re: {question}")
                    }))
                    .set_delay(Duration::from_millis(20)),
            )
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    let replies = join_all(questions.iter().map(|q| client.ask_question(q))).await;

    for (question, reply) in questions.iter().zip(replies) {
        let ChatAnswer {
            question: echoed,
            answer,
        } = serde_json::from_value(reply.unwrap()).unwrap();
        assert_eq!(echoed, *question);
        assert_eq!(answer, format!("re: {question}"));
    }
}
