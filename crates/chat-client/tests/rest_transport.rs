//! `RestChatTransport` against a local `wiremock` server.

use cp_chat::{ChatRequest, ChatTransport, DoctorQuery, RestChatTransport, Role};
use cp_domain::config::ServiceConfig;
use cp_domain::error::Error;
use serde_json::json;
use wiremock::matchers::{body_json, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport_for(server: &MockServer) -> RestChatTransport {
    RestChatTransport::new(&ServiceConfig {
        base_url: format!("{}/", server.uri()),
        ..ServiceConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn chat_posts_query_and_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/rag/chat"))
        .and(header_exists("X-Trace-Id"))
        .and(body_json(json!({"query": "I have a headache", "session_id": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Rest and hydrate.",
            "session_id": "abc123",
            "conversation_context_used": false,
            "sources": ["medlineplus"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = transport_for(&server)
        .chat(ChatRequest {
            query: "I have a headache".into(),
            session_id: None,
        })
        .await
        .unwrap();

    assert_eq!(resp.response, "Rest and hydrate.");
    assert_eq!(resp.session_id, "abc123");
    assert_eq!(resp.sources, vec!["medlineplus".to_string()]);
}

#[tokio::test]
async fn non_success_status_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/rag/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal server error"))
        .mount(&server)
        .await;

    let err = transport_for(&server)
        .chat(ChatRequest {
            query: "hi".into(),
            session_id: Some("abc123".into()),
        })
        .await
        .unwrap_err();

    assert!(err.is_transport());
    match err {
        Error::Status { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal server error");
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn no_retry_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/rag/session/new"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    assert!(transport_for(&server).new_session().await.is_err());
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/rag/session/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = transport_for(&server).new_session().await.unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
    assert!(err.is_transport());
}

#[tokio::test]
async fn unreachable_service_is_an_http_error() {
    // Grab a free port, then close it so nothing is listening there.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let transport = RestChatTransport::new(&ServiceConfig {
        base_url: format!("http://127.0.0.1:{port}"),
        ..ServiceConfig::default()
    })
    .unwrap();

    let err = transport.health().await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
    assert!(err.is_transport());
}

#[tokio::test]
async fn new_session_returns_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/rag/session/new"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"session_id": "fresh", "message": "created"})),
        )
        .mount(&server)
        .await;

    let resp = transport_for(&server).new_session().await.unwrap();
    assert_eq!(resp.session_id, "fresh");
    assert_eq!(resp.extra["message"], json!("created"));
}

#[tokio::test]
async fn clear_ignores_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/rag/session/abc123/clear"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    transport_for(&server).clear_session("abc123").await.unwrap();
}

#[tokio::test]
async fn history_and_status_use_session_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/rag/session/abc123/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "abc123",
            "messages": [
                {"role": "user", "content": "I have a headache", "timestamp": "2024-05-01T10:15:30"},
                {"role": "assistant", "content": "Drink water.", "metadata": {"hasContext": true}}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/rag/session/abc123/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"exists": true})))
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    let history = transport.history("abc123").await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert!(history[0].parsed_timestamp().is_some());
    assert!(history[1].has_context());

    assert!(transport.status("abc123").await.unwrap().exists);
}

#[tokio::test]
async fn missing_messages_field_is_empty_history() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/rag/session/abc123/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let history = transport_for(&server).history("abc123").await.unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn health_reads_version() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "timestamp": 1714558530.5,
            "version": "2.0.0"
        })))
        .mount(&server)
        .await;

    let health = transport_for(&server).health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version.as_deref(), Some("2.0.0"));
}

#[tokio::test]
async fn predict_disease_posts_symptoms() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/predict-disease"))
        .and(body_json(json!({"symptoms": ["fever", "cough"]})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"disease": "Common Cold"})),
        )
        .mount(&server)
        .await;

    let value = transport_for(&server)
        .predict_disease(vec!["fever".into(), "cough".into()])
        .await
        .unwrap();
    assert_eq!(value["disease"], "Common Cold");
}

#[tokio::test]
async fn find_doctors_sends_location_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/find-doctors"))
        .and(query_param("speciality", "cardiology"))
        .and(query_param("lat", "12.97"))
        .and(query_param("lon", "77.59"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "doctors": [{"name": "Dr. Rao", "address": "MG Road", "phone": "123"}]
        })))
        .mount(&server)
        .await;

    let doctors = transport_for(&server)
        .find_doctors(DoctorQuery {
            speciality: "cardiology".into(),
            lat: 12.97,
            lon: 77.59,
        })
        .await
        .unwrap();

    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0].name, "Dr. Rao");
    assert_eq!(doctors[0].extra["phone"], json!("123"));
}

#[tokio::test]
async fn outbreak_alert_returns_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/outbreak-alert"))
        .and(query_param("lat", "12.97"))
        .and(query_param("lon", "77.59"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"alert": "Dengue cases rising in your area"})),
        )
        .mount(&server)
        .await;

    let alert = transport_for(&server)
        .outbreak_alert(12.97, 77.59)
        .await
        .unwrap();

    assert_eq!(alert.as_deref(), Some("Dengue cases rising in your area"));
}

#[tokio::test]
async fn outbreak_alert_null_or_missing_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/outbreak-alert"))
        .and(query_param("lat", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"alert": null})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/outbreak-alert"))
        .and(query_param("lat", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    assert_eq!(transport.outbreak_alert(1.0, 0.0).await.unwrap(), None);
    assert_eq!(transport.outbreak_alert(2.0, 0.0).await.unwrap(), None);
}
