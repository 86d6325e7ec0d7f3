use std::time::Duration;

use serde_json::json;
use sealcfg::error::SealError;
use sealcfg::models::{ConfigType, TypeInfo};
use sealcfg::storage::{ConfigStore, HttpConfigStore};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Run blocking store calls off the async runtime
async fn with_store<T, F>(server: &MockServer, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce(HttpConfigStore) -> T + Send + 'static,
{
    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let store = HttpConfigStore::new(&uri, Duration::from_secs(5)).unwrap();
        f(store)
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn get_all_returns_typed_values() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/rei/config/get_all"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"steps": 20, "HF_TOKEN": "hf_x"})),
        )
        .mount(&server)
        .await;

    let values = with_store(&server, |store| store.get_all()).await.unwrap();
    assert_eq!(values["steps"], json!(20));
    assert_eq!(values["HF_TOKEN"], json!("hf_x"));
}

#[tokio::test]
async fn get_types_accepts_objects_and_bare_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/rei/config/get_types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "OPENAI_KEY": {"type": "token", "encrypted": true},
            "steps": "integer",
            "pose": "keypoints"
        })))
        .mount(&server)
        .await;

    let types = with_store(&server, |store| store.get_types()).await.unwrap();
    assert_eq!(types["OPENAI_KEY"], TypeInfo::sealed_token());
    assert_eq!(types["steps"], TypeInfo::plain(ConfigType::Integer));
    assert!(!types.contains_key("pose"));
}

#[tokio::test]
async fn save_posts_form_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/rei/config/update"))
        .and(body_string_contains("key=OPENAI_KEY"))
        .and(body_string_contains("type=token"))
        .and(body_string_contains("encrypted=true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    with_store(&server, |store| {
        store.save("OPENAI_KEY", "AAEC+/==", TypeInfo::sealed_token())
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn server_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/rei/config/update"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Invalid integer value"})),
        )
        .mount(&server)
        .await;

    let err = with_store(&server, |store| {
        store.save("steps", "abc", TypeInfo::plain(ConfigType::Integer))
    })
    .await
    .unwrap_err();

    match err {
        SealError::Store { status, message } => {
            assert_eq!(status, Some(400));
            assert_eq!(message, "Invalid integer value");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn error_without_json_body_uses_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/rei/config/delete"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let err = with_store(&server, |store| store.delete("missing"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Store error (HTTP 404): HTTP 404");
}

#[test]
fn unreachable_server_is_a_store_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let store =
        HttpConfigStore::new(&format!("http://127.0.0.1:{}", port), Duration::from_secs(2)).unwrap();
    let err = store.get_all().unwrap_err();

    assert!(matches!(err, SealError::Store { status: None, .. }));
}
