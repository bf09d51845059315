//! Stores wired to the real HTTP client and file storage.

use std::sync::Arc;

use coursebook_core::api::ApiClient;
use coursebook_core::models::{Category, CourseChanges, CourseId};
use coursebook_core::storage::{FileStorage, KeyValueStorage};
use coursebook_core::store::{CourseStore, SessionStore, AUTH_DATA_KEY, LOAD_ERROR_MESSAGE, SAVE_ERROR_MESSAGE};
use coursebook_core::{LoadingIndicator, MessagesChannel};
use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

async fn mount_courses(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "payload": [
                {"id": 1, "description": "Second", "category": "BEGINNER", "seqNo": 2},
                {"id": 2, "description": "First", "category": "BEGINNER", "seqNo": 1},
                {"id": 3, "description": "Deep Dive", "category": "ADVANCED", "seqNo": 3}
            ]
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_course_store_over_http() {
    let server = MockServer::start().await;
    mount_courses(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/courses/3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = Arc::new(ApiClient::new(&server.uri()).unwrap());
    let store = CourseStore::new(client, LoadingIndicator::new(), MessagesChannel::new());
    store.wait_until_loaded().await;

    let beginners: Vec<String> = store
        .filter_by_category(Category::Beginner)
        .get()
        .iter()
        .map(|c| c.description.clone())
        .collect();
    assert_eq!(beginners, vec!["First", "Second"]);

    store
        .save_course(3, CourseChanges::new().description("Deeper Dive"))
        .unwrap()
        .wait()
        .await
        .unwrap();
    assert_eq!(
        store.course(&CourseId::from(3)).unwrap().description,
        "Deeper Dive"
    );
}

#[tokio::test]
async fn test_unreadable_entry_does_not_hide_the_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "payload": [
                {"id": 1, "description": "Intro", "category": "BEGINNER", "seqNo": 1},
                {"description": "Missing id", "category": "BEGINNER", "seqNo": 3},
                {"id": 2, "description": "No order", "category": "BEGINNER"},
                {"id": 3, "description": "Halfway", "category": "BEGINNER", "seqNo": 2.5}
            ]
        })))
        .mount(&server)
        .await;

    let messages = MessagesChannel::new();
    let mut errors = messages.subscribe();
    let client = Arc::new(ApiClient::new(&server.uri()).unwrap());
    let store = CourseStore::new(client, LoadingIndicator::new(), messages);
    store.wait_until_loaded().await;

    let beginners: Vec<String> = store
        .filter_by_category(Category::Beginner)
        .get()
        .iter()
        .map(|c| c.id.as_text())
        .collect();
    assert_eq!(beginners, vec!["2", "1", "3"]);
    assert!(errors.try_recv().is_none());
}

#[tokio::test]
async fn test_course_store_failures_reach_messages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/courses"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let messages = MessagesChannel::new();
    let mut errors = messages.subscribe();
    let client = Arc::new(ApiClient::new(&server.uri()).unwrap());
    let store = CourseStore::new(client, LoadingIndicator::new(), messages);
    store.wait_until_loaded().await;

    assert_eq!(errors.recv().await, Some(vec![LOAD_ERROR_MESSAGE.to_string()]));
    assert!(store.courses().is_empty());
    assert!(store.save_course(1, CourseChanges::new().promo(true)).is_err());
}

#[tokio::test]
async fn test_failed_save_over_http_keeps_edit() {
    let server = MockServer::start().await;
    mount_courses(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/courses/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let messages = MessagesChannel::new();
    let mut errors = messages.subscribe();
    let client = Arc::new(ApiClient::new(&server.uri()).unwrap());
    let store = CourseStore::new(client, LoadingIndicator::new(), messages);
    store.wait_until_loaded().await;

    let result = store
        .save_course(1, CourseChanges::new().description("Renamed"))
        .unwrap()
        .wait()
        .await;

    assert!(result.is_err());
    assert_eq!(errors.recv().await, Some(vec![SAVE_ERROR_MESSAGE.to_string()]));
    assert_eq!(store.course(&CourseId::from(1)).unwrap().description, "Renamed");
}

#[tokio::test]
async fn test_session_survives_restart_and_logout_clears_it() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "email": "test@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = Arc::new(ApiClient::new(&server.uri()).unwrap());

    let storage = Arc::new(FileStorage::new(dir.path().to_path_buf()).unwrap());
    let store = SessionStore::new(client.clone(), storage);
    store.login("test@example.com", "test").wait().await.unwrap();

    // A second store over the same directory restores without another request
    let storage = Arc::new(FileStorage::new(dir.path().to_path_buf()).unwrap());
    let restored = SessionStore::new(client.clone(), storage.clone());
    assert_eq!(
        restored.user().and_then(|u| u.email),
        Some("test@example.com".to_string())
    );

    restored.logout();
    assert_eq!(storage.get(AUTH_DATA_KEY).unwrap(), None);
    assert!(restored.is_logged_out().get());
}
