//! UserClient against an embedded stub of the user directory.

use std::net::SocketAddr;

use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
use pretty_assertions::assert_eq;
use runnerz::{Error, User, UserClient};
use serde_json::{json, Value};

fn users() -> Value {
    json!([
        {
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "phone": "1-770-736-8031 x56442",
            "address": { "city": "Gwenborough" }
        },
        {
            "id": 2,
            "name": "Ervin Howell",
            "username": "Antonette",
            "email": "Shanna@melissa.tv"
        }
    ])
}

async fn user_by_id(Path(id): Path<i64>) -> Result<Json<Value>, StatusCode> {
    users()
        .as_array()
        .and_then(|all| all.iter().find(|u| u["id"] == id).cloned())
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Start a stub directory serving `/users` and `/users/{id}`.
async fn start_stub_directory() -> SocketAddr {
    let app = Router::new()
        .route("/users", get(|| async { Json(users()) }))
        .route("/users/{id}", get(user_by_id))
        .route("/bad/users", get(|| async { "definitely not json" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    addr
}

#[tokio::test]
async fn test_find_all_users() {
    let addr = start_stub_directory().await;
    let client = UserClient::new(&format!("http://{addr}/"));
    assert_eq!(client.base_url(), format!("http://{addr}"));

    let users = client.find_all().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(
        users[0],
        User {
            id: 1,
            name: "Leanne Graham".to_string(),
            username: "Bret".to_string(),
            email: "Sincere@april.biz".to_string(),
        }
    );
}

#[tokio::test]
async fn test_find_user_by_id() {
    let addr = start_stub_directory().await;
    let client = UserClient::new(&format!("http://{addr}"));

    let user = client.find_by_id(2).await.unwrap();
    assert_eq!(user.username, "Antonette");
    assert_eq!(user.email, "Shanna@melissa.tv");
}

#[tokio::test]
async fn test_missing_user_is_remote_error() {
    let addr = start_stub_directory().await;
    let client = UserClient::new(&format!("http://{addr}"));

    let err = client.find_by_id(42).await.unwrap_err();
    match err {
        Error::Remote(e) => assert_eq!(e.status(), Some(reqwest::StatusCode::NOT_FOUND)),
        other => panic!("expected remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_undecodable_payload_is_remote_error() {
    let addr = start_stub_directory().await;

    let err = UserClient::new(&format!("http://{addr}/bad"))
        .find_all()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Remote(_)));
}

#[tokio::test]
async fn test_unreachable_directory_is_remote_error() {
    // Bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = UserClient::new(&format!("http://{addr}"))
        .find_all()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Remote(_)));
}
