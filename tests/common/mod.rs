//! Shared helpers for the integration tests: in-memory database setup, a fixed
//! test config, and request plumbing for the HTTP-level suites.

#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test;

use filebin::auth;
use filebin::config::Config;
use filebin::db::Db;
use filebin::file_service::UploadedFile;

pub const PASSWORD: &str = "correct-horse-battery";

pub fn test_config() -> Config {
    Config {
        jwt_secret: Some("integration-test-secret".into()),
        ..Config::default()
    }
}

pub async fn test_db() -> Db {
    Db::connect_and_migrate(":memory:")
        .await
        .expect("in-memory database init failed")
}

/// Insert a user directly, bypassing the HTTP layer. Returns the user id.
pub async fn create_user(db: &Db, email: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string();
    let hash = auth::hash_password(PASSWORD).expect("hash password");
    sqlx::query("INSERT INTO users(id, email, password_hash, created_at) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(email)
        .bind(&hash)
        .bind(chrono::Utc::now())
        .execute(&db.0)
        .await
        .expect("insert user");
    id
}

pub fn file(name: &str, data: &[u8]) -> UploadedFile {
    UploadedFile {
        filename: name.to_string(),
        data: data.to_vec(),
    }
}

pub async fn register<S, B>(app: &S, email: &str, password: &str) -> StatusCode
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(serde_json::json!({ "email": email, "password": password }))
        .to_request();
    test::call_service(app, req).await.status()
}

/// Register (ignoring an already-exists response) and log in, returning the
/// bearer token.
pub async fn login<S, B>(app: &S, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    register(app, email, PASSWORD).await;
    let req = test::TestRequest::post()
        .uri("/api/users/login")
        .set_json(serde_json::json!({ "email": email, "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK, "login should succeed");
    let body: serde_json::Value = test::read_body_json(resp).await;
    body["token"].as_str().expect("token in response").to_string()
}

pub const BOUNDARY: &str = "---------------------------filebintest";

/// Hand-built multipart/form-data body, one part per (filename, payload).
pub fn multipart_body(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (filename, data) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> (&'static str, String) {
    ("Content-Type", format!("multipart/form-data; boundary={BOUNDARY}"))
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}
