#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web};
use serde_json::json;
use todo_api::auth::{TokenManager, TokenResponse};
use todo_api::db::Database;
use todo_api::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

/// A fresh application context over an empty in-memory store.
///
/// bcrypt runs at its minimum cost to keep the suite fast.
pub async fn test_state() -> web::Data<AppState> {
    let db = Database::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to open in-memory store");
    web::Data::new(AppState::new(db, TokenManager::new(TEST_SECRET, 24), 4))
}

pub async fn signup(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
    password: &str,
) -> ServiceResponse<impl MessageBody> {
    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    test::call_service(app, req).await
}

pub async fn login(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
    password: &str,
) -> ServiceResponse<impl MessageBody> {
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    test::call_service(app, req).await
}

/// Signs a user up, logs in and returns the bearer token.
pub async fn signup_and_login(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
    password: &str,
) -> String {
    let resp = signup(app, username, password).await;
    assert!(resp.status().is_success(), "Setup: signup failed");

    let resp = login(app, username, password).await;
    assert!(resp.status().is_success(), "Setup: login failed");
    let body: TokenResponse = test::read_body_json(resp).await;
    body.token
}
