mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::{login, signup, test_state, TEST_SECRET};
use pretty_assertions::assert_eq;
use serde_json::json;
use todo_api::auth::{MessageResponse, TokenManager, TokenResponse};
use todo_api::create_app;

#[actix_rt::test]
async fn test_signup_and_login_flow() {
    let state = test_state().await;
    let app = test::init_service(create_app(state.clone())).await;

    let resp = signup(&app, "integration_user", "Password123!").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: MessageResponse = test::read_body_json(resp).await;
    assert_eq!(body.message, "User created successfully");

    let resp = login(&app, "integration_user", "Password123!").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: TokenResponse = test::read_body_json(resp).await;
    assert!(!body.token.is_empty(), "Token should be a non-empty string");

    // Verifiable with the configured secret, and carries the stored user's id.
    let claims = TokenManager::new(TEST_SECRET, 24)
        .verify_token(&body.token)
        .expect("Token should verify with the configured secret");
    let user = state
        .db
        .find_user_by_username("integration_user")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);

    assert!(TokenManager::new("some-other-secret", 24)
        .verify_token(&body.token)
        .is_err());
}

#[actix_rt::test]
async fn test_duplicate_signup_is_rejected() {
    let app = test::init_service(create_app(test_state().await)).await;

    let resp = signup(&app, "twice", "Password123!").await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = signup(&app, "twice", "DifferentPassword!").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "User already exists");

    // The first password still works.
    let resp = login(&app, "twice", "Password123!").await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_password_is_stored_hashed() {
    let state = test_state().await;
    let app = test::init_service(create_app(state.clone())).await;

    signup(&app, "hashed_user", "Password123!").await;

    let user = state
        .db
        .find_user_by_username("hashed_user")
        .await
        .unwrap()
        .unwrap();
    assert!(user.password_hash != "Password123!");
    assert!(user.password_hash.starts_with("$2b$04$"));
}

#[actix_rt::test]
async fn test_invalid_login_inputs() {
    let app = test::init_service(create_app(test_state().await)).await;
    let resp = signup(&app, "login_test_user", "Password123!").await;
    assert!(resp.status().is_success(), "Setup: Failed to register test user");

    let test_cases = vec![
        (
            json!({ "username": "login_test_user", "password": "WrongPassword123!" }),
            StatusCode::BAD_REQUEST,
            "incorrect password",
        ),
        (
            json!({ "username": "nobody_here", "password": "Password123!" }),
            StatusCode::BAD_REQUEST,
            "non-existent user",
        ),
        (
            json!({ "password": "Password123!" }),
            StatusCode::BAD_REQUEST,
            "missing username",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&payload)
            .to_request();

        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body_bytes = test::read_body(resp).await;

        assert_eq!(
            status,
            expected_status,
            "Test case failed: {}. Body: {:?}",
            description,
            String::from_utf8_lossy(&body_bytes)
        );
    }

    // Unknown user and wrong password are indistinguishable.
    let wrong_password: serde_json::Value =
        test::read_body_json(login(&app, "login_test_user", "nope-nope").await).await;
    let unknown_user: serde_json::Value =
        test::read_body_json(login(&app, "nobody_here", "Password123!").await).await;
    assert_eq!(wrong_password, unknown_user);
    assert_eq!(wrong_password["error"], "Invalid credentials");
}

#[actix_rt::test]
async fn test_invalid_signup_inputs() {
    let app = test::init_service(create_app(test_state().await)).await;

    let test_cases = vec![
        (
            json!({ "password": "Password123!" }),
            StatusCode::BAD_REQUEST,
            "missing username",
        ),
        (
            json!({ "username": "testuser" }),
            StatusCode::BAD_REQUEST,
            "missing password",
        ),
        (
            json!({ "username": "u", "password": "Password123!" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "username too short",
        ),
        (
            json!({ "username": "user name!", "password": "Password123!" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "username with invalid chars",
        ),
        (
            json!({ "username": "testuser", "password": "123" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "password too short",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(&payload)
            .to_request();

        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: serde_json::Value = test::read_body_json(resp).await;

        assert_eq!(status, expected_status, "Test case failed: {}", description);
        assert!(body["error"].is_string(), "Error body for {}: {}", description, body);
    }
}

#[actix_rt::test]
async fn test_malformed_json_body() {
    let app = test::init_service(create_app(test_state().await)).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
}
