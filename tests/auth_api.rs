mod common;

use std::time::Duration;

use axum::http::{Method, StatusCode};
use serde_json::json;
use student_portal::api::rate_limit::RateLimitConfig;

use common::{test_app, test_app_with_limits};

fn registration(hallticketnumber: &str, username: &str, email: &str) -> serde_json::Value {
    json!({
        "name": "John Doe",
        "username": username,
        "email": email,
        "phone": "9876543210",
        "branch": "CSE",
        "hallticketnumber": hallticketnumber,
        "password": "secret1"
    })
}

#[tokio::test]
async fn register_stores_a_salted_hash() {
    let app = test_app().await;

    let res = app
        .post(
            "/api/auth/register",
            registration("CSE20251", "johndoe", "john@example.com"),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["message"], "Registration successful");
    assert!(res.body["data"]["userId"].as_i64().unwrap() > 0);

    let user = app.repo.find_user("CSE20251").await.unwrap().unwrap();
    assert_ne!(user.password_hash, "secret1");
    assert!(user.password_hash.starts_with("$2"));
}

#[tokio::test]
async fn duplicate_hall_ticket_is_a_conflict() {
    let app = test_app().await;
    app.post(
        "/api/auth/register",
        registration("CSE20251", "johndoe", "john@example.com"),
    )
    .await;

    let res = app
        .post(
            "/api/auth/register",
            registration("CSE20251", "someoneelse", "other@example.com"),
        )
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["success"], false);
    assert_eq!(
        res.body["message"],
        "User already exists with this email, username, or hall ticket number"
    );
    assert_eq!(app.repo.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn invalid_registration_lists_every_field() {
    let app = test_app().await;

    let res = app
        .post(
            "/api/auth/register",
            json!({ "name": "", "username": "x", "email": "not-an-email", "password": "123" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["success"], false);

    let messages: Vec<&str> = res.body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["message"].as_str().unwrap())
        .collect();
    assert_eq!(
        messages,
        [
            "Name is required",
            "Valid email is required",
            "Phone number is required",
            "Branch is required",
            "Hall ticket number is required",
            "Password must be at least 6 characters",
        ]
    );
    assert_eq!(app.repo.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn malformed_json_gets_the_envelope() {
    let app = test_app().await;
    let res = app
        .send(Method::POST, "/api/auth/login", Some(json!("just a string")), None)
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["success"], false);
    assert!(res.body["message"].is_string());
}

#[tokio::test]
async fn unknown_hall_ticket_cannot_log_in() {
    let app = test_app().await;
    app.add_student("CSE20251", "CSE").await;

    for password in ["password123", "anything"] {
        let res = app
            .post(
                "/api/auth/login",
                json!({ "hallticketnumber": "CSE99999", "password": password }),
            )
            .await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED);
        assert_eq!(res.body["message"], "Invalid credentials");
    }

    let res = app
        .post(
            "/api/auth/login",
            json!({ "hallticketnumber": "CSE20251", "password": "wrong-password" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_session_and_logout() {
    let app = test_app().await;
    app.add_student("CSE20251", "CSE").await;

    let res = app
        .post(
            "/api/auth/login",
            json!({ "hallticketnumber": "CSE20251", "password": "password123" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Login successful");
    let user = &res.body["data"]["user"];
    assert_eq!(user["hallticketnumber"], "CSE20251");
    assert!(user.get("password_hash").is_none());

    let cookie = res.cookie.expect("login sets a session cookie");
    assert!(cookie.starts_with("id="));

    let res = app
        .send(Method::GET, "/api/auth/session", None, Some(&cookie))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["user"]["hallticketnumber"], "CSE20251");

    let res = app
        .send(Method::POST, "/api/auth/logout", None, Some(&cookie))
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app
        .send(Method::GET, "/api/auth/session", None, Some(&cookie))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_without_login_is_unauthorized() {
    let app = test_app().await;
    let res = app.get("/api/auth/session").await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["success"], false);
}

#[tokio::test]
async fn update_password_checks_the_old_one() {
    let app = test_app().await;
    app.add_student("CSE20251", "CSE").await;

    let res = app
        .put(
            "/api/auth/update-password",
            json!({
                "hallticketnumber": "CSE20251",
                "email": "cse20251@example.com",
                "oldPassword": "not-it",
                "newPassword": "newpass1"
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app
        .put(
            "/api/auth/update-password",
            json!({
                "hallticketnumber": "CSE20251",
                "email": "someone@example.com",
                "oldPassword": "password123",
                "newPassword": "newpass1"
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app
        .put(
            "/api/auth/update-password",
            json!({
                "hallticketnumber": "CSE20251",
                "email": "cse20251@example.com",
                "oldPassword": "password123",
                "newPassword": "short"
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.body["errors"][0]["message"],
        "New password must be at least 6 characters"
    );

    let res = app
        .put(
            "/api/auth/update-password",
            json!({
                "hallticketnumber": "CSE20251",
                "email": "cse20251@example.com",
                "oldPassword": "password123",
                "newPassword": "newpass1"
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Password updated successfully");

    let res = app
        .post(
            "/api/auth/login",
            json!({ "hallticketnumber": "CSE20251", "password": "newpass1" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn forgot_password_needs_matching_email() {
    let app = test_app().await;
    app.add_student("CSE20251", "CSE").await;

    let res = app
        .post(
            "/api/auth/forgot-password",
            json!({
                "hallticketnumber": "CSE20251",
                "email": "wrong@example.com",
                "newPassword": "reset123"
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["message"], "User not found");

    let res = app
        .post(
            "/api/auth/forgot-password",
            json!({
                "hallticketnumber": "CSE20251",
                "email": "cse20251@example.com",
                "newPassword": "reset123"
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Password reset successfully");

    let res = app
        .post(
            "/api/auth/login",
            json!({ "hallticketnumber": "CSE20251", "password": "reset123" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn api_requests_beyond_the_budget_are_rejected() {
    let app = test_app_with_limits(RateLimitConfig {
        max_requests: 3,
        window: Duration::from_secs(900),
        ..Default::default()
    })
    .await;

    for _ in 0..3 {
        assert_eq!(app.get("/api/notifications").await.status, StatusCode::OK);
    }
    let res = app.get("/api/notifications").await;
    assert_eq!(res.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(res.body["success"], false);
    assert_eq!(
        res.body["message"],
        "Too many requests from this IP, please try again later"
    );

    assert_eq!(app.get("/health").await.status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_api_paths_count_against_the_budget() {
    let app = test_app_with_limits(RateLimitConfig {
        max_requests: 1,
        window: Duration::from_secs(900),
        ..Default::default()
    })
    .await;

    assert_eq!(app.get("/api/notifications").await.status, StatusCode::OK);
    assert_eq!(
        app.get("/api/notifications").await.status,
        StatusCode::TOO_MANY_REQUESTS
    );
    for _ in 0..3 {
        let res = app.get("/api/does-not-exist").await;
        assert_eq!(res.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(res.body["success"], false);
    }

    // Paths outside /api stay unmetered.
    assert_eq!(app.get("/nowhere").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_api_path_within_budget_is_not_found() {
    let app = test_app_with_limits(RateLimitConfig {
        max_requests: 2,
        window: Duration::from_secs(900),
        ..Default::default()
    })
    .await;

    let res = app.get("/api/does-not-exist").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["message"], "Route not found");
    assert_eq!(app.get("/api/notifications").await.status, StatusCode::OK);
    assert_eq!(
        app.get("/api/notifications").await.status,
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[tokio::test]
async fn health_reports_version() {
    let app = test_app().await;
    let res = app.get("/health").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "ok");
    assert_eq!(res.body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = test_app().await;
    let res = app.get("/api/nowhere").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["success"], false);
}
