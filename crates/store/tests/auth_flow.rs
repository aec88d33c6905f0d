//! Tests for registration, login, logout, CSRF enforcement, and the
//! auth rate limiter.

mod common;

use axum::body::Body;
use axum::http::{Request, header};

use common::{
    body_string, csrf_from, get, login_admin, post_form, register_user, send, test_app,
};

#[tokio::test]
async fn test_register_then_account_page() {
    let app = test_app();
    let cookie = register_user(&app, "alice").await;

    let response = get(&app, "/account", Some(&cookie)).await;
    assert_eq!(response.status(), 200);

    let body = body_string(response).await;
    assert!(body.contains("alice"));
    assert!(body.contains("alice@example.com"));
    assert!(body.contains("No orders yet"));
}

#[tokio::test]
async fn test_login_wrong_password_redirects_with_error() {
    let app = test_app();
    register_user(&app, "bob").await;

    let (cookie, token) = csrf_from(&app, "/auth/login", None).await;
    let form = format!("username=bob&password=wrong-password&csrf_token={token}");
    let response = post_form(&app, "/auth/login", &form, Some(&cookie)).await;

    assert_eq!(response.status(), 303);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/auth/login?error=credentials"
    );
}

#[tokio::test]
async fn test_duplicate_username_rejected() {
    let app = test_app();
    register_user(&app, "carol").await;

    let (cookie, token) = csrf_from(&app, "/auth/register", None).await;
    let form = format!(
        "username=carol&email=other%40example.com&password=tr0ub4dor%26horse&password_confirm=tr0ub4dor%26horse&csrf_token={token}"
    );
    let response = post_form(&app, "/auth/register", &form, Some(&cookie)).await;

    assert_eq!(response.status(), 303);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/auth/register?error=username_taken"
    );
}

#[tokio::test]
async fn test_account_requires_login() {
    let app = test_app();
    let response = get(&app, "/account", None).await;

    assert_eq!(response.status(), 303);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/auth/login"
    );
}

#[tokio::test]
async fn test_api_requires_login_with_401() {
    let app = test_app();
    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/tokens")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    // API paths get a plain 401, not a redirect
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_login_rejects_wrong_csrf_token() {
    let app = test_app();
    register_user(&app, "dave").await;

    let (cookie, _token) = csrf_from(&app, "/auth/login", None).await;
    let form = "username=dave&password=tr0ub4dor%26horse&csrf_token=forged-token";
    let response = post_form(&app, "/auth/login", form, Some(&cookie)).await;

    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn test_admin_page_forbidden_for_users() {
    let app = test_app();
    let cookie = register_user(&app, "erin").await;

    let response = get(&app, "/admin/users", Some(&cookie)).await;
    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn test_admin_sees_user_list() {
    let app = test_app();
    register_user(&app, "frank").await;
    let cookie = login_admin(&app).await;

    let response = get(&app, "/admin/users", Some(&cookie)).await;
    assert_eq!(response.status(), 200);

    let body = body_string(response).await;
    assert!(body.contains("admin"));
    assert!(body.contains("frank"));
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = test_app();
    let cookie = register_user(&app, "grace").await;

    let (cookie, token) = csrf_from(&app, "/account", Some(&cookie)).await;
    let form = format!("csrf_token={token}");
    let response = post_form(&app, "/auth/logout", &form, Some(&cookie)).await;
    assert_eq!(response.status(), 303);

    let response = get(&app, "/account", Some(&cookie)).await;
    assert_eq!(response.status(), 303, "session should be gone");
}

#[tokio::test]
async fn test_auth_rate_limit_kicks_in() {
    let app = test_app();

    // Burst is 10; the same client IP eventually sees 429
    let mut limited = false;
    for _ in 0..15 {
        let response = send(
            &app,
            Request::builder()
                .uri("/auth/login")
                .header("x-forwarded-for", "198.51.100.77")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        if response.status() == 429 {
            limited = true;
            break;
        }
    }
    assert!(limited, "rate limiter never fired");
}
