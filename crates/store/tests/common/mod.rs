//! Shared helpers for driving the full router in-process.

// Not every test binary uses every helper
#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use secrecy::SecretString;
use tower::ServiceExt;

use emporium_core::Email;
use emporium_store::config::Config;
use emporium_store::routes;
use emporium_store::state::AppState;

/// Admin password used by test apps. High entropy so config-style
/// validation would accept it too.
pub const ADMIN_PASSWORD: &str = "uJ7#pQ2$wX9!kL4@sD8%fG1^";

/// Build a config without touching the environment.
pub fn test_config() -> Config {
    let upload_dir = std::env::temp_dir().join(format!("emporium-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&upload_dir).expect("create upload dir");

    Config {
        host: "127.0.0.1".parse().expect("valid ip"),
        port: 0,
        base_url: "http://localhost:5001".to_string(),
        admin_password: SecretString::from(ADMIN_PASSWORD),
        admin_email: Email::parse("admin@emporium.test").expect("valid email"),
        token_secret: SecretString::from("Zr8kXm2qPv9wLn4tYc6hBd1sFg3jUa5e"),
        // Tests run with the crate directory as cwd
        docs_dir: "content/docs".into(),
        static_dir: "static".into(),
        upload_dir,
        allowed_origins: vec!["http://partner.emporium.test".to_string()],
        fetch_allowed_hosts: vec![],
    }
}

/// Build the full application with a fresh state.
pub fn test_app() -> Router {
    let state = AppState::new(test_config()).expect("state init");
    routes::app(state)
}

/// Send one request through the router.
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("infallible")
}

/// GET with an optional session cookie.
pub async fn get(app: &Router, path: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::empty()).expect("request")).await
}

/// POST a urlencoded form with an optional session cookie.
pub async fn post_form(
    app: &Router,
    path: &str,
    form: &str,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::from(form.to_string())).expect("request")).await
}

/// Collect a response body to a string.
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Pull the session cookie pair out of a Set-Cookie header, if any.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

/// Extract the CSRF token from a rendered hidden form field.
pub fn extract_csrf(html: &str) -> String {
    let marker = r#"name="csrf_token" value=""#;
    let start = html.find(marker).expect("csrf field present") + marker.len();
    let end = html[start..].find('"').expect("csrf value closed") + start;
    html[start..end].to_string()
}

/// Fetch a page that carries a CSRF form and return (cookie, token).
///
/// Uses the response's cookie when the request had none.
pub async fn csrf_from(app: &Router, path: &str, cookie: Option<&str>) -> (String, String) {
    let response = get(app, path, cookie).await;
    let cookie = session_cookie(&response)
        .or_else(|| cookie.map(str::to_string))
        .expect("session cookie");
    let token = extract_csrf(&body_string(response).await);
    (cookie, token)
}

/// Register a user and return their logged-in session cookie.
pub async fn register_user(app: &Router, username: &str) -> String {
    let (cookie, token) = csrf_from(app, "/auth/register", None).await;
    let form = format!(
        "username={username}&email={username}%40example.com&password=tr0ub4dor%26horse&password_confirm=tr0ub4dor%26horse&csrf_token={token}"
    );
    let response = post_form(app, "/auth/register", &form, Some(&cookie)).await;
    assert_eq!(response.status(), 303, "registration should redirect");
    assert_eq!(
        response.headers().get(header::LOCATION).map(|v| v.to_str().unwrap()),
        Some("/account")
    );
    // Login cycles the session ID; pick up the fresh cookie
    session_cookie(&response).unwrap_or(cookie)
}

/// Log in as the seeded admin and return the session cookie.
pub async fn login_admin(app: &Router) -> String {
    let (cookie, token) = csrf_from(app, "/auth/login", None).await;
    let form = format!(
        "username=admin&password={}&csrf_token={token}",
        urlencoding::encode(ADMIN_PASSWORD)
    );
    let response = post_form(app, "/auth/login", &form, Some(&cookie)).await;
    assert_eq!(response.status(), 303, "admin login should redirect");
    session_cookie(&response).unwrap_or(cookie)
}
