//! Tests for the admin status page and its closed probe set.

mod common;

use common::{body_string, csrf_from, get, login_admin, post_form, register_user, test_app};

#[tokio::test]
async fn test_status_requires_admin() {
    let app = test_app();

    let response = get(&app, "/status", None).await;
    assert_eq!(response.status(), 303);

    let cookie = register_user(&app, "alice").await;
    let response = get(&app, "/status", Some(&cookie)).await;
    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn test_docs_probe_reports_ok() {
    let app = test_app();
    let cookie = login_admin(&app).await;
    let (cookie, token) = csrf_from(&app, "/status", Some(&cookie)).await;

    let form = format!("probe=docs&csrf_token={token}");
    let response = post_form(&app, "/status", &form, Some(&cookie)).await;
    assert_eq!(response.status(), 200);

    let body = body_string(response).await;
    assert!(body.contains("Result: <strong>ok</strong>"));
}

#[tokio::test]
async fn test_user_count_probe() {
    let app = test_app();
    register_user(&app, "bob").await;
    let cookie = login_admin(&app).await;
    let (cookie, token) = csrf_from(&app, "/status", Some(&cookie)).await;

    let form = format!("probe=users&csrf_token={token}");
    let response = post_form(&app, "/status", &form, Some(&cookie)).await;

    let body = body_string(response).await;
    assert!(body.contains("2 accounts"));
}

#[tokio::test]
async fn test_shell_shaped_probe_is_unknown() {
    let app = test_app();
    let cookie = login_admin(&app).await;
    let (cookie, token) = csrf_from(&app, "/status", Some(&cookie)).await;

    let form = format!("probe=docs%3B+id&csrf_token={token}");
    let response = post_form(&app, "/status", &form, Some(&cookie)).await;
    assert_eq!(response.status(), 200);

    let body = body_string(response).await;
    assert!(body.contains("unknown probe"));
    assert!(!body.contains("uid="));
}
