//! Tests for pages that need no login: rendering, escaping, the
//! document viewer, partner redirects, and the digest form.

mod common;

use axum::http::header;

use common::{body_string, get, post_form, test_app};

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let response = get(&app, "/health", None).await;
    assert_eq!(response.status(), 200);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_home_lists_products() {
    let app = test_app();
    let response = get(&app, "/", None).await;
    assert_eq!(response.status(), 200);

    let body = body_string(response).await;
    assert!(body.contains("Pentester&#39;s Field Mug") || body.contains("Pentester's Field Mug"));
    assert!(body.contains("$14.99"));
}

#[tokio::test]
async fn test_static_assets_served_from_configured_dir() {
    let app = test_app();
    let response = get(&app, "/static/main.css", None).await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/css"
    );
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = test_app();
    let response = get(&app, "/", None).await;

    let headers = response.headers();
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert!(headers.contains_key("content-security-policy"));
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_greeting_escapes_markup() {
    let app = test_app();
    let response = get(&app, "/greeting?name=%3Cscript%3Ealert(1)%3C%2Fscript%3E", None).await;
    assert_eq!(response.status(), 200);

    let body = body_string(response).await;
    assert!(!body.contains("<script>alert(1)</script>"));
    assert!(body.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn test_greeting_treats_template_syntax_as_text() {
    let app = test_app();
    let response = get(&app, "/greeting?name=%7B%7B7*7%7D%7D", None).await;
    assert_eq!(response.status(), 200);

    let body = body_string(response).await;
    // The expression comes back verbatim, never evaluated
    assert!(body.contains("{{7*7}}"));
    assert!(!body.contains("Hello, 49"));
}

#[tokio::test]
async fn test_preview_escapes_markup() {
    let app = test_app();
    let response = get(&app, "/preview?text=%3Cimg%20src%3Dx%20onerror%3Dalert(1)%3E", None).await;
    assert_eq!(response.status(), 200);

    let body = body_string(response).await;
    assert!(!body.contains("<img src=x"));
    assert!(body.contains("&lt;img"));
}

#[tokio::test]
async fn test_docs_index_and_document() {
    let app = test_app();

    let response = get(&app, "/docs", None).await;
    assert_eq!(response.status(), 200);
    let body = body_string(response).await;
    assert!(body.contains("warranty.txt"));

    let response = get(&app, "/docs/warranty.txt", None).await;
    assert_eq!(response.status(), 200);
    let body = body_string(response).await;
    assert!(body.contains("LIMITED WARRANTY"));
}

#[tokio::test]
async fn test_docs_traversal_is_not_found() {
    let app = test_app();

    for path in [
        "/docs/..%2F..%2F..%2Fetc%2Fpasswd",
        "/docs/....%2F%2Fsecret.txt",
        "/docs/app.py",
        "/docs/%2e%2e%2fCargo.toml",
    ] {
        let response = get(&app, path, None).await;
        assert_eq!(response.status(), 404, "{path}");
    }
}

#[tokio::test]
async fn test_partner_redirect_allowlist() {
    let app = test_app();

    let response = get(&app, "/partner/owasp", None).await;
    assert_eq!(response.status(), 303);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "https://owasp.org/"
    );

    // Slugs, not URLs: arbitrary destinations cannot be requested
    let response = get(&app, "/partner/https%3A%2F%2Fevil.example", None).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_digest_known_vector() {
    let app = test_app();
    let response = post_form(&app, "/digest", "text=abc", None).await;
    assert_eq!(response.status(), 200);

    let body = body_string(response).await;
    assert!(body.contains("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"));
}

#[tokio::test]
async fn test_cart_page_renders_empty() {
    let app = test_app();
    let response = get(&app, "/cart", None).await;
    assert_eq!(response.status(), 200);

    let body = body_string(response).await;
    assert!(body.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_cart_replace_roundtrip() {
    let app = test_app();
    let (cookie, token) = common::csrf_from(&app, "/cart", None).await;

    // {"items":[{"product_id":1,"quantity":2}]} in base64url
    let snapshot = "eyJpdGVtcyI6W3sicHJvZHVjdF9pZCI6MSwicXVhbnRpdHkiOjJ9XX0";
    let form = format!("snapshot={snapshot}&csrf_token={token}");
    let response = post_form(&app, "/cart", &form, Some(&cookie)).await;
    assert_eq!(response.status(), 303);

    let response = get(&app, "/cart", Some(&cookie)).await;
    let body = body_string(response).await;
    assert!(body.contains("2 unit(s) total"));
}

#[tokio::test]
async fn test_cart_rejects_structural_payload() {
    let app = test_app();
    let (cookie, token) = common::csrf_from(&app, "/cart", None).await;

    // {"items":[{"product_id":1,"quantity":500}]} - quantity out of range
    let snapshot = "eyJpdGVtcyI6W3sicHJvZHVjdF9pZCI6MSwicXVhbnRpdHkiOjUwMH1dfQ";
    let form = format!("snapshot={snapshot}&csrf_token={token}");
    let response = post_form(&app, "/cart", &form, Some(&cookie)).await;

    // Page re-renders with the error; the cart stays empty
    assert_eq!(response.status(), 200);
    let body = body_string(response).await;
    assert!(body.contains("quantity"));
    assert!(body.contains("Your cart is empty"));
}
