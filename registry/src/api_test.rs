use super::*;
use crate::error::{NETWORK_ERROR_MESSAGE, TransportError};
use crate::test_support::{Harness, json_response};

// =============================================================================
// headers
// =============================================================================

#[tokio::test]
async fn attaches_bearer_when_credential_is_stored() {
    let h = Harness::with_credential("a.b.c");
    h.transport.push(json_response(200, &serde_json::json!([])));

    h.api.request("/user/list", RequestOptions::get()).await.expect("ok");

    let sent = &h.transport.requests()[0];
    assert_eq!(sent.header("authorization"), Some("Bearer a.b.c"));
    assert_eq!(sent.header("content-type"), Some("application/json"));
    assert_eq!(sent.header("accept"), Some("application/json"));
    assert_eq!(sent.url, "http://localhost:8080/user/list");
}

#[tokio::test]
async fn omits_bearer_when_store_is_empty() {
    let h = Harness::new();
    h.transport.push(json_response(200, &serde_json::json!({})));

    h.api.request("/health", RequestOptions::get()).await.expect("ok");

    assert!(h.transport.requests()[0].header("Authorization").is_none());
}

#[tokio::test]
async fn anonymous_requests_never_carry_bearer() {
    let h = Harness::with_credential("a.b.c");
    h.transport.push(json_response(200, &serde_json::json!({})));

    h.api.request("/auth/apiLogin", RequestOptions::get().anonymous()).await.expect("ok");

    assert!(h.transport.requests()[0].header("Authorization").is_none());
}

#[tokio::test]
async fn caller_headers_merge_but_cannot_touch_authorization() {
    let h = Harness::with_credential("a.b.c");
    h.transport.push(json_response(200, &serde_json::json!({})));

    let options = RequestOptions::get()
        .with_header("Accept", "application/octet-stream")
        .with_header("X-Trace", "t-1")
        .with_header("authorization", "Bearer forged");
    h.api.request("/report/excel/all?year=1447", options).await.expect("ok");

    let sent = &h.transport.requests()[0];
    assert_eq!(sent.header("Accept"), Some("application/octet-stream"));
    assert_eq!(sent.header("X-Trace"), Some("t-1"));
    assert_eq!(sent.header("Authorization"), Some("Bearer a.b.c"));
    let auth_headers = sent.headers.iter().filter(|(k, _)| k.eq_ignore_ascii_case("authorization")).count();
    assert_eq!(auth_headers, 1);
}

#[tokio::test]
async fn post_json_serializes_body() {
    let h = Harness::new();
    h.transport.push(json_response(200, &serde_json::json!({})));

    h.api.post_json("/user/add", &serde_json::json!({ "username": "x" })).await.expect("ok");

    let sent = &h.transport.requests()[0];
    assert_eq!(sent.method, Method::Post);
    assert_eq!(sent.body.as_deref(), Some(r#"{"username":"x"}"#));
}

#[test]
fn url_joins_paths_with_and_without_leading_slash() {
    let h = Harness::new();
    assert_eq!(h.api.url("/student/count"), "http://localhost:8080/student/count");
    assert_eq!(h.api.url("student/count"), "http://localhost:8080/student/count");
}

// =============================================================================
// error normalization
// =============================================================================

#[tokio::test]
async fn non_2xx_uses_message_from_json_body() {
    let h = Harness::new();
    h.transport.push(json_response(400, &serde_json::json!({ "message": "national id already registered" })));

    let err = h.api.request("/student/register", RequestOptions::get()).await.expect_err("should fail");
    assert_eq!(err, ApiError::Status { status: 400, message: "national id already registered".to_owned() });
}

#[tokio::test]
async fn non_2xx_without_json_falls_back_to_status_message() {
    let h = Harness::new();
    h.transport.push(Ok(HttpResponse::new(500, "<html>boom</html>")));

    let err = h.api.request("/student/count", RequestOptions::get()).await.expect_err("should fail");
    assert_eq!(err, ApiError::Status { status: 500, message: "server error: 500".to_owned() });
}

#[tokio::test]
async fn connection_failure_becomes_network_error() {
    let h = Harness::new();
    h.transport.push(Err(TransportError::Connect("connection refused".to_owned())));

    let err = h.api.request("/student/count", RequestOptions::get()).await.expect_err("should fail");
    assert_eq!(err, ApiError::Network);
    assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
}

#[tokio::test]
async fn success_body_is_returned_unmodified() {
    let h = Harness::new();
    h.transport.push(Ok(HttpResponse::new(200, vec![0x50, 0x4b, 0x03, 0x04])));

    let response = h.api.request("/report/excel/all?year=1447", RequestOptions::get()).await.expect("ok");
    assert_eq!(response.into_bytes(), vec![0x50, 0x4b, 0x03, 0x04]);
}

// =============================================================================
// 401 handling
// =============================================================================

#[tokio::test]
async fn unauthorized_clears_store_and_redirects_to_login() {
    let h = Harness::with_credential("a.b.c");
    h.transport.push(Ok(HttpResponse::new(401, "")));

    let err = h.api.request("/user/list", RequestOptions::get()).await.expect_err("should fail");

    assert_eq!(err, ApiError::AuthExpired);
    assert!(h.store.read().is_none());
    assert_eq!(h.navigator.visits(), vec!["/login".to_owned()]);
}

#[tokio::test]
async fn concurrent_unauthorized_responses_clear_and_redirect_once() {
    let h = Harness::with_credential("a.b.c");
    let releases: Vec<_> = (0..3).map(|_| h.transport.push_gated(Ok(HttpResponse::new(401, "")))).collect();

    let release_all = async move {
        tokio::task::yield_now().await;
        for release in releases {
            let _ = release.send(());
        }
    };
    let (a, b, c, ()) = tokio::join!(
        h.api.request("/student/count", RequestOptions::get()),
        h.api.request("/user/list", RequestOptions::get()),
        h.api.request("/student/level/list", RequestOptions::get()),
        release_all,
    );

    for result in [a, b, c] {
        assert_eq!(result, Err(ApiError::AuthExpired));
    }
    assert_eq!(h.store.clear_count(), 1);
    assert_eq!(h.navigator.visits().len(), 1);
}

#[tokio::test]
async fn expiry_hook_runs_once_before_the_redirect() {
    let h = Harness::with_credential("a.b.c");
    let navigator = h.navigator.clone();
    let redirects_seen = Arc::new(Mutex::new(Vec::new()));
    let sink = redirects_seen.clone();
    h.api.on_session_expired(move || sink.lock().unwrap().push(navigator.visits().len()));
    h.transport.push(Ok(HttpResponse::new(401, "")));
    h.transport.push(Ok(HttpResponse::new(401, "")));

    let _ = h.api.request("/user/list", RequestOptions::get()).await;
    let _ = h.api.request("/student/count", RequestOptions::get()).await;

    assert_eq!(*redirects_seen.lock().unwrap(), vec![0]);
    assert_eq!(h.navigator.visits().len(), 1);
}

#[tokio::test]
async fn new_credential_rearms_unauthorized_handling() {
    let h = Harness::with_credential("a.b.c");
    h.transport.push(Ok(HttpResponse::new(401, "")));
    h.transport.push(Ok(HttpResponse::new(401, "")));

    let _ = h.api.request("/user/list", RequestOptions::get()).await;
    h.api.store_credential("d.e.f");
    let _ = h.api.request("/user/list", RequestOptions::get()).await;

    assert_eq!(h.store.clear_count(), 2);
    assert_eq!(h.navigator.visits().len(), 2);
}

#[tokio::test]
async fn anonymous_unauthorized_is_an_ordinary_failure() {
    let h = Harness::with_credential("a.b.c");
    h.transport.push(json_response(401, &serde_json::json!({ "message": "bad credentials" })));

    let err = h
        .api
        .request("/auth/apiLogin", RequestOptions::get().anonymous())
        .await
        .expect_err("should fail");

    assert_eq!(err, ApiError::Status { status: 401, message: "bad credentials".to_owned() });
    assert_eq!(h.store.read().as_deref(), Some("a.b.c"));
    assert!(h.navigator.visits().is_empty());
}
