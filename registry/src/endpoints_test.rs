use super::*;
use crate::error::TransportError;
use crate::http::{HttpResponse, Method};
use crate::test_support::{Harness, json_response};

// =============================================================================
// path builders
// =============================================================================

#[test]
fn profile_path_encodes_username() {
    assert_eq!(profile_path("a b&c"), "/user/profile?username=a+b%26c");
}

#[test]
fn students_path_without_search_uses_by_year_listing() {
    let query = StudentQuery { year: 1447, search: None, page: 2, size: 25 };
    assert_eq!(
        students_path(&query),
        "/student/by-year?year=1447&page=2&size=25&sortBy=result&direction=DESC"
    );
}

#[test]
fn students_path_with_search_encodes_term() {
    let query = StudentQuery { search: Some(" محمد ".to_owned()), ..StudentQuery::new(1447) };
    let path = students_path(&query);
    assert!(path.starts_with("/student/by-year/search?year=1447&search=%D9%85"));
    assert!(path.ends_with("&page=0&size=10&sortBy=result&direction=DESC"));
}

#[test]
fn blank_search_falls_back_to_plain_listing() {
    let query = StudentQuery { search: Some("   ".to_owned()), ..StudentQuery::new(1447) };
    assert!(students_path(&query).starts_with("/student/by-year?"));
}

#[test]
fn level_report_path_encodes_level_name() {
    assert_eq!(level_report_path("Level 3/A", 1447), "/report/excel?level=Level+3%2FA&year=1447");
}

#[test]
fn public_result_path_carries_bot_token() {
    assert_eq!(
        public_result_path(" 1042 ", 1447, "tok+en"),
        "/api/public/result?code=1042&year=1447&recaptchaResponse=tok%2Ben"
    );
}

// =============================================================================
// calls
// =============================================================================

#[tokio::test]
async fn delete_student_returns_confirmation_text() {
    let h = Harness::with_credential("a.b.c");
    h.transport.push(Ok(HttpResponse::new(200, "deleted")));

    let text = delete_student(&h.api, 1042).await.expect("ok");

    assert_eq!(text, "deleted");
    let sent = &h.transport.requests()[0];
    assert_eq!(sent.method, Method::Delete);
    assert_eq!(sent.url, "http://localhost:8080/student?code=1042");
}

#[tokio::test]
async fn count_students_in_year_reads_plain_number() {
    let h = Harness::with_credential("a.b.c");
    h.transport.push(json_response(200, &serde_json::json!(312)));

    assert_eq!(count_students_in_year(&h.api, 1447).await, Ok(312));
    assert_eq!(h.transport.requests()[0].url, "http://localhost:8080/student/count/by-year/1447");
}

#[tokio::test]
async fn register_exam_posts_string_fields() {
    let h = Harness::with_credential("a.b.c");
    h.transport.push(Ok(HttpResponse::new(200, "")));

    register_exam(&h.api, &RegisterExamRequest::new(7, "First", 1447)).await.expect("ok");

    let body: serde_json::Value =
        serde_json::from_str(h.transport.requests()[0].body.as_deref().expect("body")).expect("json");
    assert_eq!(body, serde_json::json!({ "code": "7", "level": "First", "year": "1447" }));
}

#[tokio::test]
async fn download_year_report_returns_raw_bytes() {
    let h = Harness::with_credential("a.b.c");
    h.transport.push(Ok(HttpResponse::new(200, vec![1_u8, 2, 3])));

    assert_eq!(download_year_report(&h.api, 1447).await, Ok(vec![1, 2, 3]));
}

#[tokio::test]
async fn public_result_is_anonymous() {
    let h = Harness::with_credential("a.b.c");
    h.transport.push(json_response(
        200,
        &serde_json::json!({ "name": "Sara", "code": 1042, "level": "Third", "result": 91.5, "city": "Cairo", "year": 1447 }),
    ));

    let result = fetch_public_result(&h.api, "1042", 1447, "token").await.expect("ok").expect("some");

    assert_eq!(result.name, "Sara");
    assert!(h.transport.requests()[0].header("Authorization").is_none());
}

#[tokio::test]
async fn public_result_empty_object_means_no_result() {
    let h = Harness::new();
    h.transport.push(json_response(200, &serde_json::json!({})));

    assert_eq!(fetch_public_result(&h.api, "1042", 1447, "token").await, Ok(None));
}

#[tokio::test]
async fn public_result_error_surfaces_backend_message() {
    let h = Harness::new();
    h.transport.push(json_response(400, &serde_json::json!({ "message": "captcha failed" })));

    let err = fetch_public_result(&h.api, "1042", 1447, "bad").await.expect_err("should fail");
    assert_eq!(err.to_string(), "captcha failed");
}

#[tokio::test]
async fn health_is_false_when_backend_is_unreachable() {
    let h = Harness::new();
    h.transport.push(Err(TransportError::Connect("refused".to_owned())));

    assert!(!check_health(&h.api).await);
}

#[tokio::test]
async fn health_is_true_on_success() {
    let h = Harness::new();
    h.transport.push(Ok(HttpResponse::new(200, "UP")));

    assert!(check_health(&h.api).await);
}
