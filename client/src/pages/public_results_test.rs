use registry::MemoryTokenStore;
use registry::types::StudentResult;

use super::*;
use crate::net::browser::CAPTCHA_UNAVAILABLE;
use crate::test_support::Harness;

fn published() -> StudentResult {
    StudentResult {
        name: "Sara Adel".to_owned(),
        code: 1042,
        level: "Level 3".to_owned(),
        result: 91.5,
        city: "Cairo".to_owned(),
        year: 1447,
    }
}

// =============================================================
// validate_public_lookup
// =============================================================

#[test]
fn lookup_trims_code_and_parses_year() {
    assert_eq!(validate_public_lookup(" 1042 ", "1447"), Ok(("1042".to_owned(), 1447)));
}

#[test]
fn lookup_requires_code() {
    assert_eq!(validate_public_lookup("   ", "1447"), Err(MISSING_CODE));
}

#[test]
fn lookup_rejects_unparsable_year() {
    assert_eq!(validate_public_lookup("1042", ""), Err(INVALID_YEAR));
}

// =============================================================
// settle
// =============================================================

#[test]
fn missing_result_reads_as_not_published() {
    assert_eq!(settle(Ok(None)), Err(NO_RESULT.to_owned()));
}

#[test]
fn published_result_passes_through() {
    assert_eq!(settle(Ok(Some(published()))), Ok(published()));
}

#[test]
fn backend_failure_keeps_its_message() {
    let outcome = settle(Err(ApiError::Status { status: 400, message: "Invalid captcha".to_owned() }));
    assert_eq!(outcome, Err("Invalid captcha".to_owned()));
}

// =============================================================
// lookup_result
// =============================================================

#[test]
fn no_request_without_verification_token() {
    let h = Harness::new(MemoryTokenStore::new());

    let outcome = futures::executor::block_on(lookup_result(h.api(), "site-key", "1042", 1447));

    assert_eq!(outcome, Err(CAPTCHA_UNAVAILABLE.to_owned()));
    assert!(h.transport.urls().is_empty());
}

#[test]
fn empty_object_from_backend_is_no_result() {
    let h = Harness::new(MemoryTokenStore::new());
    h.transport.push(200, &serde_json::json!({}));

    let outcome = futures::executor::block_on(endpoints::fetch_public_result(h.api(), "1042", 1447, "token"));

    assert_eq!(settle(outcome), Err(NO_RESULT.to_owned()));
    assert!(h.transport.urls()[0].starts_with("http://localhost:8080/api/public/result?code=1042&year=1447"));
}
