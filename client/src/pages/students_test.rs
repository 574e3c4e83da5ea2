use registry::MemoryTokenStore;
use registry::lookup::load_cities;

use super::*;
use crate::test_support::Harness;

fn page(number: u32, total_pages: u32, total_elements: u64) -> StudentPage {
    StudentPage { number, total_pages, total_elements, size: 10, ..StudentPage::default() }
}

// =============================================================
// year_options / student_path
// =============================================================

#[test]
fn year_options_count_back_from_current() {
    assert_eq!(year_options(1447), vec![1447, 1446, 1445, 1444, 1443]);
}

#[test]
fn student_path_embeds_code() {
    assert_eq!(student_path(1042), "/students/1042");
}

// =============================================================
// registration
// =============================================================

#[test]
fn registration_trims_fields() {
    assert_eq!(
        registration(" Sara Adel ", "2990101", " Cairo"),
        Ok(RegisterStudentRequest {
            name: "Sara Adel".to_owned(),
            national_id: "2990101".to_owned(),
            city: "Cairo".to_owned(),
        })
    );
}

#[test]
fn registration_requires_every_field() {
    assert_eq!(registration("Sara", "", "Cairo"), Err(MISSING_STUDENT_FIELDS));
    assert_eq!(registration("Sara", "2990101", "  "), Err(MISSING_STUDENT_FIELDS));
}

// =============================================================
// paging
// =============================================================

#[test]
fn middle_page_has_both_neighbours() {
    let middle = page(1, 3, 25);
    assert_eq!(previous_page(&middle), Some(0));
    assert_eq!(next_page(&middle), Some(2));
    assert_eq!(page_summary(&middle), "Page 2 of 3 (25 students)");
}

#[test]
fn single_page_has_no_neighbours() {
    let only = page(0, 1, 4);
    assert_eq!(previous_page(&only), None);
    assert_eq!(next_page(&only), None);
}

#[test]
fn empty_listing_says_so() {
    assert_eq!(page_summary(&page(0, 0, 0)), "No students found.");
}

#[test]
fn result_bands_follow_thresholds() {
    assert_eq!(result_band(97.0), "excellent");
    assert_eq!(result_band(85.0), "very-good");
    assert_eq!(result_band(80.0), "good");
    assert_eq!(result_band(40.0), "pass");
}

// =============================================================
// data
// =============================================================

#[test]
fn city_lookup_feeds_registration_select() {
    let h = Harness::new(MemoryTokenStore::with_credential("a.b.c"));
    h.transport.push(200, &serde_json::json!([{ "name": "Cairo" }, { "name": "Minya" }]));

    let lookup = futures::executor::block_on(load_cities(h.api()));

    assert!(lookup.error.is_none());
    assert_eq!(lookup.items.len(), 2);
    assert_eq!(h.transport.urls(), vec!["http://localhost:8080/student/city/list"]);
}

#[test]
fn city_lookup_failure_leaves_select_empty_with_message() {
    let h = Harness::new(MemoryTokenStore::with_credential("a.b.c"));

    let lookup = futures::executor::block_on(load_cities(h.api()));

    assert!(lookup.items.is_empty());
    assert!(lookup.error.is_some());
}

#[test]
fn listing_uses_search_endpoint_when_searching() {
    let h = Harness::new(MemoryTokenStore::with_credential("a.b.c"));
    h.transport.push(200, &serde_json::json!({
        "content": [],
        "totalPages": 0,
        "totalElements": 0,
        "number": 0,
        "size": 10
    }));
    let query = StudentQuery { search: Some("sara".to_owned()), ..StudentQuery::new(1447) };

    let listing = futures::executor::block_on(endpoints::list_students(h.api(), &query)).expect("page");

    assert_eq!(page_summary(&listing), "No students found.");
    assert!(h.transport.urls()[0].starts_with("http://localhost:8080/student/by-year/search?year=1447&search=sara"));
}
