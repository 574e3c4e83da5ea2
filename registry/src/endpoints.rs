//! Typed wrappers over every backend resource the front-ends consume.
//!
//! Path builders are separate pure functions so query encoding can be tested
//! without a transport. All calls are authenticated except the login exchange
//! (in `auth`), the public result lookup and the health check.

use url::form_urlencoded;

use crate::api::{ApiClient, RequestOptions};
use crate::error::ApiError;
use crate::types::{
    City, ExamHistoryEntry, Level, LevelStudentCount, Profile, PublicResult, RegisterExamRequest,
    RegisterStudentRequest, RegisterUserRequest, StudentDetails, StudentPage, StudentResult, UpdateResultRequest,
    UpdateStudentRequest, User,
};

pub const LEVELS_PATH: &str = "/student/level/list";
pub const CITIES_PATH: &str = "/student/city/list";

fn with_query(path: &str, params: &[(&str, &str)]) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    format!("{path}?{query}")
}

// =============================================================================
// PROFILE
// =============================================================================

#[must_use]
pub fn profile_path(username: &str) -> String {
    with_query("/user/profile", &[("username", username)])
}

/// Profile completion record for `username`.
///
/// # Errors
///
/// Propagates [`ApiError`] from the request or body decoding.
pub async fn fetch_profile(api: &ApiClient, username: &str) -> Result<Profile, ApiError> {
    api.get_json(&profile_path(username)).await
}

// =============================================================================
// STUDENTS
// =============================================================================

/// Paged listing parameters. Results are always ranked by result, best first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudentQuery {
    pub year: i32,
    pub search: Option<String>,
    pub page: u32,
    pub size: u32,
}

impl StudentQuery {
    #[must_use]
    pub fn new(year: i32) -> Self {
        Self { year, search: None, page: 0, size: 10 }
    }
}

#[must_use]
pub fn students_path(query: &StudentQuery) -> String {
    let year = query.year.to_string();
    let page = query.page.to_string();
    let size = query.size.to_string();
    match query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(search) => with_query(
            "/student/by-year/search",
            &[
                ("year", year.as_str()),
                ("search", search),
                ("page", page.as_str()),
                ("size", size.as_str()),
                ("sortBy", "result"),
                ("direction", "DESC"),
            ],
        ),
        None => with_query(
            "/student/by-year",
            &[
                ("year", year.as_str()),
                ("page", page.as_str()),
                ("size", size.as_str()),
                ("sortBy", "result"),
                ("direction", "DESC"),
            ],
        ),
    }
}

/// # Errors
///
/// Propagates [`ApiError`].
pub async fn list_students(api: &ApiClient, query: &StudentQuery) -> Result<StudentPage, ApiError> {
    api.get_json(&students_path(query)).await
}

/// # Errors
///
/// Propagates [`ApiError`].
pub async fn register_student(api: &ApiClient, request: &RegisterStudentRequest) -> Result<(), ApiError> {
    api.post_json("/student/register", request).await.map(drop)
}

/// # Errors
///
/// Propagates [`ApiError`].
pub async fn update_student(api: &ApiClient, request: &UpdateStudentRequest) -> Result<(), ApiError> {
    api.post_json("/student/update", request).await.map(drop)
}

/// Delete a student; returns the backend's confirmation text.
///
/// # Errors
///
/// Propagates [`ApiError`].
pub async fn delete_student(api: &ApiClient, code: i64) -> Result<String, ApiError> {
    let code = code.to_string();
    let path = with_query("/student", &[("code", code.as_str())]);
    api.request(&path, RequestOptions::delete()).await?.text()
}

/// # Errors
///
/// Propagates [`ApiError`].
pub async fn fetch_student(api: &ApiClient, code: i64) -> Result<StudentDetails, ApiError> {
    api.get_json(&format!("/student/{code}")).await
}

/// # Errors
///
/// Propagates [`ApiError`].
pub async fn fetch_exam_history(api: &ApiClient, code: i64) -> Result<Vec<ExamHistoryEntry>, ApiError> {
    let code = code.to_string();
    api.get_json(&with_query("/student/history", &[("code", code.as_str())])).await
}

/// # Errors
///
/// Propagates [`ApiError`].
pub async fn register_exam(api: &ApiClient, request: &RegisterExamRequest) -> Result<(), ApiError> {
    api.post_json("/student/exam/register", request).await.map(drop)
}

/// Total number of registered students.
///
/// # Errors
///
/// Propagates [`ApiError`].
pub async fn count_students(api: &ApiClient) -> Result<u64, ApiError> {
    api.get_json("/student/count").await
}

/// # Errors
///
/// Propagates [`ApiError`].
pub async fn count_students_in_year(api: &ApiClient, year: i32) -> Result<u64, ApiError> {
    api.get_json(&format!("/student/count/by-year/{year}")).await
}

// =============================================================================
// TESTER
// =============================================================================

/// # Errors
///
/// Propagates [`ApiError`].
pub async fn fetch_student_result(api: &ApiClient, code: i64, year: i32) -> Result<StudentResult, ApiError> {
    let (code, year) = (code.to_string(), year.to_string());
    let path = with_query("/student/result", &[("code", code.as_str()), ("year", year.as_str())]);
    api.get_json(&path).await
}

/// # Errors
///
/// Propagates [`ApiError`].
pub async fn update_student_result(api: &ApiClient, request: &UpdateResultRequest) -> Result<(), ApiError> {
    api.post_json("/student/result/update", request).await.map(drop)
}

// =============================================================================
// USERS
// =============================================================================

/// # Errors
///
/// Propagates [`ApiError`].
pub async fn list_users(api: &ApiClient) -> Result<Vec<User>, ApiError> {
    api.get_json("/user/list").await
}

/// # Errors
///
/// Propagates [`ApiError`].
pub async fn add_user(api: &ApiClient, request: &RegisterUserRequest) -> Result<(), ApiError> {
    api.post_json("/user/add", request).await.map(drop)
}

/// # Errors
///
/// Propagates [`ApiError`].
pub async fn delete_user(api: &ApiClient, username: &str) -> Result<(), ApiError> {
    let path = with_query("/user/delete", &[("username", username)]);
    api.request(&path, RequestOptions::delete()).await.map(drop)
}

// =============================================================================
// LOOKUPS
// =============================================================================

/// # Errors
///
/// Propagates [`ApiError`].
pub async fn list_levels(api: &ApiClient) -> Result<Vec<Level>, ApiError> {
    api.get_json(LEVELS_PATH).await
}

/// # Errors
///
/// Propagates [`ApiError`].
pub async fn list_cities(api: &ApiClient) -> Result<Vec<City>, ApiError> {
    api.get_json(CITIES_PATH).await
}

// =============================================================================
// REPORTS
// =============================================================================

/// # Errors
///
/// Propagates [`ApiError`].
pub async fn count_students_by_level(api: &ApiClient, year: i32) -> Result<Vec<LevelStudentCount>, ApiError> {
    api.get_json(&format!("/report/count/student-by-level/{year}")).await
}

#[must_use]
pub fn level_report_path(level: &str, year: i32) -> String {
    let year = year.to_string();
    with_query("/report/excel", &[("level", level), ("year", year.as_str())])
}

/// Spreadsheet for one level, generated by the backend.
///
/// # Errors
///
/// Propagates [`ApiError`].
pub async fn download_level_report(api: &ApiClient, level: &str, year: i32) -> Result<Vec<u8>, ApiError> {
    Ok(api.request(&level_report_path(level, year), RequestOptions::get()).await?.into_bytes())
}

/// Spreadsheet for every student in `year`.
///
/// # Errors
///
/// Propagates [`ApiError`].
pub async fn download_year_report(api: &ApiClient, year: i32) -> Result<Vec<u8>, ApiError> {
    let year = year.to_string();
    let path = with_query("/report/excel/all", &[("year", year.as_str())]);
    Ok(api.request(&path, RequestOptions::get()).await?.into_bytes())
}

// =============================================================================
// PUBLIC
// =============================================================================

#[must_use]
pub fn public_result_path(code: &str, year: i32, recaptcha_response: &str) -> String {
    let year = year.to_string();
    with_query(
        "/api/public/result",
        &[("code", code.trim()), ("year", year.as_str()), ("recaptchaResponse", recaptcha_response)],
    )
}

/// Anonymous result lookup guarded by a bot-mitigation token. An empty JSON
/// object means no result was published for that code and year.
///
/// # Errors
///
/// Propagates [`ApiError`].
pub async fn fetch_public_result(
    api: &ApiClient,
    code: &str,
    year: i32,
    recaptcha_response: &str,
) -> Result<Option<PublicResult>, ApiError> {
    let path = public_result_path(code, year, recaptcha_response);
    let body: serde_json::Value = api.request(&path, RequestOptions::get().anonymous()).await?.json()?;
    let empty = match &body {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if empty {
        return Ok(None);
    }
    serde_json::from_value(body).map(Some).map_err(|e| ApiError::Body(e.to_string()))
}

/// Whether the backend answers its health check. Never fails.
pub async fn check_health(api: &ApiClient) -> bool {
    api.request("/health", RequestOptions::get().anonymous()).await.is_ok()
}

#[cfg(test)]
#[path = "endpoints_test.rs"]
mod tests;
