//! Backend record shapes.
//!
//! Flat value objects mirroring the JSON the registry backend produces and
//! accepts. Field names are camelCase on the wire. Nothing here is cached;
//! pages fetch what they render.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Offset between the Gregorian calendar year and the exam (Hijri) year the
/// backend indexes results by.
pub const HIJRI_YEAR_OFFSET: i32 = 578;

/// Approximate exam year for `now`, used as the default year selector value.
#[must_use]
pub fn default_exam_year(now: OffsetDateTime) -> i32 {
    now.year() - HIJRI_YEAR_OFFSET
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub status: String,
    pub jwt_token: Option<String>,
}

/// Profile completion record fetched after the credential is decoded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
}

// =============================================================================
// STUDENTS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub name: String,
    pub code: i64,
    pub level: String,
    pub result: f64,
    pub city: String,
    pub year: i32,
    pub national_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetails {
    pub name: String,
    pub code: i64,
    pub city: String,
    pub national_id: String,
}

/// One page of a paged student listing. Paging metadata the UI never reads
/// (`pageable`, `sort`) is ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPage {
    pub content: Vec<Student>,
    pub total_pages: u32,
    pub total_elements: u64,
    pub number: u32,
    pub size: u32,
    #[serde(default)]
    pub number_of_elements: u32,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
    #[serde(default)]
    pub empty: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStudentRequest {
    pub name: String,
    pub national_id: String,
    pub city: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    pub code: i64,
    pub name: String,
    pub national_id: String,
    pub city: String,
}

/// Exam registration. The backend expects `code` and `year` as strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterExamRequest {
    pub code: String,
    pub level: String,
    pub year: String,
}

impl RegisterExamRequest {
    #[must_use]
    pub fn new(code: i64, level: &str, year: i32) -> Self {
        Self { code: code.to_string(), level: level.to_owned(), year: year.to_string() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExamHistoryEntry {
    pub year: i32,
    pub level: String,
    pub result: f64,
}

/// Result as seen by a tester, who may correct it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StudentResult {
    pub name: String,
    pub code: i64,
    pub level: String,
    pub result: f64,
    pub city: String,
    pub year: i32,
}

impl StudentResult {
    /// A positive result has been graded and can no longer be edited by a tester.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.result > 0.0
    }
}

/// Anonymous result lookup; same shape as [`StudentResult`].
pub type PublicResult = StudentResult;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateResultRequest {
    pub code: i64,
    pub year: i32,
    pub result: f64,
}

// =============================================================================
// USERS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
    Tester,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
            Self::Tester => "TESTER",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "USER" => Ok(Self::User),
            "TESTER" => Ok(Self::Tester),
            other => Err(format!("unknown role '{other}' (expected ADMIN, USER or TESTER)")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub mobile_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub authorities: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub username: String,
    pub password: String,
    pub role: Role,
}

// =============================================================================
// LOOKUPS & REPORTS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelStudentCount {
    pub level_name: String,
    pub student_count: u64,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
