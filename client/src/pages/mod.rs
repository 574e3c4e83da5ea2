//! Route-level screens.

pub mod dashboard;
pub mod login;
pub mod public_results;
pub mod student_detail;
pub mod students;
pub mod tester_results;
pub mod users;
