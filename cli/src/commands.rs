//! Command execution. Each command resolves to the text printed on stdout.
//!
//! Commands are gated the same way the browser gates routes: the stored
//! session is restored first and checked with [`guard::evaluate`], so a
//! missing session or authority fails locally before any backend call.

use registry::clock::{Clock, SystemClock};
use registry::endpoints::{self, StudentQuery};
use registry::guard::{self, Access, GuardDecision, LOGIN_ROUTE};
use registry::types::{
    RegisterExamRequest, RegisterStudentRequest, RegisterUserRequest, Role, UpdateResultRequest, UpdateStudentRequest,
    default_exam_year,
};
use registry::{AuthContext, AuthState};
use serde::Serialize;

use crate::error::CliError;
use crate::{Command, ReportSubcommand, ResultsSubcommand, StudentsSubcommand, UsersSubcommand};

pub async fn run(auth: &AuthContext, command: Command) -> Result<String, CliError> {
    require(auth, access_for(&command)).await?;
    let api = auth.api();

    match command {
        Command::Login { username, password } => {
            let session = auth.login(&username, &password).await?;
            Ok(format!(
                "signed in as {} [{}]",
                session.display_name(),
                session.authorities.join(", ")
            ))
        }
        Command::Logout => {
            auth.logout();
            Ok("signed out".to_owned())
        }
        Command::Whoami => match auth.session() {
            Some(session) => render(&session),
            None => Err(CliError::NotSignedIn),
        },
        Command::Students(students) => run_students(auth, students.command).await,
        Command::Results(results) => run_results(auth, results.command).await,
        Command::Users(users) => run_users(auth, users.command).await,
        Command::Levels => render(&endpoints::list_levels(api).await?),
        Command::Cities => render(&endpoints::list_cities(api).await?),
        Command::Report(report) => run_report(auth, report.command).await,
        Command::PublicResult { code, year, recaptcha_token } => {
            let year = year.unwrap_or_else(current_exam_year);
            match endpoints::fetch_public_result(api, &code, year, &recaptcha_token).await? {
                Some(result) => render(&result),
                None => Err(CliError::NoResult { code: code.trim().to_owned(), year }),
            }
        }
        Command::Health => {
            if endpoints::check_health(api).await {
                Ok("ok".to_owned())
            } else {
                Err(CliError::Unhealthy)
            }
        }
    }
}

async fn run_students(auth: &AuthContext, command: StudentsSubcommand) -> Result<String, CliError> {
    let api = auth.api();
    match command {
        StudentsSubcommand::List { year, search, page, size } => {
            let query = StudentQuery {
                search,
                page,
                size,
                ..StudentQuery::new(year.unwrap_or_else(current_exam_year))
            };
            render(&endpoints::list_students(api, &query).await?)
        }
        StudentsSubcommand::Show { code } => render(&endpoints::fetch_student(api, code).await?),
        StudentsSubcommand::History { code } => render(&endpoints::fetch_exam_history(api, code).await?),
        StudentsSubcommand::Register { name, national_id, city } => {
            endpoints::register_student(api, &RegisterStudentRequest { name, national_id, city }).await?;
            Ok("student registered".to_owned())
        }
        StudentsSubcommand::Update { code, name, national_id, city } => {
            endpoints::update_student(api, &UpdateStudentRequest { code, name, national_id, city }).await?;
            Ok(format!("student {code} updated"))
        }
        StudentsSubcommand::Delete { code } => Ok(endpoints::delete_student(api, code).await?),
        StudentsSubcommand::Exam { code, level, year } => {
            let year = year.unwrap_or_else(current_exam_year);
            endpoints::register_exam(api, &RegisterExamRequest::new(code, &level, year)).await?;
            Ok(format!("student {code} registered for {level} in {year}"))
        }
        StudentsSubcommand::Count { year } => {
            let count = match year {
                Some(year) => endpoints::count_students_in_year(api, year).await?,
                None => endpoints::count_students(api).await?,
            };
            Ok(count.to_string())
        }
    }
}

async fn run_results(auth: &AuthContext, command: ResultsSubcommand) -> Result<String, CliError> {
    let api = auth.api();
    match command {
        ResultsSubcommand::Get { code, year } => {
            let year = year.unwrap_or_else(current_exam_year);
            render(&endpoints::fetch_student_result(api, code, year).await?)
        }
        ResultsSubcommand::Update { code, year, result } => {
            let year = year.unwrap_or_else(current_exam_year);
            if result < 0.0 {
                return Err(CliError::InvalidResult(result));
            }
            let current = endpoints::fetch_student_result(api, code, year).await?;
            if current.is_locked() {
                return Err(CliError::ResultLocked { code, year, result: current.result });
            }
            endpoints::update_student_result(api, &UpdateResultRequest { code, year, result }).await?;
            Ok(format!("result for {code} in {year} set to {result}"))
        }
    }
}

async fn run_users(auth: &AuthContext, command: UsersSubcommand) -> Result<String, CliError> {
    let api = auth.api();
    match command {
        UsersSubcommand::List => render(&endpoints::list_users(api).await?),
        UsersSubcommand::Add { name, email, mobile, username, password, role } => {
            let request = RegisterUserRequest { name, email, mobile, username, password, role };
            endpoints::add_user(api, &request).await?;
            Ok(format!("user {} added as {}", request.username, role.as_str()))
        }
        UsersSubcommand::Delete { username } => {
            endpoints::delete_user(api, &username).await?;
            Ok(format!("user {username} deleted"))
        }
    }
}

async fn run_report(auth: &AuthContext, command: ReportSubcommand) -> Result<String, CliError> {
    let api = auth.api();
    match command {
        ReportSubcommand::Counts { year } => {
            let year = year.unwrap_or_else(current_exam_year);
            render(&endpoints::count_students_by_level(api, year).await?)
        }
        ReportSubcommand::Excel { level, year, output } => {
            let year = year.unwrap_or_else(current_exam_year);
            let bytes = match level.as_deref() {
                Some(level) => endpoints::download_level_report(api, level, year).await?,
                None => endpoints::download_year_report(api, year).await?,
            };
            std::fs::write(&output, &bytes).map_err(|source| CliError::Write { path: output.clone(), source })?;
            Ok(format!("wrote {} bytes to {}", bytes.len(), output.display()))
        }
    }
}

// =============================================================================
// gating
// =============================================================================

/// Who may run `command`, mirroring the browser route table.
fn access_for(command: &Command) -> Access {
    match command {
        Command::Login { .. } | Command::Logout | Command::PublicResult { .. } | Command::Health => Access::Public,
        Command::Results(_) => Access::Authority(Role::Tester.as_str()),
        Command::Users(_) => Access::Authority(Role::Admin.as_str()),
        Command::Whoami
        | Command::Students(_)
        | Command::Levels
        | Command::Cities
        | Command::Report(_) => Access::Session,
    }
}

async fn require(auth: &AuthContext, access: Access) -> Result<(), CliError> {
    if access == Access::Public {
        return Ok(());
    }
    auth.initialize().await;
    check_access(&auth.state(), access)
}

fn check_access(state: &AuthState, access: Access) -> Result<(), CliError> {
    match guard::evaluate(state, access) {
        GuardDecision::Render => Ok(()),
        GuardDecision::Redirect(route) if route != LOGIN_ROUTE => match access {
            Access::Authority(authority) => Err(CliError::Forbidden(authority)),
            Access::Public | Access::Session => Err(CliError::NotSignedIn),
        },
        GuardDecision::Redirect(_) | GuardDecision::Loading => Err(CliError::NotSignedIn),
    }
}

// =============================================================================
// helpers
// =============================================================================

fn current_exam_year() -> i32 {
    default_exam_year(SystemClock.now())
}

fn render<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
#[path = "commands_test.rs"]
mod tests;
