use std::path::PathBuf;

use registry::config::ConfigError;
use registry::{ApiError, LoginError};

const LOGIN_HINT: &str = "run `registry-cli login --username <name>` to start a new session";

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("sign in failed: {0}")]
    Login(#[from] LoginError),
    #[error("not signed in; run `registry-cli login` first")]
    NotSignedIn,
    #[error("this command requires the {0} authority")]
    Forbidden(&'static str),
    #[error("no result found for code {code} in {year}")]
    NoResult { code: String, year: i32 },
    #[error("result for {code} in {year} is already graded ({result}) and cannot be changed")]
    ResultLocked { code: i64, year: i32, result: f64 },
    #[error("result must be zero or positive, got {0}")]
    InvalidResult(f64),
    #[error("backend health check failed")]
    Unhealthy,
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

impl CliError {
    /// Follow-up advice printed under the error, if any.
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Api(ApiError::AuthExpired) | Self::Login(LoginError::Api(ApiError::AuthExpired)) => Some(LOGIN_HINT),
            _ => None,
        }
    }
}
