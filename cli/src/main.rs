//! `registry-cli`: command line front-end for the student registry backend.
//!
//! Shares the session and API layer with the browser client. The credential
//! is persisted in a file instead of browser storage, so a `login` carries
//! over to later invocations until `logout`, expiry, or a 401 clears it.

mod commands;
mod error;
mod store;
mod transport;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use registry::clock::SystemClock;
use registry::types::Role;
use registry::{ApiClient, ApiError, AuthContext, RegistryConfig};
use tracing_subscriber::filter::EnvFilter;

use crate::error::CliError;
use crate::store::{FileTokenStore, TerminalNavigator};
use crate::transport::ReqwestTransport;

#[derive(Parser, Debug)]
#[command(name = "registry-cli", about = "Student registry command line client")]
struct Cli {
    #[arg(long, env = "REGISTRY_API_BASE_URL", default_value = "http://localhost:8080")]
    base_url: String,

    #[arg(long, env = "REGISTRY_TOKEN_FILE", help = "Credential file [default: ~/.registry/token]")]
    token_file: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Log requests and session transitions to stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and remember the credential.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "REGISTRY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored credential.
    Logout,
    /// Show the signed-in user.
    Whoami,
    Students(StudentsCommand),
    /// Exam result review (TESTER).
    Results(ResultsCommand),
    /// User administration (ADMIN).
    Users(UsersCommand),
    Levels,
    Cities,
    Report(ReportCommand),
    /// Look up a published result without signing in.
    PublicResult {
        code: String,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, env = "REGISTRY_RECAPTCHA_TOKEN")]
        recaptcha_token: String,
    },
    /// Check that the backend is reachable.
    Health,
}

#[derive(Args, Debug)]
struct StudentsCommand {
    #[command(subcommand)]
    command: StudentsSubcommand,
}

#[derive(Subcommand, Debug)]
enum StudentsSubcommand {
    List {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
    },
    Show {
        code: i64,
    },
    History {
        code: i64,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        national_id: String,
        #[arg(long)]
        city: String,
    },
    Update {
        code: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        national_id: String,
        #[arg(long)]
        city: String,
    },
    Delete {
        code: i64,
    },
    /// Register a student for an exam level.
    Exam {
        code: i64,
        #[arg(long)]
        level: String,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Count students, overall or for one exam year.
    Count {
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Args, Debug)]
struct ResultsCommand {
    #[command(subcommand)]
    command: ResultsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ResultsSubcommand {
    Get {
        code: i64,
        #[arg(long)]
        year: Option<i32>,
    },
    Update {
        code: i64,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        result: f64,
    },
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        mobile: String,
        #[arg(long)]
        username: String,
        #[arg(long, env = "REGISTRY_NEW_USER_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        role: Role,
    },
    Delete {
        username: String,
    },
}

#[derive(Args, Debug)]
struct ReportCommand {
    #[command(subcommand)]
    command: ReportSubcommand,
}

#[derive(Subcommand, Debug)]
enum ReportSubcommand {
    /// Students per level for an exam year.
    Counts {
        #[arg(long)]
        year: Option<i32>,
    },
    /// Download the spreadsheet report for a year, or one level of it.
    Excel {
        #[arg(long)]
        level: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match connect(&cli) {
        Ok(auth) => commands::run(&auth, cli.command).await,
        Err(error) => Err(error),
    };
    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::debug!(?error, "command failed");
            eprintln!("error: {error}");
            if let Some(hint) = error.hint() {
                eprintln!("hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "registry=debug,registry_cli=debug,warn" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
}

fn connect(cli: &Cli) -> Result<AuthContext, CliError> {
    let config = RegistryConfig::new(&cli.base_url)?;
    let transport = ReqwestTransport::new().map_err(ApiError::from)?;
    let token_path = cli.token_file.clone().unwrap_or_else(store::default_token_path);
    tracing::debug!(base_url = %config.api_base_url, token_file = %token_path.display(), "connecting");

    let api = ApiClient::new(
        &config,
        Arc::new(transport),
        Arc::new(FileTokenStore::new(token_path)),
        Arc::new(TerminalNavigator),
    );
    Ok(AuthContext::new(Arc::new(api), Arc::new(SystemClock)))
}
