//! jirakit - run JIRA commands from the terminal.
//!
//! Command output is printed to stdout as JSON; logs go to the log file
//! (and stderr with `--verbose`).

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{error, info, warn};

use jirakit::api::{self, JiraClient};
use jirakit::commands::{CommandRegistry, CommandRunner, ErrorReport};
use jirakit::config::Config;
use jirakit::error::{AppError, Result};
use jirakit::logging;

#[derive(Debug, Parser)]
#[command(name = "jirakit", version, about = "Run JIRA commands with JSON input and output")]
struct Cli {
    /// Path to the config file (defaults to <config dir>/jirakit/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Run a command, e.g. `jirakit run getIssueDetails '{"issueIdOrKey":"PROJ-1"}'`
    Run {
        /// Command name (see `jirakit commands`)
        name: String,
        /// JSON input object; read from stdin when omitted or `-`
        input: Option<String>,
    },
    /// List commands and their parameters
    #[command(name = "commands")]
    List {
        /// Only show commands matching this text
        query: Option<String>,
    },
    /// Manage the API token stored in the OS keyring
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Debug, Subcommand)]
enum TokenAction {
    /// Store a token read from stdin
    Set {
        #[arg(long)]
        email: String,
    },
    /// Remove the stored token
    Delete {
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            if e.is_critical() {
                error!("{}", e);
            } else {
                warn!("{}", e);
            }
            let report = ErrorReport::new(e.user_message());
            if let Ok(json) = serde_json::to_value(&report) {
                let _ = print_json(&json);
            }
            if let Some(action) = e.suggested_action() {
                eprintln!("{}", action);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        CliCommand::Run { name, input } => {
            let config = Config::load(cli.config.as_deref())?;
            let runner = CommandRunner::new(JiraClient::new(&config)?);
            let input = read_input(input.as_deref())?;

            let output = runner.run(&name, input).await;
            print_json(&output.to_json())?;

            Ok(if output.is_error() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        CliCommand::List { query } => {
            let registry = CommandRegistry::new();
            let matches = registry.search(query.as_deref().unwrap_or_default());
            print_json(&serde_json::to_value(matches)?)?;
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Token { action } => {
            match action {
                TokenAction::Set { email } => {
                    let mut token = String::new();
                    io::stdin().read_line(&mut token)?;
                    let token = token.trim();
                    if token.is_empty() {
                        return Err(AppError::other("No token given on stdin"));
                    }
                    api::store_token(&email, token)?;
                    info!(%email, "Stored API token");
                    eprintln!("Token stored for {}", email);
                }
                TokenAction::Delete { email } => {
                    if !api::has_token(&email) {
                        return Err(AppError::other(format!("No token stored for {}", email)));
                    }
                    api::delete_token(&email)?;
                    info!(%email, "Deleted API token");
                    eprintln!("Token deleted for {}", email);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Parse the command input, reading stdin for `None` or `-`.
///
/// Empty input is an empty object.
fn read_input(arg: Option<&str>) -> Result<Value> {
    let text = match arg {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
        Some(text) => text.to_string(),
    };

    if text.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    Ok(serde_json::from_str(&text)?)
}

fn print_json(value: &Value) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
