//! Error handling and display for the CLI.

use colored::Colorize;
use thiserror::Error;

/// CLI-specific errors.
///
/// Every failure path propagates one of these up to `main`, which prints it
/// and decides the exit code. Nothing in the command handlers terminates the
/// process directly.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not determine home directory")]
    NoHomeDir,

    #[error("Malformed config file: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("Unknown context: {0}")]
    UnknownContext(String),

    #[error("A context named '{0}' already exists")]
    DuplicateContext(String),

    #[error("The active context '{0}' does not exist in the config file")]
    NoCurrentContext(String),

    #[error("Invalid credentials. Failed to login.")]
    InvalidCredentials,

    #[error("Malformed JSON response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("Authentication failed after re-login")]
    AuthenticationExpired { username: String },

    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        match cli_err {
            CliError::AuthenticationExpired { username } => {
                let login = if username.is_empty() {
                    "drydock login".to_string()
                } else {
                    format!("drydock login -u {username}")
                };
                eprintln!(
                    "\n{}",
                    format!("Hint: Check that the SSO target URL is correct, then run `{login}`.")
                        .yellow()
                );
            }
            CliError::InvalidCredentials => {
                eprintln!(
                    "\n{}",
                    "Hint: Check your username, password, and MFA code.".yellow()
                );
            }
            CliError::UnknownContext(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: Run `drydock config contexts` to list known contexts.".yellow()
                );
            }
            CliError::Network(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: Check your network connection and cluster target URL.".yellow()
                );
            }
            _ => {}
        }
    }
}
