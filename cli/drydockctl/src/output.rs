//! Styled terminal output.

use colored::Colorize;

use crate::client::{ApiRequest, ApiResponse};
use crate::resolve::Resolved;

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "Success:".green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "Info:".blue().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), message);
}

/// Stream a raw response body to stdout, verbatim. A trailing newline is
/// added only when the body lacks one.
pub fn print_body(body: &str) {
    if body.is_empty() {
        return;
    }
    if body.ends_with('\n') {
        print!("{body}");
    } else {
        println!("{body}");
    }
}

/// `--verbose` provenance dump for the resolved targets.
pub fn verbose_targets(cluster: &Resolved, sso: &Resolved, org: Option<&str>) {
    eprintln!("{}", "Current targets:".dimmed());
    eprintln!(
        "{}",
        format!("  Cluster: {} (from {})", cluster.value, cluster.source.describe()).dimmed()
    );
    eprintln!(
        "{}",
        format!("  SSO login: {} (from {})", sso.value, sso.source.describe()).dimmed()
    );
    if let Some(org) = org {
        eprintln!("{}", format!("  Org: {org}").dimmed());
    }
}

/// `--verbose` line for an outgoing request.
pub fn verbose_request(request: &ApiRequest) {
    eprintln!(
        "{}",
        format!("> {} {}", request.method, request.url).dimmed()
    );
}

/// `--verbose` line for a response.
pub fn verbose_response(response: &ApiResponse) {
    eprintln!("{}", format!("< HTTP {}", response.status).dimmed());
}
