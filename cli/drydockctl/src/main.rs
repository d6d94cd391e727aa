mod auth;
mod bundle;
mod client;
mod commands;
mod config;
mod error;
mod gateway;
mod output;
mod resolve;
mod templates;

use clap::Parser;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = cli.run().await {
        error::print_error(&err);
        std::process::exit(1);
    }
}
