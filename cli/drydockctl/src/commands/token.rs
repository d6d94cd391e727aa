//! `drydock get token` - one-off token retrieval for scripting.

use anyhow::Result;
use clap::Args;

use super::CommandContext;
use crate::auth::{self, LoginCredentials};
use crate::resolve;

#[derive(Debug, Args)]
pub struct GetTokenArgs {
    /// Username (or set DRYDOCK_USERNAME). Prompted when absent.
    #[arg(short, long)]
    username: Option<String>,

    /// Password (or set DRYDOCK_PASSWORD). Prompted without echo when absent.
    #[arg(short, long)]
    password: Option<String>,

    /// SSO login URL to exchange against, overriding the active context.
    #[arg(long)]
    sso_url: Option<String>,
}

/// Exchange credentials for a fresh token and print it, bare, on stdout.
/// Nothing is written to the config file.
pub async fn run(ctx: &mut CommandContext, args: GetTokenArgs) -> Result<()> {
    let sso_url = args
        .sso_url
        .unwrap_or_else(|| resolve::sso_target(&ctx.config).value);

    let credentials = LoginCredentials::gather(
        args.username.as_deref(),
        args.password.as_deref(),
        ctx.prompter.as_mut(),
    )?;

    let token = auth::exchange(&ctx.http, &sso_url, &credentials).await?;
    println!("{token}");
    Ok(())
}
