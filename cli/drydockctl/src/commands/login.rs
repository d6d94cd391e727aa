//! `drydock login`

use anyhow::Result;
use clap::Args;

use super::CommandContext;
use crate::auth;
use crate::output;

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (or set DRYDOCK_USERNAME). Prompted when absent.
    #[arg(short, long)]
    username: Option<String>,

    /// Password (or set DRYDOCK_PASSWORD). Prompted without echo when absent.
    #[arg(short, long)]
    password: Option<String>,
}

pub async fn run(mut ctx: CommandContext, args: LoginArgs) -> Result<()> {
    auth::login(
        &ctx.http,
        &ctx.store,
        &mut ctx.config,
        args.username.as_deref(),
        args.password.as_deref(),
        ctx.prompter.as_mut(),
    )
    .await?;

    let username = ctx.config.current_username().unwrap_or_default();
    output::print_success(&format!(
        "Logged in as '{}'. Token written to {}.",
        username,
        ctx.store.path().display()
    ));
    Ok(())
}
