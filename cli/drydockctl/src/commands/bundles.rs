//! Proxy bundle commands: generation and gateway import.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use super::CommandContext;
use crate::auth;
use crate::bundle::{write_bundle, BundleSpec};
use crate::gateway;
use crate::output;
use crate::resolve;

/// Hostname the gateway routes to for a provisioned environment.
pub(crate) fn environment_host(org: &str, environment: &str) -> String {
    format!("{org}-{environment}.{}", resolve::APPS_DOMAIN)
}

/// Split a `port:basePath` public path into its halves.
pub(crate) fn split_public_path(public_path: &str) -> Result<(&str, &str)> {
    match public_path.split_once(':') {
        Some((port, base_path))
            if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) =>
        {
            Ok((port, base_path))
        }
        _ => bail!("Invalid public path '{public_path}'. Expected port:basePath, e.g. 9000:/shop."),
    }
}

#[derive(Debug, Args)]
pub struct CreateBundleArgs {
    /// Application name; also the proxy name.
    name: String,

    /// Environment name (or set DRYDOCK_ENVIRONMENT).
    #[arg(short, long, env = resolve::ENVIRONMENT_ENV)]
    environment: String,

    /// Routing public key (or set DRYDOCK_ROUTING_KEY).
    #[arg(long, env = resolve::ROUTING_KEY_ENV)]
    routing_key: String,

    /// Proxy base path on the gateway. Defaults to `/<name>`.
    #[arg(long, conflicts_with = "public_path")]
    base_path: Option<String>,

    /// Public path in `port:basePath` form; its path half becomes the proxy
    /// base path.
    #[arg(long)]
    public_path: Option<String>,

    /// Directory to write the archive into. Defaults to the current directory.
    #[arg(long)]
    save: Option<PathBuf>,
}

pub fn create(ctx: &CommandContext, args: CreateBundleArgs) -> Result<()> {
    let org = ctx.require_org()?;
    let base_path = match (&args.base_path, &args.public_path) {
        (Some(base_path), _) => base_path.clone(),
        (None, Some(public_path)) => split_public_path(public_path)?.1.to_string(),
        (None, None) => format!("/{}", args.name),
    };
    let target_host = environment_host(org, &args.environment);

    let spec = BundleSpec::new(&args.name, &base_path, &target_host, &args.routing_key);
    let dir = args.save.unwrap_or_else(|| PathBuf::from("."));
    let zip_path = dir.join(format!("{}.zip", args.name));

    write_bundle(&zip_path, &spec)?;
    output::print_success(&format!("Bundle written to {}.", zip_path.display()));
    Ok(())
}

#[derive(Debug, Args)]
pub struct UploadBundleArgs {
    /// Proxy name to import the bundle as.
    name: String,

    /// Bundle archive to upload.
    zip_path: PathBuf,
}

pub async fn upload(ctx: &mut CommandContext, args: UploadBundleArgs) -> Result<()> {
    let org = ctx.require_org()?.to_string();
    let gateway_url = resolve::gateway_target().value;

    let token = auth::resolve_token(
        &ctx.http,
        &ctx.store,
        &mut ctx.config,
        ctx.token.as_deref(),
        ctx.prompter.as_mut(),
    )
    .await?;

    let existing = gateway::list_proxies(&ctx.http, &gateway_url, &org, &token).await?;
    if existing.iter().any(|p| p == &args.name) {
        bail!(
            "A proxy named '{}' already exists in org '{org}'. Delete it on the gateway first.",
            args.name
        );
    }

    let body = gateway::upload_bundle(
        &ctx.http,
        &gateway_url,
        &org,
        &args.name,
        &token,
        &args.zip_path,
    )
    .await?;

    output::print_body(&body);
    output::print_success(&format!("Proxy '{}' imported.", args.name));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_hosts_compose_org_and_environment() {
        assert_eq!(
            environment_host("org1", "test"),
            "org1-test.apps.drydock.io"
        );
    }

    #[test]
    fn public_paths_split_into_port_and_base_path() {
        let (port, base_path) = split_public_path("9000:/shop").unwrap();
        assert_eq!(port, "9000");
        assert_eq!(base_path, "/shop");

        assert!(split_public_path("no-port").is_err());
        assert!(split_public_path(":/shop").is_err());
        assert!(split_public_path("web:/shop").is_err());
    }
}
