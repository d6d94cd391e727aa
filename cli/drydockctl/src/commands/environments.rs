//! Environment resource commands.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::{conclude, CommandContext};
use crate::client::ApiRequest;
use crate::resolve;

fn environments_url(ctx: &CommandContext) -> String {
    format!("{}/environments", ctx.cluster_url())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct NewEnvironment<'a> {
    environment_name: &'a str,
    host_names: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct HostnamePatch<'a> {
    host_names: &'a [String],
}

#[derive(Debug, Args)]
pub struct GetEnvironmentArgs {
    /// Environment name (or set DRYDOCK_ENVIRONMENT).
    #[arg(required_unless_present = "all", env = resolve::ENVIRONMENT_ENV)]
    name: Option<String>,

    /// Retrieve every environment the token can see.
    #[arg(long, conflicts_with = "name")]
    all: bool,
}

pub async fn get(ctx: &mut CommandContext, args: GetEnvironmentArgs) -> Result<()> {
    let url = match args.name {
        Some(name) => format!("{}/{name}", environments_url(ctx)),
        None => environments_url(ctx),
    };

    let response = ctx.execute(ApiRequest::get(url)).await?;
    conclude(&response, None)
}

#[derive(Debug, Args)]
pub struct CreateEnvironmentArgs {
    /// Environment name.
    name: String,

    /// Hostnames the environment accepts traffic for.
    #[arg(required = true)]
    hostnames: Vec<String>,
}

pub async fn create(ctx: &mut CommandContext, args: CreateEnvironmentArgs) -> Result<()> {
    let body = serde_json::to_value(NewEnvironment {
        environment_name: &args.name,
        host_names: &args.hostnames,
    })?;

    let response = ctx
        .execute(ApiRequest::post_json(environments_url(ctx), body))
        .await?;
    conclude(
        &response,
        Some(&format!("Environment '{}' created.", args.name)),
    )
}

#[derive(Debug, Args)]
pub struct DeleteEnvironmentArgs {
    /// Environment name (or set DRYDOCK_ENVIRONMENT).
    #[arg(env = resolve::ENVIRONMENT_ENV)]
    name: String,
}

pub async fn delete(ctx: &mut CommandContext, args: DeleteEnvironmentArgs) -> Result<()> {
    let url = format!("{}/{}", environments_url(ctx), args.name);
    let response = ctx.execute(ApiRequest::delete(url)).await?;
    conclude(
        &response,
        Some(&format!("Environment '{}' deleted.", args.name)),
    )
}

#[derive(Debug, Args)]
pub struct PatchEnvironmentArgs {
    /// Environment name (or set DRYDOCK_ENVIRONMENT).
    #[arg(env = resolve::ENVIRONMENT_ENV)]
    name: String,

    /// Replacement hostname set.
    #[arg(required = true)]
    hostnames: Vec<String>,
}

pub async fn patch(ctx: &mut CommandContext, args: PatchEnvironmentArgs) -> Result<()> {
    let url = format!("{}/{}", environments_url(ctx), args.name);
    let body = serde_json::to_value(HostnamePatch {
        host_names: &args.hostnames,
    })?;

    let response = ctx.execute(ApiRequest::patch_json(url, body)).await?;
    conclude(
        &response,
        Some(&format!("Environment '{}' updated.", args.name)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_bodies_use_the_service_field_names() {
        let hostnames = vec!["org1-env1.apps.drydock.io".to_string()];
        let body = serde_json::to_value(NewEnvironment {
            environment_name: "org1-env1",
            host_names: &hostnames,
        })
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "EnvironmentName": "org1-env1",
                "HostNames": ["org1-env1.apps.drydock.io"],
            })
        );

        let patch = serde_json::to_value(HostnamePatch { host_names: &hostnames }).unwrap();
        assert_eq!(
            patch,
            serde_json::json!({ "HostNames": ["org1-env1.apps.drydock.io"] })
        );
    }
}
