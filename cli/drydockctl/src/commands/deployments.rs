//! Deployment resource commands.

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;

use super::{conclude, CommandContext};
use crate::client::ApiRequest;
use crate::resolve;

fn deployments_url(ctx: &CommandContext, environment: &str) -> String {
    format!("{}/environments/{environment}/deployments", ctx.cluster_url())
}

/// Deployment document in the shape the deployment service expects.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct DeploymentSpec {
    pub deployment_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_hosts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_hosts: Option<String>,
    pub replicas: u32,
    pub pts_url: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub env_vars: Vec<EnvVar>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct EnvVar {
    pub name: String,
    pub value: String,
}

/// Parse a `NAME=VALUE` pair. The value may itself contain `=`.
pub(crate) fn parse_env_var(raw: &str) -> Result<EnvVar> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok(EnvVar {
            name: name.to_string(),
            value: value.to_string(),
        }),
        _ => bail!("Invalid environment variable '{raw}'. Expected NAME=VALUE."),
    }
}

#[derive(Debug, Args)]
pub struct GetDeploymentArgs {
    /// Environment name (or set DRYDOCK_ENVIRONMENT).
    #[arg(env = resolve::ENVIRONMENT_ENV)]
    environment: String,

    /// Deployment name.
    #[arg(required_unless_present = "all")]
    name: Option<String>,

    /// Retrieve every deployment in the environment.
    #[arg(long, conflicts_with = "name")]
    all: bool,
}

pub async fn get(ctx: &mut CommandContext, args: GetDeploymentArgs) -> Result<()> {
    let base = deployments_url(ctx, &args.environment);
    let url = match args.name {
        Some(name) => format!("{base}/{name}"),
        None => base,
    };

    let response = ctx.execute(ApiRequest::get(url)).await?;
    conclude(&response, None)
}

#[derive(Debug, Args)]
pub struct GetLogsArgs {
    /// Environment name (or set DRYDOCK_ENVIRONMENT).
    #[arg(env = resolve::ENVIRONMENT_ENV)]
    environment: String,

    /// Deployment name.
    name: String,

    /// Logs of the previous instance instead of the running one.
    #[arg(long)]
    previous: bool,
}

pub async fn get_logs(ctx: &mut CommandContext, args: GetLogsArgs) -> Result<()> {
    let mut url = format!(
        "{}/{}/logs",
        deployments_url(ctx, &args.environment),
        args.name
    );
    if args.previous {
        url.push_str("?previous=true");
    }

    let response = ctx.execute(ApiRequest::get(url)).await?;
    conclude(&response, None)
}

#[derive(Debug, Args)]
pub struct CreateDeploymentArgs {
    /// Environment name (or set DRYDOCK_ENVIRONMENT).
    #[arg(env = resolve::ENVIRONMENT_ENV)]
    environment: String,

    /// Deployment name.
    name: String,

    /// Hostname for public traffic.
    public_host: String,

    /// Hostname for internal traffic.
    private_host: String,

    /// Number of replicas to run.
    replicas: u32,

    /// Pod template spec URL for the image to run.
    pts_url: String,

    /// Environment variables for the deployment, as NAME=VALUE.
    #[arg(short = 'e', long = "env-var")]
    env_vars: Vec<String>,
}

pub async fn create(ctx: &mut CommandContext, args: CreateDeploymentArgs) -> Result<()> {
    let env_vars = args
        .env_vars
        .iter()
        .map(|raw| parse_env_var(raw))
        .collect::<Result<Vec<_>>>()?;

    let spec = DeploymentSpec {
        deployment_name: args.name.clone(),
        public_hosts: Some(args.public_host),
        private_hosts: Some(args.private_host),
        replicas: args.replicas,
        pts_url: args.pts_url,
        env_vars,
    };

    let url = deployments_url(ctx, &args.environment);
    let response = ctx
        .execute(ApiRequest::post_json(url, serde_json::to_value(&spec)?))
        .await?;
    conclude(
        &response,
        Some(&format!(
            "Deployment '{}' created in '{}'.",
            args.name, args.environment
        )),
    )
}

#[derive(Debug, Args)]
pub struct DeleteDeploymentArgs {
    /// Environment name (or set DRYDOCK_ENVIRONMENT).
    #[arg(env = resolve::ENVIRONMENT_ENV)]
    environment: String,

    /// Deployment name.
    name: String,
}

pub async fn delete(ctx: &mut CommandContext, args: DeleteDeploymentArgs) -> Result<()> {
    let url = format!("{}/{}", deployments_url(ctx, &args.environment), args.name);
    let response = ctx.execute(ApiRequest::delete(url)).await?;
    conclude(
        &response,
        Some(&format!("Deployment '{}' deleted.", args.name)),
    )
}

#[derive(Debug, Args)]
pub struct PatchDeploymentArgs {
    /// Environment name (or set DRYDOCK_ENVIRONMENT).
    #[arg(env = resolve::ENVIRONMENT_ENV)]
    environment: String,

    /// Deployment name.
    name: String,

    /// JSON document with the fields to update.
    document: String,
}

pub async fn patch(ctx: &mut CommandContext, args: PatchDeploymentArgs) -> Result<()> {
    // Fail on malformed input before anything reaches the wire; the body is
    // still sent verbatim.
    if let Err(err) = serde_json::from_str::<serde_json::Value>(&args.document) {
        bail!("Patch document is not valid JSON: {err}");
    }

    let url = format!("{}/{}", deployments_url(ctx, &args.environment), args.name);
    let response = ctx.execute(ApiRequest::patch_raw(url, args.document)).await?;
    conclude(
        &response,
        Some(&format!("Deployment '{}' updated.", args.name)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deployment_spec_serializes_with_service_field_names() {
        let spec = DeploymentSpec {
            deployment_name: "shop".to_string(),
            public_hosts: Some("org1-env1.apps.drydock.io".to_string()),
            private_hosts: None,
            replicas: 2,
            pts_url: "https://api.drydock.io/imagespaces/generatepodspec".to_string(),
            env_vars: vec![EnvVar {
                name: "PORT".to_string(),
                value: "9000".to_string(),
            }],
        };

        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            serde_json::json!({
                "DeploymentName": "shop",
                "PublicHosts": "org1-env1.apps.drydock.io",
                "Replicas": 2,
                "PtsUrl": "https://api.drydock.io/imagespaces/generatepodspec",
                "EnvVars": [{ "Name": "PORT", "Value": "9000" }],
            })
        );
    }

    #[test]
    fn env_var_pairs_split_on_the_first_equals_only() {
        let var = parse_env_var("DATABASE_URL=postgres://u:p@host/db?sslmode=require").unwrap();
        assert_eq!(var.name, "DATABASE_URL");
        assert_eq!(var.value, "postgres://u:p@host/db?sslmode=require");

        assert!(parse_env_var("NOVALUE").is_err());
        assert!(parse_env_var("=orphan").is_err());
    }
}
