//! `drydock deploy` - the composite build-provision-deploy-expose flow.
//!
//! One invocation takes a zipped application archive all the way to a routed
//! deployment: build (or reuse) the image, ensure the org's environment
//! exists, create or update the deployment, and import a gateway proxy for
//! it. Each step is the same API call the standalone commands make.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use reqwest::StatusCode;

use super::bundles::{environment_host, split_public_path};
use super::deployments::{parse_env_var, DeploymentSpec};
use super::{images, CommandContext};
use crate::auth;
use crate::bundle::{write_bundle, BundleSpec};
use crate::client::{ApiRequest, ApiResponse};
use crate::error::CliError;
use crate::gateway;
use crate::output;
use crate::resolve;

#[derive(Debug, Args)]
pub struct DeployArgs {
    /// Application name.
    application: String,

    /// Image revision to build and deploy.
    revision: String,

    /// Public path in `port:basePath` form, e.g. `9000:/shop`.
    public_path: String,

    /// Zipped application source archive.
    zip_path: PathBuf,

    /// Environment name (or set DRYDOCK_ENVIRONMENT).
    #[arg(short, long, env = resolve::ENVIRONMENT_ENV)]
    environment: String,

    /// Routing public key (or set DRYDOCK_ROUTING_KEY).
    #[arg(long, env = resolve::ROUTING_KEY_ENV)]
    routing_key: String,

    /// Number of replicas to run.
    #[arg(short, long, default_value_t = 1)]
    replicas: u32,

    /// Environment variables for the deployment, as NAME=VALUE.
    #[arg(short = 'v', long = "env-var")]
    env_vars: Vec<String>,
}

fn api_failure(response: ApiResponse) -> CliError {
    CliError::Api {
        status: response.status.as_u16(),
        body: response.body,
    }
}

pub async fn run(ctx: &mut CommandContext, args: DeployArgs) -> Result<()> {
    let org = ctx.require_org()?.to_string();
    let cluster = ctx.cluster_url();
    let (_, base_path) = split_public_path(&args.public_path)?;
    let base_path = base_path.to_string();

    let env_vars = args
        .env_vars
        .iter()
        .map(|raw| parse_env_var(raw))
        .collect::<Result<Vec<_>>>()?;

    // Step 1: the image. A 404 means no such revision yet; an existing
    // revision is only rebuilt with the operator's consent.
    let image_url = format!(
        "{cluster}/imagespaces/{org}/applications/{}/images/{}",
        args.application, args.revision
    );
    let response = ctx.execute(ApiRequest::get(image_url.clone())).await?;
    let build = match response.status {
        StatusCode::NOT_FOUND => true,
        status if status.is_success() => {
            let rebuild = ctx.prompter.confirm(&format!(
                "Image '{}:{}' already exists. Rebuild and overwrite it?",
                args.application, args.revision
            ))?;
            if rebuild {
                let response = ctx.execute(ApiRequest::delete(image_url)).await?;
                if !response.is_success() {
                    return Err(api_failure(response).into());
                }
            } else {
                output::print_info("Using the existing image.");
            }
            rebuild
        }
        _ => return Err(api_failure(response).into()),
    };

    if build {
        images::build_image(
            ctx,
            &org,
            &args.application,
            &args.revision,
            &args.public_path,
            args.zip_path.clone(),
        )
        .await?;
    }

    // Step 2: the environment, named {org}-{environment} and accepting
    // traffic on its canonical hostname.
    let env_name = format!("{org}-{}", args.environment);
    let host = environment_host(&org, &args.environment);
    let env_url = format!("{cluster}/environments/{env_name}");

    let response = ctx.execute(ApiRequest::get(env_url)).await?;
    match response.status {
        StatusCode::NOT_FOUND => {
            let body = serde_json::json!({
                "EnvironmentName": env_name,
                "HostNames": [host],
            });
            let response = ctx
                .execute(ApiRequest::post_json(format!("{cluster}/environments"), body))
                .await?;
            if !response.is_success() {
                return Err(api_failure(response).into());
            }
            output::print_info(&format!("Environment '{env_name}' created."));
        }
        status if status.is_success() => {
            output::print_info(&format!("Environment '{env_name}' already exists."));
        }
        _ => return Err(api_failure(response).into()),
    }

    // Step 3: the deployment, pointed at the freshly built image through a
    // generated pod template spec.
    let pts_url = format!(
        "{cluster}/imagespaces/generatepodspec?imageURI={}/{org}/{}:{}&publicPath={}",
        resolve::registry(),
        args.application,
        args.revision,
        args.public_path
    );
    let deployment_url = format!(
        "{cluster}/environments/{env_name}/deployments/{}",
        args.application
    );

    let response = ctx.execute(ApiRequest::get(deployment_url.clone())).await?;
    match response.status {
        StatusCode::NOT_FOUND => {
            let spec = DeploymentSpec {
                deployment_name: args.application.clone(),
                public_hosts: Some(host.clone()),
                private_hosts: Some(host.clone()),
                replicas: args.replicas,
                pts_url: pts_url.clone(),
                env_vars,
            };
            let response = ctx
                .execute(ApiRequest::post_json(
                    format!("{cluster}/environments/{env_name}/deployments"),
                    serde_json::to_value(&spec)?,
                ))
                .await?;
            if !response.is_success() {
                return Err(api_failure(response).into());
            }
            output::print_info(&format!("Deployment '{}' created.", args.application));
        }
        status if status.is_success() => {
            let update = ctx.prompter.confirm(&format!(
                "Deployment '{}' already exists in '{env_name}'. Point it at '{}:{}'?",
                args.application, args.application, args.revision
            ))?;
            if update {
                let body = serde_json::json!({
                    "PtsUrl": pts_url,
                    "Replicas": args.replicas,
                });
                let response = ctx
                    .execute(ApiRequest::patch_json(deployment_url, body))
                    .await?;
                if !response.is_success() {
                    return Err(api_failure(response).into());
                }
                output::print_info(&format!("Deployment '{}' updated.", args.application));
            } else {
                output::print_info("Leaving the existing deployment unchanged.");
            }
        }
        _ => return Err(api_failure(response).into()),
    }

    // Step 4: the gateway proxy. An existing proxy keeps routing to the
    // environment host, so there is nothing to import again.
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
    if existing.iter().any(|p| p == &args.application) {
        output::print_info(&format!(
            "Proxy '{}' already exists. Skipping the gateway import.",
            args.application
        ));
    } else {
        let spec = BundleSpec::new(&args.application, &base_path, &host, &args.routing_key);
        let scratch = tempfile::tempdir()?;
        let zip_path = scratch.path().join(format!("{}.zip", args.application));
        write_bundle(&zip_path, &spec)?;

        let body = gateway::upload_bundle(
            &ctx.http,
            &gateway_url,
            &org,
            &args.application,
            &token,
            &zip_path,
        )
        .await?;
        output::print_body(&body);
        output::print_info(&format!("Proxy '{}' imported.", args.application));
    }

    output::print_success(&format!(
        "Deployed '{}:{}' to '{env_name}' at https://{host}{base_path}.",
        args.application, args.revision
    ));
    Ok(())
}

