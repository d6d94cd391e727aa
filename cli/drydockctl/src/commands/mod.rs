//! CLI commands.

mod bundles;
mod config;
mod deploy;
mod deployments;
mod environments;
mod images;
mod login;
mod status;
mod token;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use reqwest::StatusCode;

use crate::auth::{self, LoginPrompter, TerminalPrompter};
use crate::client::{self, ApiRequest, ApiResponse};
use crate::config::{Config, ConfigStore};
use crate::error::CliError;
use crate::output;
use crate::resolve;

/// drydockctl - CLI for the Drydock build and deploy APIs.
///
/// Pair a verb (get, create, delete, patch) with a resource noun
/// (application, image, bundle, environment, deployment, status, token), or
/// use the top-level login/config/deploy commands.
#[derive(Debug, Parser)]
#[command(name = "drydock")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print resolved targets and every API call made.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Bearer token to authenticate with (or set DRYDOCK_TOKEN).
    #[arg(short, long, global = true)]
    token: Option<String>,

    /// Organization name (or set DRYDOCK_ORG).
    #[arg(short, long, global = true, env = resolve::ORG_ENV)]
    org: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Obtain a token from the SSO endpoint and store it in the active context.
    Login(login::LoginArgs),

    /// Inspect and modify the local configuration contexts.
    Config(config::ConfigCommand),

    /// Retrieve platform resources.
    Get(GetCommand),

    /// Create platform resources.
    Create(CreateCommand),

    /// Delete platform resources.
    Delete(DeleteCommand),

    /// Update platform resources.
    Patch(PatchCommand),

    /// Upload a generated proxy bundle to the gateway API.
    UploadBundle(bundles::UploadBundleArgs),

    /// Build, provision, and deploy an application archive end to end.
    Deploy(deploy::DeployArgs),

    /// Show CLI version.
    Version,
}

#[derive(Debug, Args)]
struct GetCommand {
    #[command(subcommand)]
    resource: GetResource,
}

#[derive(Debug, Subcommand)]
enum GetResource {
    /// List all applications in the organization's imagespace.
    Applications,

    /// Retrieve a built image, or all images of an application.
    Image(images::GetImageArgs),

    /// Retrieve an active environment, or all environments.
    Environment(environments::GetEnvironmentArgs),

    /// Retrieve an active deployment, or all deployments in an environment.
    Deployment(deployments::GetDeploymentArgs),

    /// Retrieve an active deployment's logs.
    Logs(deployments::GetLogsArgs),

    /// Health of the build and deployment services.
    Status,

    /// Obtain a fresh token from the SSO endpoint without storing it.
    Token(token::GetTokenArgs),
}

#[derive(Debug, Args)]
struct CreateCommand {
    #[command(subcommand)]
    resource: CreateResource,
}

#[derive(Debug, Subcommand)]
enum CreateResource {
    /// Create a new environment with accepted hostnames.
    Environment(environments::CreateEnvironmentArgs),

    /// Create a new deployment in an environment.
    Deployment(deployments::CreateDeploymentArgs),

    /// Build an application image from a zipped source archive.
    Image(images::CreateImageArgs),

    /// Generate a proxy bundle archive from the built-in templates.
    Bundle(bundles::CreateBundleArgs),
}

#[derive(Debug, Args)]
struct DeleteCommand {
    #[command(subcommand)]
    resource: DeleteResource,
}

#[derive(Debug, Subcommand)]
enum DeleteResource {
    /// Delete an active environment.
    Environment(environments::DeleteEnvironmentArgs),

    /// Delete an active deployment.
    Deployment(deployments::DeleteDeploymentArgs),

    /// Delete a built image.
    Image(images::DeleteImageArgs),
}

#[derive(Debug, Args)]
struct PatchCommand {
    #[command(subcommand)]
    resource: PatchResource,
}

#[derive(Debug, Subcommand)]
enum PatchResource {
    /// Replace an environment's hostnames.
    Environment(environments::PatchEnvironmentArgs),

    /// Update an active deployment from a JSON document.
    Deployment(deployments::PatchDeploymentArgs),
}

impl Cli {
    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        let store = ConfigStore::open_default()?;

        // First run: seed a default context from the environment or the
        // built-in targets.
        let config = if store.exists() {
            store.load()?
        } else {
            output::print_info(&format!(
                "No config file found. Creating one at {}",
                store.path().display()
            ));
            let (sso, cluster) = resolve::initial_targets();
            store.initialize("default", &sso, &cluster)?
        };

        let mut ctx = CommandContext {
            store,
            config,
            http: reqwest::Client::new(),
            prompter: Box::new(TerminalPrompter),
            verbose: self.verbose,
            token: self.token,
            org: self.org,
        };

        match self.command {
            Commands::Login(args) => login::run(ctx, args).await,
            Commands::Config(cmd) => cmd.run(ctx),
            Commands::Get(cmd) => match cmd.resource {
                GetResource::Applications => images::get_applications(&mut ctx).await,
                GetResource::Image(args) => images::get_image(&mut ctx, args).await,
                GetResource::Environment(args) => environments::get(&mut ctx, args).await,
                GetResource::Deployment(args) => deployments::get(&mut ctx, args).await,
                GetResource::Logs(args) => deployments::get_logs(&mut ctx, args).await,
                GetResource::Status => status::run(&ctx).await,
                GetResource::Token(args) => token::run(&mut ctx, args).await,
            },
            Commands::Create(cmd) => match cmd.resource {
                CreateResource::Environment(args) => environments::create(&mut ctx, args).await,
                CreateResource::Deployment(args) => deployments::create(&mut ctx, args).await,
                CreateResource::Image(args) => images::create(&mut ctx, args).await,
                CreateResource::Bundle(args) => bundles::create(&ctx, args),
            },
            Commands::Delete(cmd) => match cmd.resource {
                DeleteResource::Environment(args) => environments::delete(&mut ctx, args).await,
                DeleteResource::Deployment(args) => deployments::delete(&mut ctx, args).await,
                DeleteResource::Image(args) => images::delete(&mut ctx, args).await,
            },
            Commands::Patch(cmd) => match cmd.resource {
                PatchResource::Environment(args) => environments::patch(&mut ctx, args).await,
                PatchResource::Deployment(args) => deployments::patch(&mut ctx, args).await,
            },
            Commands::UploadBundle(args) => bundles::upload(&mut ctx, args).await,
            Commands::Deploy(args) => deploy::run(&mut ctx, args).await,
            Commands::Version => {
                println!("drydock {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Shared command context, constructed once per invocation from the parsed
/// flags and the loaded config. Command handlers receive it instead of
/// consulting process-wide state.
pub struct CommandContext {
    pub store: ConfigStore,
    pub config: Config,
    pub http: reqwest::Client,
    pub prompter: Box<dyn LoginPrompter>,
    pub verbose: bool,
    pub token: Option<String>,
    pub org: Option<String>,
}

impl CommandContext {
    /// The cluster target base URL (environment > config > default).
    pub fn cluster_url(&self) -> String {
        resolve::cluster_target(&self.config).value
    }

    /// Require an organization (flag or DRYDOCK_ORG).
    pub fn require_org(&self) -> Result<&str> {
        self.org
            .as_deref()
            .filter(|o| !o.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("Missing required organization. Use --org or set DRYDOCK_ORG.")
            })
    }

    /// Resolve a token, send the request, and on a 401 force exactly one
    /// re-authentication and retry. A second 401 fails the command.
    pub async fn execute(&mut self, request: ApiRequest) -> Result<ApiResponse, CliError> {
        if self.verbose {
            output::verbose_targets(
                &resolve::cluster_target(&self.config),
                &resolve::sso_target(&self.config),
                self.org.as_deref(),
            );
            output::verbose_request(&request);
        }

        let token = auth::resolve_token(
            &self.http,
            &self.store,
            &mut self.config,
            self.token.as_deref(),
            self.prompter.as_mut(),
        )
        .await?;

        let response = client::send(&self.http, &request, Some(&token)).await?;
        if self.verbose {
            output::verbose_response(&response);
        }
        if response.status != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        output::print_warning("Your token was rejected (HTTP 401). Re-authenticating.");
        let token = auth::login(
            &self.http,
            &self.store,
            &mut self.config,
            None,
            None,
            self.prompter.as_mut(),
        )
        .await?;

        let response = client::send(&self.http, &request, Some(&token)).await?;
        if self.verbose {
            output::verbose_response(&response);
        }
        if response.status == StatusCode::UNAUTHORIZED {
            let username = self
                .config
                .current_username()
                .unwrap_or_default()
                .to_string();
            return Err(CliError::AuthenticationExpired { username });
        }

        Ok(response)
    }

    /// Send a request without a bearer token (status endpoints).
    pub async fn execute_unauthenticated(
        &self,
        request: ApiRequest,
    ) -> Result<ApiResponse, CliError> {
        if self.verbose {
            output::verbose_request(&request);
        }
        let response = client::send(&self.http, &request, None).await?;
        if self.verbose {
            output::verbose_response(&response);
        }
        Ok(response)
    }
}

/// Surface the response body verbatim, then derive the outcome from the
/// status: 2xx prints the success message (when given) and succeeds, anything
/// else fails the command with a non-zero exit.
pub(crate) fn conclude(response: &ApiResponse, success_message: Option<&str>) -> Result<()> {
    output::print_body(&response.body);

    if response.is_success() {
        if let Some(message) = success_message {
            output::print_success(message);
        }
        return Ok(());
    }

    Err(CliError::Api {
        status: response.status.as_u16(),
        body: response.body.clone(),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testing::ScriptedPrompter;
    use crate::config::{CONFIG_DIR, CONFIG_FILE};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn context_for(sso_url: &str, cached_token: &str) -> (tempfile::TempDir, CommandContext) {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join(CONFIG_DIR).join(CONFIG_FILE));
        let mut config = store
            .initialize("default", sso_url, "https://cluster.test")
            .unwrap();
        store
            .save_token(&mut config, "admin@example.com", cached_token)
            .unwrap();

        let ctx = CommandContext {
            store,
            config,
            http: reqwest::Client::new(),
            prompter: Box::new(ScriptedPrompter::new("admin@example.com", "hunter2")),
            verbose: false,
            token: None,
            org: None,
        };
        (dir, ctx)
    }

    #[tokio::test]
    async fn a_401_triggers_exactly_one_reauthentication_and_retry() {
        let server = MockServer::start().await;

        // The API rejects the stale token once, then accepts the fresh one.
        Mock::given(method("GET"))
            .and(path("/environments"))
            .respond_with(ResponseTemplate::new(401))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/environments"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "access_token": "fresh-token"
                })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (_dir, mut ctx) = context_for(&server.uri(), "stale-token");
        let request = ApiRequest::get(format!("{}/environments", server.uri()));

        let response = ctx.execute(request).await.unwrap();
        assert!(response.is_success());
        assert_eq!(ctx.store.load().unwrap().current_token(), Some("fresh-token"));
    }

    #[tokio::test]
    async fn a_second_401_is_fatal_with_a_relogin_instruction() {
        let server = MockServer::start().await;

        // Two calls total: original and the single retry. expect(2) fails
        // the test if the shell ever loops a third time.
        Mock::given(method("GET"))
            .and(path("/environments"))
            .respond_with(ResponseTemplate::new(401))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "access_token": "still-rejected"
                })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (_dir, mut ctx) = context_for(&server.uri(), "stale-token");
        let request = ApiRequest::get(format!("{}/environments", server.uri()));

        let err = ctx.execute(request).await.unwrap_err();
        assert!(
            matches!(err, CliError::AuthenticationExpired { ref username } if username == "admin@example.com")
        );
    }

    #[tokio::test]
    async fn successful_responses_do_not_touch_the_sso_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/environments"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let (_dir, mut ctx) = context_for(&server.uri(), "good-token");
        let request = ApiRequest::get(format!("{}/environments", server.uri()));

        let response = ctx.execute(request).await.unwrap();
        assert_eq!(response.body, "[]");
    }

    #[test]
    fn conclude_fails_on_non_2xx() {
        let response = ApiResponse {
            status: StatusCode::BAD_GATEWAY,
            body: "upstream sad".to_string(),
        };
        let err = conclude(&response, None).unwrap_err();
        let cli_err = err.downcast_ref::<CliError>().unwrap();
        assert!(matches!(cli_err, CliError::Api { status: 502, .. }));
    }
}
