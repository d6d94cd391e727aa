//! `drydock get status` - unauthenticated health probes.

use anyhow::Result;

use super::CommandContext;
use crate::client::ApiRequest;
use crate::error::CliError;
use crate::output;

pub async fn run(ctx: &CommandContext) -> Result<()> {
    let cluster = ctx.cluster_url();
    let mut failure: Option<CliError> = None;

    for (label, url) in [
        ("Build service status:", format!("{cluster}/imagespaces/status")),
        ("Deployment service status:", format!("{cluster}/environments/status")),
    ] {
        let response = ctx.execute_unauthenticated(ApiRequest::get(url)).await?;

        output::print_info(label);
        output::print_body(&response.body);

        if !response.is_success() && failure.is_none() {
            failure = Some(CliError::Api {
                status: response.status.as_u16(),
                body: response.body,
            });
        }
    }

    // Both probes always print; an unhealthy service still fails the command.
    match failure {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testing::ScriptedPrompter;
    use crate::config::{ConfigStore, CONFIG_DIR, CONFIG_FILE};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn probe(cluster_url: &str) -> (tempfile::TempDir, Result<()>) {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join(CONFIG_DIR).join(CONFIG_FILE));
        let config = store
            .initialize("default", "https://sso.test", cluster_url)
            .unwrap();

        let ctx = CommandContext {
            store,
            config,
            http: reqwest::Client::new(),
            prompter: Box::new(ScriptedPrompter::new("unused", "unused")),
            verbose: false,
            token: None,
            org: None,
        };
        let result = run(&ctx).await;
        (dir, result)
    }

    #[tokio::test]
    async fn both_services_healthy_is_a_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/imagespaces/status"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/environments/status"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let (_dir, result) = probe(&server.uri()).await;
        result.unwrap();
    }

    #[tokio::test]
    async fn an_unhealthy_service_fails_after_both_probes_run() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/imagespaces/status"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .expect(1)
            .mount(&server)
            .await;
        // The second probe must still run after the first fails.
        Mock::given(method("GET"))
            .and(path("/environments/status"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let (_dir, result) = probe(&server.uri()).await;
        let err = result.unwrap_err();
        let cli_err = err.downcast_ref::<CliError>().unwrap();
        assert!(matches!(cli_err, CliError::Api { status: 503, .. }));
    }
}
