//! Gateway management API calls: proxy listing and bundle import.
//!
//! The gateway is a separate collaborator from the cluster's build and
//! deployment services; its base URL comes from `DRYDOCK_GATEWAY_TARGET` or
//! the built-in default, never from the context model.

use std::path::Path;

use crate::client::{self, ApiRequest};
use crate::error::CliError;

/// Names of the proxies already present in the org.
pub async fn list_proxies(
    http: &reqwest::Client,
    gateway_url: &str,
    org: &str,
    token: &str,
) -> Result<Vec<String>, CliError> {
    let request = ApiRequest::get(format!("{gateway_url}/v1/orgs/{org}/apis"));
    let response = client::send(http, &request, Some(token)).await?;

    if !response.is_success() {
        return Err(CliError::Api {
            status: response.status.as_u16(),
            body: response.body,
        });
    }

    Ok(serde_json::from_str(&response.body)?)
}

/// Import a bundle archive as a new proxy named `name`. Returns the raw
/// response body for display.
pub async fn upload_bundle(
    http: &reqwest::Client,
    gateway_url: &str,
    org: &str,
    name: &str,
    token: &str,
    zip_path: &Path,
) -> Result<String, CliError> {
    let request = ApiRequest::post_file(
        format!("{gateway_url}/v1/orgs/{org}/apis?action=import&name={name}"),
        zip_path.to_path_buf(),
    );
    let response = client::send(http, &request, Some(token)).await?;

    if !response.is_success() {
        return Err(CliError::Api {
            status: response.status.as_u16(),
            body: response.body,
        });
    }

    Ok(response.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn list_proxies_parses_the_name_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/orgs/org1/apis"))
            .and(header("authorization", "Bearer abc123"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!(["shop", "checkout"])),
            )
            .mount(&server)
            .await;

        let list = list_proxies(&reqwest::Client::new(), &server.uri(), "org1", "abc123")
            .await
            .unwrap();
        assert_eq!(list, vec!["shop", "checkout"]);
    }

    #[tokio::test]
    async fn upload_bundle_posts_the_archive_to_the_import_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/orgs/org1/apis"))
            .and(query_param("action", "import"))
            .and(query_param("name", "shop"))
            .respond_with(ResponseTemplate::new(201).set_body_string("imported"))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("shop.zip");
        std::fs::write(&zip_path, b"zip bytes").unwrap();

        let body = upload_bundle(
            &reqwest::Client::new(),
            &server.uri(),
            "org1",
            "shop",
            "abc123",
            &zip_path,
        )
        .await
        .unwrap();
        assert_eq!(body, "imported");
    }

    #[tokio::test]
    async fn gateway_failures_surface_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/orgs/org1/apis"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = list_proxies(&reqwest::Client::new(), &server.uri(), "org1", "abc123")
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Api { status: 403, .. }));
    }
}
