//! One-shot HTTP execution against the platform APIs.
//!
//! Requests are described by [`ApiRequest`] rather than built directly on a
//! `reqwest` builder so the caller can send the same request twice: the
//! dispatch layer re-sends once after a forced re-authentication on 401.

use std::path::PathBuf;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};

use crate::error::CliError;

/// A fully-described, rebuildable request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub body: RequestBody,
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// Pre-serialized JSON passed through verbatim (e.g. a user-supplied
    /// patch document).
    RawJson(String),
    /// File contents streamed as the request body.
    File(PathBuf),
    /// Multipart form with one file part plus text fields.
    Multipart {
        file_field: String,
        file: PathBuf,
        fields: Vec<(String, String)>,
    },
}

impl ApiRequest {
    pub fn get(url: String) -> Self {
        Self { method: Method::GET, url, body: RequestBody::Empty }
    }

    pub fn delete(url: String) -> Self {
        Self { method: Method::DELETE, url, body: RequestBody::Empty }
    }

    pub fn post_json(url: String, body: serde_json::Value) -> Self {
        Self { method: Method::POST, url, body: RequestBody::Json(body) }
    }

    pub fn patch_json(url: String, body: serde_json::Value) -> Self {
        Self { method: Method::PATCH, url, body: RequestBody::Json(body) }
    }

    pub fn patch_raw(url: String, body: String) -> Self {
        Self { method: Method::PATCH, url, body: RequestBody::RawJson(body) }
    }

    pub fn post_file(url: String, file: PathBuf) -> Self {
        Self { method: Method::POST, url, body: RequestBody::File(file) }
    }

    pub fn post_multipart(url: String, file: PathBuf, fields: Vec<(String, String)>) -> Self {
        Self {
            method: Method::POST,
            url,
            body: RequestBody::Multipart {
                file_field: "file".to_string(),
                file,
                fields,
            },
        }
    }
}

/// Status plus the raw response body. Bodies are surfaced to the operator
/// verbatim, so they are kept as text rather than deserialized here.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Execute one request, optionally with a bearer token, and collect the
/// response body. Network failures and unreadable files are the only error
/// paths; a non-2xx status is returned to the caller to interpret.
pub async fn send(
    http: &reqwest::Client,
    request: &ApiRequest,
    token: Option<&str>,
) -> Result<ApiResponse, CliError> {
    let mut builder = http.request(request.method.clone(), &request.url);

    if let Some(token) = token {
        builder = builder.bearer_auth(token);
    }

    builder = match &request.body {
        RequestBody::Empty => builder,
        RequestBody::Json(value) => builder.json(value),
        RequestBody::RawJson(raw) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(raw.clone()),
        RequestBody::File(path) => {
            let contents = tokio::fs::read(path).await?;
            builder
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(contents)
        }
        RequestBody::Multipart { file_field, file, fields } => {
            let contents = tokio::fs::read(file).await?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload".to_string());

            let mut form = reqwest::multipart::Form::new().part(
                file_field.clone(),
                reqwest::multipart::Part::bytes(contents).file_name(file_name),
            );
            for (name, value) in fields {
                form = form.text(name.clone(), value.clone());
            }
            builder.multipart(form)
        }
    };

    let response = builder.send().await?;
    let status = response.status();
    let body = response.text().await?;

    Ok(ApiResponse { status, body })
}
