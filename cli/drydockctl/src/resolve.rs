//! Flag/environment/config resolution for targets and identity.
//!
//! Precedence is the same everywhere: explicit flag, then environment
//! variable, then the active context in the config file, then the built-in
//! default. Each resolved value remembers where it came from so `--verbose`
//! can report provenance.

use crate::config::{Config, DEFAULT_CLUSTER_URL, DEFAULT_SSO_URL};

pub const CLUSTER_TARGET_ENV: &str = "DRYDOCK_CLUSTER_TARGET";
pub const SSO_URL_ENV: &str = "DRYDOCK_SSO_URL";
pub const TOKEN_ENV: &str = "DRYDOCK_TOKEN";
pub const ORG_ENV: &str = "DRYDOCK_ORG";
pub const USERNAME_ENV: &str = "DRYDOCK_USERNAME";
pub const PASSWORD_ENV: &str = "DRYDOCK_PASSWORD";
pub const ENVIRONMENT_ENV: &str = "DRYDOCK_ENVIRONMENT";
pub const ROUTING_KEY_ENV: &str = "DRYDOCK_ROUTING_KEY";
pub const GATEWAY_TARGET_ENV: &str = "DRYDOCK_GATEWAY_TARGET";
pub const REGISTRY_ENV: &str = "DRYDOCK_REGISTRY";

/// Built-in gateway management API target.
pub const DEFAULT_GATEWAY_URL: &str = "https://gateway.drydock.io";

/// Built-in image registry host, used when composing pod-template-spec URLs.
pub const DEFAULT_REGISTRY: &str = "registry.drydock.io";

/// Domain under which provisioned environments receive their hostnames.
pub const APPS_DOMAIN: &str = "apps.drydock.io";

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Flag,
    Environment,
    ConfigFile,
    Default,
}

impl Source {
    pub fn describe(self) -> &'static str {
        match self {
            Source::Flag => "CLI flag",
            Source::Environment => "environment variable",
            Source::ConfigFile => "config file",
            Source::Default => "built-in default",
        }
    }
}

/// A resolved value plus its provenance.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub value: String,
    pub source: Source,
}

/// A non-empty environment variable, or `None`.
pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// The cluster target base URL: environment, then active context, then the
/// built-in default.
pub fn cluster_target(config: &Config) -> Resolved {
    if let Some(value) = env_var(CLUSTER_TARGET_ENV) {
        return Resolved { value, source: Source::Environment };
    }
    if let Some(url) = config.cluster_url() {
        return Resolved { value: url.to_string(), source: Source::ConfigFile };
    }
    Resolved {
        value: DEFAULT_CLUSTER_URL.to_string(),
        source: Source::Default,
    }
}

/// The SSO target base URL, resolved like [`cluster_target`].
pub fn sso_target(config: &Config) -> Resolved {
    if let Some(value) = env_var(SSO_URL_ENV) {
        return Resolved { value, source: Source::Environment };
    }
    if let Some(url) = config.sso_url() {
        return Resolved { value: url.to_string(), source: Source::ConfigFile };
    }
    Resolved {
        value: DEFAULT_SSO_URL.to_string(),
        source: Source::Default,
    }
}

/// The gateway management API base URL: environment, then the built-in
/// default. The gateway is not part of the context model.
pub fn gateway_target() -> Resolved {
    match env_var(GATEWAY_TARGET_ENV) {
        Some(value) => Resolved { value, source: Source::Environment },
        None => Resolved {
            value: DEFAULT_GATEWAY_URL.to_string(),
            source: Source::Default,
        },
    }
}

/// The image registry host used in pod-template-spec URLs.
pub fn registry() -> String {
    env_var(REGISTRY_ENV).unwrap_or_else(|| DEFAULT_REGISTRY.to_string())
}

/// First-run seed values for the default context: environment overrides,
/// otherwise the built-ins.
pub fn initial_targets() -> (String, String) {
    let sso = env_var(SSO_URL_ENV).unwrap_or_else(|| DEFAULT_SSO_URL.to_string());
    let cluster = env_var(CLUSTER_TARGET_ENV).unwrap_or_else(|| DEFAULT_CLUSTER_URL.to_string());
    (sso, cluster)
}
