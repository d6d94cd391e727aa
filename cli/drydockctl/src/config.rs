//! Configuration and context management.
//!
//! The config file is a YAML document at `~/.drydockctl/config` holding a
//! named list of contexts (cluster target, SSO target, cached credentials)
//! plus the name of the active one, in the manner of a kubeconfig. Every
//! mutation rewrites the whole file; there is no locking, so concurrent
//! invocations against the same file race (last writer wins). That is
//! acceptable for a single-user interactive CLI and deliberately not fixed.

use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Config file directory under the user's home.
pub const CONFIG_DIR: &str = ".drydockctl";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config";

/// Built-in cluster target, used when neither a flag, an environment
/// variable, nor the config file supplies one.
pub const DEFAULT_CLUSTER_URL: &str = "https://api.drydock.io";

/// Built-in SSO target.
pub const DEFAULT_SSO_URL: &str = "https://login.drydock.io";

/// One deployment target: the management API endpoint and its login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Cluster {
    pub name: String,
    pub cluster_url: String,
    pub sso_url: String,
}

/// Cached user credentials. Both fields may be empty (no session yet).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub token: String,
}

/// A named profile: cluster target plus cached credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub name: String,
    pub cluster: Cluster,
    #[serde(default)]
    pub user: UserCredentials,
}

impl Context {
    fn new(name: &str, sso_url: &str, cluster_url: &str) -> Self {
        Self {
            name: name.to_string(),
            cluster: Cluster {
                name: name.to_string(),
                cluster_url: cluster_url.to_string(),
                sso_url: sso_url.to_string(),
            },
            user: UserCredentials::default(),
        }
    }
}

/// The persisted configuration: the active context name and the context list.
///
/// `current_context` must name an element of `contexts` whenever target or
/// token resolution runs; a stale name is a checked miss, never a panic. The
/// list keeps insertion order, which carries no meaning beyond display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub current_context: String,
    pub contexts: Vec<Context>,
}

impl Config {
    /// A config with a single context of the given name and empty credentials.
    pub fn new(name: &str, sso_url: &str, cluster_url: &str) -> Self {
        Self {
            current_context: name.to_string(),
            contexts: vec![Context::new(name, sso_url, cluster_url)],
        }
    }

    /// The active context, if `current_context` names an existing one.
    pub fn current_context(&self) -> Option<&Context> {
        self.contexts
            .iter()
            .find(|c| c.name == self.current_context)
    }

    /// The active context's cached token, if non-empty.
    pub fn current_token(&self) -> Option<&str> {
        self.current_context()
            .map(|c| c.user.token.as_str())
            .filter(|t| !t.is_empty())
    }

    /// The active context's username, if non-empty.
    pub fn current_username(&self) -> Option<&str> {
        self.current_context()
            .map(|c| c.user.username.as_str())
            .filter(|u| !u.is_empty())
    }

    /// The active context's cluster target URL.
    pub fn cluster_url(&self) -> Option<&str> {
        self.current_context().map(|c| c.cluster.cluster_url.as_str())
    }

    /// The active context's SSO target URL.
    pub fn sso_url(&self) -> Option<&str> {
        self.current_context().map(|c| c.cluster.sso_url.as_str())
    }
}

/// Load/save access to the config file at a fixed path.
///
/// The path is injectable so tests can point the store at a scratch file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// The per-user config file path, `<home>/.drydockctl/config`.
    pub fn default_path() -> Result<PathBuf, CliError> {
        let base = BaseDirs::new().ok_or(CliError::NoHomeDir)?;
        Ok(base.home_dir().join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// A store over the default per-user path.
    pub fn open_default() -> Result<Self, CliError> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a config file is present at the store's path.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Create the config directory (idempotent) and write a fresh config
    /// containing a single context with empty credentials.
    pub fn initialize(
        &self,
        default_context: &str,
        sso_url: &str,
        cluster_url: &str,
    ) -> Result<Config, CliError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let config = Config::new(default_context, sso_url, cluster_url);
        self.save(&config)?;
        Ok(config)
    }

    /// Read and deserialize the config file.
    pub fn load(&self) -> Result<Config, CliError> {
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Serialize and overwrite the config file in full.
    pub fn save(&self, config: &Config) -> Result<(), CliError> {
        let contents = serde_yaml::to_string(config)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }

    /// Switch the active context and persist. The name is validated before
    /// anything is mutated, so a failure leaves the config untouched.
    pub fn set_current_context(&self, config: &mut Config, name: &str) -> Result<(), CliError> {
        if !config.contexts.iter().any(|c| c.name == name) {
            return Err(CliError::UnknownContext(name.to_string()));
        }

        config.current_context = name.to_string();
        self.save(config)
    }

    /// Append a new context with empty credentials and persist. Context names
    /// are unique keys; a duplicate is rejected rather than silently
    /// shadowing the existing entry.
    pub fn add_context(
        &self,
        config: &mut Config,
        name: &str,
        sso_url: &str,
        cluster_url: &str,
    ) -> Result<(), CliError> {
        if config.contexts.iter().any(|c| c.name == name) {
            return Err(CliError::DuplicateContext(name.to_string()));
        }

        config.contexts.push(Context::new(name, sso_url, cluster_url));
        self.save(config)
    }

    /// Write credentials into the active context and persist.
    pub fn save_token(
        &self,
        config: &mut Config,
        username: &str,
        token: &str,
    ) -> Result<(), CliError> {
        let current = config.current_context.clone();
        let Some(context) = config.contexts.iter_mut().find(|c| c.name == current) else {
            return Err(CliError::NoCurrentContext(current));
        };

        context.user = UserCredentials {
            username: username.to_string(),
            token: token.to_string(),
        };
        self.save(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_store() -> (tempfile::TempDir, ConfigStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join(CONFIG_DIR).join(CONFIG_FILE));
        (dir, store)
    }

    #[test]
    fn fresh_install_initializes_one_default_context() {
        let (_dir, store) = scratch_store();
        assert!(!store.exists());

        store
            .initialize("default", "https://login.example.com", "https://api.example.com")
            .unwrap();
        assert!(store.exists());

        let config = store.load().unwrap();
        assert_eq!(config.current_context, "default");
        assert_eq!(config.contexts.len(), 1);

        let context = config.current_context().unwrap();
        assert_eq!(context.name, "default");
        assert_eq!(context.cluster.sso_url, "https://login.example.com");
        assert_eq!(context.cluster.cluster_url, "https://api.example.com");
        assert_eq!(context.user, UserCredentials::default());
    }

    #[test]
    fn initialize_is_idempotent_about_the_directory() {
        let (_dir, store) = scratch_store();
        store.initialize("default", "sso", "cluster").unwrap();
        store.initialize("default", "sso", "cluster").unwrap();
        assert!(store.exists());
    }

    #[test]
    fn save_load_round_trip_is_lossless() {
        let (_dir, store) = scratch_store();
        let mut config = store.initialize("default", "sso-a", "cluster-a").unwrap();
        store.add_context(&mut config, "e2e", "sso-b", "cluster-b").unwrap();
        store.save_token(&mut config, "admin@example.com", "abc123").unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn load_missing_file_is_an_io_error() {
        let (_dir, store) = scratch_store();
        assert!(matches!(store.load(), Err(CliError::Io(_))));
    }

    #[test]
    fn load_malformed_file_is_a_parse_error() {
        let (_dir, store) = scratch_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "current-context: [unterminated").unwrap();
        assert!(matches!(store.load(), Err(CliError::ConfigParse(_))));
    }

    #[test]
    fn set_current_context_rejects_unknown_names_without_mutating() {
        let (_dir, store) = scratch_store();
        let mut config = store.initialize("default", "sso", "cluster").unwrap();

        let err = store.set_current_context(&mut config, "nope").unwrap_err();
        assert!(matches!(err, CliError::UnknownContext(name) if name == "nope"));
        assert_eq!(config.current_context, "default");
        assert_eq!(store.load().unwrap().current_context, "default");
    }

    #[test]
    fn add_then_use_context_switches_the_active_context() {
        let (_dir, store) = scratch_store();
        let mut config = store.initialize("default", "sso", "cluster").unwrap();

        store
            .add_context(&mut config, "e2e", "sso-e2e", "cluster-e2e")
            .unwrap();
        store.set_current_context(&mut config, "e2e").unwrap();

        assert_eq!(config.current_context().unwrap().name, "e2e");
        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.current_context().unwrap().name, "e2e");
        assert_eq!(reloaded.cluster_url(), Some("cluster-e2e"));
    }

    #[test]
    fn add_context_rejects_duplicate_names() {
        let (_dir, store) = scratch_store();
        let mut config = store.initialize("default", "sso", "cluster").unwrap();

        let err = store
            .add_context(&mut config, "default", "sso-2", "cluster-2")
            .unwrap_err();
        assert!(matches!(err, CliError::DuplicateContext(name) if name == "default"));
        assert_eq!(config.contexts.len(), 1);
    }

    #[test]
    fn stale_current_context_is_a_checked_miss() {
        let config = Config {
            current_context: "gone".to_string(),
            contexts: vec![Context::new("default", "sso", "cluster")],
        };

        assert!(config.current_context().is_none());
        assert!(config.current_token().is_none());
        assert!(config.cluster_url().is_none());
    }

    #[test]
    fn save_token_writes_into_the_active_context_only() {
        let (_dir, store) = scratch_store();
        let mut config = store.initialize("default", "sso", "cluster").unwrap();
        store.add_context(&mut config, "e2e", "sso", "cluster").unwrap();

        store.save_token(&mut config, "admin@example.com", "abc123").unwrap();

        assert_eq!(config.current_token(), Some("abc123"));
        assert_eq!(config.current_username(), Some("admin@example.com"));
        let other = config.contexts.iter().find(|c| c.name == "e2e").unwrap();
        assert!(other.user.token.is_empty());
    }

    #[test]
    fn save_token_fails_when_the_active_context_is_missing() {
        let (_dir, store) = scratch_store();
        let mut config = store.initialize("default", "sso", "cluster").unwrap();
        config.current_context = "gone".to_string();

        let err = store.save_token(&mut config, "user", "token").unwrap_err();
        assert!(matches!(err, CliError::NoCurrentContext(name) if name == "gone"));
    }
}
