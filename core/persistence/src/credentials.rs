//! FILENAME: core/persistence/src/credentials.rs
//! PURPOSE: Resolves service-account credentials for the sheet source.
//! CONTEXT: Three places are checked in order: an environment variable holding
//! the key JSON, a secret-store file holding the same object under a key, and a
//! local key file. The first one that is present and parses wins.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::LoadError;

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// A service-account key as issued by the sheet provider.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub project_id: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

// Keeps the private key out of logs.
impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("key_type", &self.key_type)
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .finish_non_exhaustive()
    }
}

/// Where a set of credentials came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialOrigin {
    Environment,
    SecretStore,
    KeyFile,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub key: ServiceAccountKey,
    pub origin: CredentialOrigin,
}

/// Locations searched for credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialConfig {
    /// Environment variable holding the key JSON.
    pub env_var: String,
    /// JSON file acting as secret store.
    pub secrets_path: PathBuf,
    /// Key of the credential object inside the secret store.
    pub secrets_key: String,
    /// Local key file.
    pub key_file: PathBuf,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        CredentialConfig {
            env_var: "GCP_JSON".to_string(),
            secrets_path: PathBuf::from(".secrets/secrets.json"),
            secrets_key: "gcp_service_account".to_string(),
            key_file: PathBuf::from("credentials.json"),
        }
    }
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

pub struct CredentialResolver {
    config: CredentialConfig,
    env: EnvLookup,
}

impl CredentialResolver {
    pub fn new(config: CredentialConfig) -> Self {
        CredentialResolver {
            config,
            env: Box::new(|name| std::env::var(name).ok()),
        }
    }

    /// Replaces the environment lookup (used by tests).
    pub fn with_env<F>(mut self, env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'static,
    {
        self.env = Box::new(env);
        self
    }

    pub fn config(&self) -> &CredentialConfig {
        &self.config
    }

    /// Returns the first present and valid credential set.
    pub fn resolve(&self) -> Result<Credentials, LoadError> {
        let mut tried = Vec::new();

        match self.from_env() {
            Ok(Some(key)) => return Ok(found(key, CredentialOrigin::Environment)),
            Ok(None) => tried.push(format!("env {} not set", self.config.env_var)),
            Err(e) => {
                log::warn!("ignoring credentials in env {}: {}", self.config.env_var, e);
                tried.push(format!("env {}: {}", self.config.env_var, e));
            }
        }

        match self.from_secret_store() {
            Ok(Some(key)) => return Ok(found(key, CredentialOrigin::SecretStore)),
            Ok(None) => tried.push(format!(
                "no '{}' in {}",
                self.config.secrets_key,
                self.config.secrets_path.display()
            )),
            Err(e) => {
                log::warn!(
                    "ignoring secret store {}: {}",
                    self.config.secrets_path.display(),
                    e
                );
                tried.push(format!("{}: {}", self.config.secrets_path.display(), e));
            }
        }

        match self.from_key_file() {
            Ok(Some(key)) => return Ok(found(key, CredentialOrigin::KeyFile)),
            Ok(None) => tried.push(format!("{} not found", self.config.key_file.display())),
            Err(e) => tried.push(format!("{}: {}", self.config.key_file.display(), e)),
        }

        Err(LoadError::Credentials(tried.join("; ")))
    }

    fn from_env(&self) -> Result<Option<ServiceAccountKey>, LoadError> {
        match (self.env)(&self.config.env_var) {
            Some(json) if !json.trim().is_empty() => Ok(Some(serde_json::from_str(&json)?)),
            _ => Ok(None),
        }
    }

    fn from_secret_store(&self) -> Result<Option<ServiceAccountKey>, LoadError> {
        if !self.config.secrets_path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.config.secrets_path)?;
        let mut store: Value = serde_json::from_str(&text)?;
        match store.get_mut(&self.config.secrets_key) {
            Some(entry) => Ok(Some(serde_json::from_value(entry.take())?)),
            None => Ok(None),
        }
    }

    fn from_key_file(&self) -> Result<Option<ServiceAccountKey>, LoadError> {
        if !self.config.key_file.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.config.key_file)?;
        Ok(Some(serde_json::from_str(&text)?))
    }
}

fn found(key: ServiceAccountKey, origin: CredentialOrigin) -> Credentials {
    log::debug!("using credentials for {} from {:?}", key.client_email, origin);
    Credentials { key, origin }
}
