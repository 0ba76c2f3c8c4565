use crate::api::models::Credentials;
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_BASE_URL: &str = "WORK_ITEMS_BASE_URL";
pub const ENV_IDENTITY_URL: &str = "WORK_ITEMS_IDENTITY_URL";
pub const ENV_TENANT_ID: &str = "WORK_ITEMS_TENANT_ID";
pub const ENV_CLIENT_ID: &str = "WORK_ITEMS_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "WORK_ITEMS_CLIENT_SECRET";
pub const ENV_SCOPE: &str = "WORK_ITEMS_SCOPE";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Work-items API root, e.g. `https://host/work-items/v1`
    pub base_url: Option<String>,
    /// Identity server root, `/connect/token` is appended
    pub identity_url: Option<String>,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub scope: Option<String>,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("scope", &self.scope)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_logging")]
    pub request_logging: bool,
    #[serde(default = "default_image_url")]
    pub image_url: String,
    #[serde(default = "default_author_id")]
    pub author_id: String,
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_logging() -> bool {
    true
}

fn default_image_url() -> String {
    crate::fixtures::DEFAULT_IMAGE_URL.to_string()
}

fn default_author_id() -> String {
    "work-items-e2e".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_logging: default_request_logging(),
            image_url: default_image_url(),
            author_id: default_author_id(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Fully resolved configuration for a single run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub base_url: String,
    pub identity_url: String,
    pub credentials: Credentials,
    pub scope: Option<String>,
    pub settings: Settings,
}

impl RunConfig {
    pub fn token_url(&self) -> String {
        crate::api::constants::token_endpoint(&self.identity_url)
    }
}

impl HarnessConfig {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("work-items-e2e")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".work-items-e2e")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load the TOML config file, an absent file yields defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::get_config_path()?,
        };
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            if path.is_some() {
                anyhow::bail!("Config file not found: {:?}", config_path);
            }
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        Self::from_toml_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: HarnessConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load the config file, then `.env`, then let process environment win
    pub fn load_with_env(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::load(path)?;

        if let Ok(env_path) = dotenvy::dotenv() {
            debug!("Loaded environment from {:?}", env_path);
        }

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides: [(&str, &mut Option<String>); 6] = [
            (ENV_BASE_URL, &mut self.service.base_url),
            (ENV_IDENTITY_URL, &mut self.service.identity_url),
            (ENV_TENANT_ID, &mut self.credentials.tenant_id),
            (ENV_CLIENT_ID, &mut self.credentials.client_id),
            (ENV_CLIENT_SECRET, &mut self.credentials.client_secret),
            (ENV_SCOPE, &mut self.credentials.scope),
        ];

        for (key, slot) in overrides {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                debug!("Overriding config value from {}", key);
                *slot = Some(value);
            }
        }
    }

    /// Resolve into a `RunConfig`, listing every missing key at once
    pub fn validate(&self) -> Result<RunConfig> {
        let required = [
            ("service.base_url", ENV_BASE_URL, &self.service.base_url),
            ("service.identity_url", ENV_IDENTITY_URL, &self.service.identity_url),
            ("credentials.tenant_id", ENV_TENANT_ID, &self.credentials.tenant_id),
            ("credentials.client_id", ENV_CLIENT_ID, &self.credentials.client_id),
            ("credentials.client_secret", ENV_CLIENT_SECRET, &self.credentials.client_secret),
        ];

        let missing: Vec<String> = required
            .iter()
            .filter(|(_, _, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
            .map(|(key, env, _)| format!("{} ({})", key, env))
            .collect();

        if !missing.is_empty() {
            anyhow::bail!("Missing required configuration: {}", missing.join(", "));
        }

        let zero_timeouts: Vec<&str> = [
            ("settings.request_timeout_secs", self.settings.request_timeout_secs),
            ("settings.connect_timeout_secs", self.settings.connect_timeout_secs),
        ]
        .into_iter()
        .filter(|(_, secs)| *secs == 0)
        .map(|(key, _)| key)
        .collect();

        if !zero_timeouts.is_empty() {
            anyhow::bail!("Timeouts must be at least one second: {}", zero_timeouts.join(", "));
        }

        let value = |v: &Option<String>| v.clone().unwrap_or_default();

        Ok(RunConfig {
            base_url: value(&self.service.base_url).trim_end_matches('/').to_string(),
            identity_url: value(&self.service.identity_url).trim_end_matches('/').to_string(),
            credentials: Credentials {
                client_id: value(&self.credentials.client_id),
                client_secret: value(&self.credentials.client_secret),
                tenant_id: value(&self.credentials.tenant_id),
            },
            scope: self.credentials.scope.clone(),
            settings: self.settings.clone(),
        })
    }
}
