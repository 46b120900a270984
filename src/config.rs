use crate::env_manager;
use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub alexa: AlexaConfig,
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub slack: SlackConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlexaConfig {
    /// Skill id inbound requests must carry. Unset accepts any skill.
    pub application_id: Option<String>,
    /// Maximum request timestamp skew in seconds, 0 disables the check.
    pub timestamp_tolerance_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    pub api_key: Option<String>,
    pub geocode_url: String,
    pub timezone_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    pub api_base: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: "127.0.0.1:3000".to_string(), body_limit_bytes: 64 * 1024 }
    }
}

impl Default for AlexaConfig {
    fn default() -> Self {
        Self { application_id: None, timestamp_tolerance_secs: 150 }
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            geocode_url: "https://maps.googleapis.com/maps/api/geocode/json".to_string(),
            timezone_url: "https://maps.googleapis.com/maps/api/timezone/json".to_string(),
        }
    }
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self { api_base: "https://slack.com/api".to_string() }
    }
}

impl Config {
    /// Load the config file (if there is one) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match get_config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Config::default(),
        };
        config.apply_overrides(env_manager::get_env_var);
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(id) = lookup("ALEXA_APPLICATION_ID") {
            self.alexa.application_id = Some(id);
        }
        if let Some(key) = lookup("GOOGLE_MAPS_API_KEY") {
            self.google.api_key = Some(key);
        }
        if let Some(addr) = lookup("SNOOZE_SKILL_BIND_ADDR") {
            self.server.bind_addr = addr;
        }
        if let Some(base) = lookup("SLACK_API_BASE") {
            self.slack.api_base = base;
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", self.server.bind_addr))
    }

    pub fn google_api_key(&self) -> Result<&str> {
        self.google
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| anyhow!("GOOGLE_MAPS_API_KEY is not set"))
    }

    pub fn geocode_url(&self) -> Result<Url> {
        parse_url("google.geocode_url", &self.google.geocode_url)
    }

    pub fn timezone_url(&self) -> Result<Url> {
        parse_url("google.timezone_url", &self.google.timezone_url)
    }

    pub fn slack_api_base(&self) -> Result<Url> {
        parse_url("slack.api_base", &self.slack.api_base)
    }

    /// Check every value the server needs before it starts listening.
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;
        self.google_api_key()?;
        self.geocode_url()?;
        self.timezone_url()?;
        self.slack_api_base()?;
        Ok(())
    }
}

fn parse_url(name: &str, value: &str) -> Result<Url> {
    Url::parse(value).with_context(|| format!("Invalid URL for {}: '{}'", name, value))
}

fn get_config_path() -> Option<PathBuf> {
    if let Some(path) = env_manager::get_env_var("SNOOZE_SKILL_CONFIG_PATH") {
        return Some(PathBuf::from(path));
    }
    default_config_path()
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "snooze-skill").map(|dirs| dirs.config_dir().join("config.toml"))
}
