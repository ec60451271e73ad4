use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    pub jira: JiraConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct JiraConfig {
    pub url: String,
    pub email: String,
    pub api_token: String,
    #[serde(default = "default_project_key")]
    pub project_key: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TrackingConfig {
    /// Only tickets created on or after this date are counted.
    #[serde(default = "default_go_live_date")]
    pub go_live_date: String,
    /// Goal share threshold, presentation only.
    #[serde(default = "default_goal_percent")]
    pub goal_percent: f64,
    /// Category buckets, in display order. The first one is the headline
    /// metric.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    /// Page size for the single search call. Results beyond this are cut off.
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    /// How long a fetched snapshot stays valid.
    #[serde(default = "default_cache_minutes")]
    pub cache_minutes: u64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            go_live_date: default_go_live_date(),
            goal_percent: default_goal_percent(),
            categories: default_categories(),
            max_results: default_max_results(),
            cache_minutes: default_cache_minutes(),
        }
    }
}

fn default_project_key() -> String {
    "TKTS".to_string()
}

fn default_go_live_date() -> String {
    "2026-02-01".to_string()
}

fn default_goal_percent() -> f64 {
    20.0
}

fn default_categories() -> Vec<String> {
    ["Display", "Video", "Pixel", "Bespoke"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_max_results() -> u32 {
    1000
}

fn default_cache_minutes() -> u64 {
    60
}

impl Settings {
    /// Load from the config file, falling back to environment variables when
    /// no file exists. Fails before any network call when credentials are
    /// missing.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let settings = if config_path.exists() {
            let config_str = std::fs::read_to_string(&config_path)
                .context("Failed to read config file")?;

            toml::from_str::<Settings>(&config_str)
                .context("Failed to parse config file")?
        } else {
            Self::from_env()?
        };

        settings.validate()?;

        Ok(settings)
    }

    pub fn from_env() -> Result<Self> {
        let url = std::env::var("JIRA_DOMAIN");
        let email = std::env::var("JIRA_USER_EMAIL");
        let api_token = std::env::var("JIRA_API_TOKEN");

        match (url, email, api_token) {
            (Ok(url), Ok(email), Ok(api_token)) => Ok(Self {
                jira: JiraConfig {
                    url,
                    email,
                    api_token,
                    project_key: std::env::var("JIRA_PROJECT_KEY")
                        .unwrap_or_else(|_| default_project_key()),
                },
                tracking: TrackingConfig::default(),
            }),
            _ => anyhow::bail!(
                "Configuration not found. Run 'okrdash init' to set up your credentials, \
                 or set JIRA_DOMAIN, JIRA_USER_EMAIL and JIRA_API_TOKEN."
            ),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.jira.url.is_empty() || self.jira.email.is_empty() || self.jira.api_token.is_empty()
        {
            anyhow::bail!("jira.url, jira.email and jira.api_token must all be set");
        }

        chrono::NaiveDate::parse_from_str(&self.tracking.go_live_date, "%Y-%m-%d").with_context(
            || {
                format!(
                    "Invalid tracking.go_live_date '{}' (expected YYYY-MM-DD)",
                    self.tracking.go_live_date
                )
            },
        )?;

        if self.tracking.categories.is_empty() {
            anyhow::bail!("tracking.categories must list at least one category");
        }

        if self.tracking.max_results == 0 {
            anyhow::bail!("tracking.max_results must be greater than zero");
        }

        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(&config_path, config_str)
            .context("Failed to write config file")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&config_path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&config_path, perms)?;
        }

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .context("HOME environment variable not set")?;
        Ok(PathBuf::from(home).join(".okrdash"))
    }
}
