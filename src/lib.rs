pub mod analysis;
pub mod api;
pub mod error;
pub mod payload;
pub mod slack;
pub mod utils;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Instant;
use tracing::warn;

use crate::slack::SlackClient;

#[derive(Debug, Deserialize, Clone)]
pub struct NotifierConfig {
    pub slack: SlackSettings,
    pub project: Vec<ProjectConfig>,
}

/// Global Slack defaults shared by every project.
#[derive(Debug, Deserialize, Clone)]
pub struct SlackSettings {
    pub hook: String,
    pub user: Option<String>,
    pub include_branch: Option<bool>,
}

impl SlackSettings {
    pub fn include_branch(&self) -> bool {
        self.include_branch.unwrap_or(false)
    }

    pub fn user(&self) -> &str {
        self.user.as_deref().unwrap_or("QualityGateNotifier")
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProjectConfig {
    /// Exact project key, or a regular expression matched against the key.
    pub key_or_regex: String,
    /// Per-project hook URL; falls back to the global hook when absent.
    pub hook: Option<String>,
    pub channel: String,
    pub notify: Option<String>,
    pub qg_fail_only: Option<bool>,
    pub with_webhook_secret: Option<bool>,
    pub webhook_secret: Option<String>,
}

impl ProjectConfig {
    /// Returns true if webhook signature validation should be enforced.
    pub fn needs_webhook_secret(&self) -> bool {
        self.with_webhook_secret.unwrap_or(false)
    }

    /// Returns true if a valid (non-empty) webhook_secret is set.
    pub fn has_valid_secret(&self) -> bool {
        self.webhook_secret
            .as_ref()
            .map(|s| !s.is_empty())
            .unwrap_or(false)
    }

    pub fn qg_fail_only(&self) -> bool {
        self.qg_fail_only.unwrap_or(false)
    }

    pub fn notify(&self) -> &str {
        self.notify.as_deref().unwrap_or("")
    }

    /// Returns the hook URL to deliver to: the per-project override
    /// when present, otherwise the global default.
    pub fn hook_url<'a>(&'a self, settings: &'a SlackSettings) -> &'a str {
        self.hook.as_deref().unwrap_or(&settings.hook)
    }

    /// Matches a project key either literally or as an anchored
    /// regular expression (whole-key match).
    pub fn matches(&self, project_key: &str) -> bool {
        if self.key_or_regex == project_key {
            return true;
        }
        match Regex::new(&format!("^(?:{})$", self.key_or_regex)) {
            Ok(re) => re.is_match(project_key),
            Err(e) => {
                warn!(
                    "Invalid key_or_regex '{}' in project config: {}",
                    self.key_or_regex, e
                );
                false
            }
        }
    }
}

pub struct AppState {
    pub config: NotifierConfig,
    pub slack: SlackClient,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
    pub delivered: AtomicU64,
    pub failed: AtomicU64,
}

pub type SharedState = Arc<AppState>;
