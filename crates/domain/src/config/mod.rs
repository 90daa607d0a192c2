mod logging;
mod service;
mod store;

pub use logging::*;
pub use service::*;
pub use store::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Environment variable that overrides `service.base_url`.
pub const BASE_URL_ENV: &str = "CHATPAL_BASE_URL";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using `lookup` in place of `std::env::var`.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.service.base_url = url.trim().to_owned();
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let url = self.service.base_url.trim();

        if url.is_empty() {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Error,
                field: "service.base_url".into(),
                message: "base_url must not be empty".into(),
            });
        } else if let Some(rest) = url.strip_prefix("http://") {
            let host = url_host(rest);
            if !matches!(host, "localhost" | "127.0.0.1" | "[::1]") {
                issues.push(ConfigIssue {
                    severity: ConfigSeverity::Warning,
                    field: "service.base_url".into(),
                    message: format!("plain http to non-local host {host:?}; health questions travel unencrypted"),
                });
            }
        } else if !url.starts_with("https://") {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Error,
                field: "service.base_url".into(),
                message: "base_url must start with http:// or https://".into(),
            });
        }

        if self.service.timeout_ms == Some(0) {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Error,
                field: "service.timeout_ms".into(),
                message: "timeout_ms must be greater than 0 (omit it to use the client default)".into(),
            });
        }

        if self.store.ephemeral && self.store.path.is_some() {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Warning,
                field: "store.path".into(),
                message: "ignored because store.ephemeral = true".into(),
            });
        }

        issues
    }
}

/// Host part of a URL with its scheme already stripped.
fn url_host(rest: &str) -> &str {
    if rest.starts_with('[') {
        return match rest.find(']') {
            Some(end) => &rest[..=end],
            None => rest,
        };
    }
    rest.split(['/', ':', '?']).next().unwrap_or_default()
}
