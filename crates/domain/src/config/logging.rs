use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Logging
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `tracing-subscriber` settings. `RUST_LOG` takes precedence over
/// `filter` when set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "d_filter")]
    pub filter: String,
    /// Emit newline-delimited JSON instead of the human format.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: d_filter(),
            json: false,
        }
    }
}

fn d_filter() -> String {
    "warn,cp_chat=info".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: LoggingConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.filter, "warn,cp_chat=info");
        assert!(!cfg.json);
    }

    #[test]
    fn deserialize_json_format() {
        let cfg: LoggingConfig = toml::from_str(
            r#"
            filter = "debug"
            json = true
        "#,
        )
        .unwrap();
        assert_eq!(cfg.filter, "debug");
        assert!(cfg.json);
    }
}
