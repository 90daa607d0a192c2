use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Remote chat service connection
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "d_base_url")]
    pub base_url: String,
    /// Per-request timeout. When unset the HTTP client's own default applies.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Sent as `X-Client-Type` on every request.
    #[serde(default = "d_client_name")]
    pub client_name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: d_base_url(),
            timeout_ms: None,
            client_name: d_client_name(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_base_url() -> String {
    "http://localhost:8000".into()
}
fn d_client_name() -> String {
    "chatpal-cli".into()
}
