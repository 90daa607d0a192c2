use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session persistence
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Where the current session id is remembered between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON key-value file. `None` means
    /// `~/.chatpal/session.json`, resolved by the binary.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Keep the session id in memory only; nothing is written to disk.
    #[serde(default)]
    pub ephemeral: bool,
}
