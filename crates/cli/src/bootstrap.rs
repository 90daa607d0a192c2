//! Composition root: turns a [`Config`] into a ready [`ChatSession`].

use std::path::PathBuf;
use std::sync::Arc;

use cp_chat::{ChatSession, FileSessionStore, MemorySessionStore, RestChatTransport, SessionStore};
use cp_domain::config::Config;

/// Default store location when `store.path` is unset.
pub fn default_store_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".chatpal")
        .join("session.json")
}

/// Pick the session store described by `config.store`.
pub fn build_store(config: &Config) -> Arc<dyn SessionStore> {
    if config.store.ephemeral {
        tracing::debug!("using in-memory session store");
        return Arc::new(MemorySessionStore::new());
    }
    let path = config
        .store
        .path
        .clone()
        .unwrap_or_else(default_store_path);
    tracing::debug!(path = %path.display(), "using file session store");
    Arc::new(FileSessionStore::new(path))
}

/// Build the chat client the rest of the binary shares.
pub fn build_session(config: &Config) -> anyhow::Result<Arc<ChatSession>> {
    let transport = RestChatTransport::new(&config.service)?;
    tracing::info!(
        base_url = %transport.base_url(),
        timeout_ms = ?config.service.timeout_ms,
        "chat transport ready"
    );
    Ok(Arc::new(ChatSession::new(
        Arc::new(transport),
        build_store(config),
    )))
}
