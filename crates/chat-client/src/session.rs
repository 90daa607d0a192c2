//! `ChatSession` — the single entry point UI code talks to.
//!
//! Composes a [`ChatTransport`] with a [`SessionStore`], keeps the held
//! session id in memory, and turns transport failures into values or
//! quiet defaults according to how much each operation matters:
//!
//! | Operation                  | On transport failure            |
//! |----------------------------|---------------------------------|
//! | `send_message`             | [`ChatResult::Failed`] value    |
//! | `clear_conversation`       | `false`, logged                 |
//! | `conversation_history`     | empty list, logged              |
//! | `is_session_active`        | `false`, logged                 |
//! | `start_new_conversation`   | error propagated                |

use std::sync::Arc;

use cp_domain::error::{Error, Result};
use cp_domain::trace::TraceEvent;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::store::SessionStore;
use crate::transport::ChatTransport;
use crate::types::{
    ChatFailure, ChatReply, ChatRequest, ChatResult, Doctor, DoctorQuery, HistoryMessage,
    NewSessionResponse, ServiceHealth, SessionInfo, APOLOGY,
};

#[derive(Debug, Default)]
struct SessionState {
    session_id: Option<String>,
    active: bool,
}

/// Session-aware chat client.
///
/// Methods take `&self`, so one instance can be shared behind an `Arc`.
/// The state lock is never held across an `.await`; two overlapping
/// sends race and whichever response lands last decides the held id.
pub struct ChatSession {
    transport: Arc<dyn ChatTransport>,
    store: Arc<dyn SessionStore>,
    state: RwLock<SessionState>,
}

impl ChatSession {
    /// Build a client, adopting whatever id the store already holds.
    ///
    /// The stored id is trusted optimistically; the service is not asked
    /// whether it is still valid until first use.
    pub fn new(transport: Arc<dyn ChatTransport>, store: Arc<dyn SessionStore>) -> Self {
        let session_id = store.get();
        if let Some(ref id) = session_id {
            debug!(session_id = %id, "restored session from store");
        }
        Self {
            transport,
            store,
            state: RwLock::new(SessionState {
                session_id,
                active: false,
            }),
        }
    }

    // ── conversation ─────────────────────────────────────────────────

    /// Send one message. Never fails: transport errors come back as
    /// [`ChatResult::Failed`] and leave the held session untouched.
    pub async fn send_message(&self, text: &str) -> ChatResult {
        let held = self.current_session_id();
        let req = ChatRequest {
            query: text.to_owned(),
            session_id: held.clone(),
        };

        match self.transport.chat(req).await {
            Ok(resp) => {
                let session_id = if resp.session_id.trim().is_empty() {
                    held.unwrap_or_default()
                } else {
                    self.adopt_if_changed(&resp.session_id);
                    resp.session_id
                };
                ChatResult::Reply(ChatReply {
                    response: resp.response,
                    has_context: resp.conversation_context_used,
                    sources: resp.sources,
                    session_id,
                })
            }
            Err(e) => {
                warn!(error = %e, "chat request failed");
                ChatResult::Failed(ChatFailure {
                    response: APOLOGY.to_owned(),
                    session_id: self.current_session_id(),
                    error: e.to_string(),
                })
            }
        }
    }

    /// Ask the service for a fresh session and make it the held one.
    ///
    /// Errors are propagated; there is no sensible session to fall back on.
    pub async fn start_new_conversation(&self) -> Result<NewSessionResponse> {
        let resp = self.transport.new_session().await?;
        if resp.session_id.trim().is_empty() {
            return Err(Error::Decode(
                "service returned an empty session_id".to_owned(),
            ));
        }

        let old = {
            let mut state = self.state.write();
            let old = state.session_id.replace(resp.session_id.clone());
            state.active = true;
            self.store.set(&resp.session_id);
            old
        };

        TraceEvent::SessionAdopted {
            old_session_id: old,
            new_session_id: resp.session_id.clone(),
            explicit: true,
        }
        .emit();
        info!(session_id = %resp.session_id, "started new conversation");
        Ok(resp)
    }

    /// Erase the held session's history on the service.
    ///
    /// Returns `false` without touching the network when no session is
    /// held, and `false` when the service call fails.
    pub async fn clear_conversation(&self) -> bool {
        let Some(id) = self.current_session_id() else {
            return false;
        };
        match self.transport.clear_session(&id).await {
            Ok(()) => {
                info!(session_id = %id, "cleared conversation");
                true
            }
            Err(e) => {
                warn!(session_id = %id, error = %e, "failed to clear conversation");
                false
            }
        }
    }

    /// Prior turns of the held session; empty when none is held or the
    /// fetch fails.
    pub async fn conversation_history(&self) -> Vec<HistoryMessage> {
        let Some(id) = self.current_session_id() else {
            return Vec::new();
        };
        match self.transport.history(&id).await {
            Ok(messages) => messages,
            Err(e) => {
                warn!(session_id = %id, error = %e, "failed to get conversation history");
                Vec::new()
            }
        }
    }

    /// Whether the service still knows the held session. Does not reset
    /// anything when the answer is `false`; see [`resume`](Self::resume).
    pub async fn is_session_active(&self) -> bool {
        let Some(id) = self.current_session_id() else {
            return false;
        };
        match self.transport.status(&id).await {
            Ok(status) => status.exists,
            Err(e) => {
                warn!(session_id = %id, error = %e, "failed to check session status");
                false
            }
        }
    }

    /// Pick up where the last run left off.
    ///
    /// If the held session is live and has history, that history is
    /// returned and the session is marked active. Otherwise a held id is
    /// discarded (locally only) and an empty list is returned, so the
    /// next send starts a fresh conversation.
    pub async fn resume(&self) -> Vec<HistoryMessage> {
        let Some(id) = self.current_session_id() else {
            return Vec::new();
        };

        if self.is_session_active().await {
            let history = self.conversation_history().await;
            if !history.is_empty() {
                let mut state = self.state.write();
                if state.session_id.as_deref() == Some(id.as_str()) {
                    state.active = true;
                }
                return history;
            }
        }

        // Leave a session adopted by a concurrent call alone.
        let mut state = self.state.write();
        if state.session_id.as_deref() == Some(id.as_str()) {
            self.reset_locked(&mut state, "stale");
        }
        Vec::new()
    }

    // ── local state ──────────────────────────────────────────────────

    /// Forget the held session in memory and in the store.
    pub fn reset_session(&self) {
        let mut state = self.state.write();
        self.reset_locked(&mut state, "explicit");
    }

    pub fn current_session_id(&self) -> Option<String> {
        self.state.read().session_id.clone()
    }

    pub fn session_info(&self) -> SessionInfo {
        let state = self.state.read();
        SessionInfo {
            session_id: state.session_id.clone(),
            is_active: state.active,
            has_session: state.session_id.is_some(),
        }
    }

    // ── service extras ───────────────────────────────────────────────

    pub async fn health(&self) -> Result<ServiceHealth> {
        self.transport.health().await
    }

    pub async fn predict_disease(&self, symptoms: Vec<String>) -> Result<serde_json::Value> {
        self.transport.predict_disease(symptoms).await
    }

    pub async fn find_doctors(&self, query: DoctorQuery) -> Result<Vec<Doctor>> {
        self.transport.find_doctors(query).await
    }

    pub async fn outbreak_alert(&self, lat: f64, lon: f64) -> Result<Option<String>> {
        self.transport.outbreak_alert(lat, lon).await
    }

    // ── helpers ──────────────────────────────────────────────────────

    fn adopt_if_changed(&self, new_id: &str) {
        let old = {
            let mut state = self.state.write();
            if state.session_id.as_deref() == Some(new_id) {
                return;
            }
            let old = state.session_id.replace(new_id.to_owned());
            state.active = true;
            self.store.set(new_id);
            old
        };

        TraceEvent::SessionAdopted {
            old_session_id: old,
            new_session_id: new_id.to_owned(),
            explicit: false,
        }
        .emit();
    }

    fn reset_locked(&self, state: &mut SessionState, reason: &str) {
        let old = state.session_id.take();
        state.active = false;
        self.store.clear();

        TraceEvent::SessionReset {
            old_session_id: old,
            reason: reason.to_owned(),
        }
        .emit();
        info!(reason, "session reset");
    }
}
