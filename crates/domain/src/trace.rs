use serde::Serialize;

/// Structured trace events emitted across all ChatPal crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    ChatServiceCall {
        endpoint: String,
        status: u16,
        duration_ms: u64,
    },
    SessionAdopted {
        old_session_id: Option<String>,
        new_session_id: String,
        explicit: bool,
    },
    SessionReset {
        old_session_id: Option<String>,
        reason: String,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "cp_event");
    }
}
