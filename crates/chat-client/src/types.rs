//! Data Transfer Objects for the Health ChatPal RAG service.
//!
//! The service is a FastAPI app, so field names are `snake_case` on the
//! wire and need no renaming. Unknown response fields are kept in
//! `extra` so callers can still reach them.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Shown in place of an assistant reply when a send fails.
pub const APOLOGY: &str = "⚠️ Sorry, I couldn't process your request. Please try again.";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Chat turn
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// POST /api/rag/chat — request body.
///
/// `session_id` is always serialized; `null` asks the service to mint one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    pub session_id: Option<String>,
}

/// POST /api/rag/chat — response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub conversation_context_used: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sources: Vec<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session management
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// POST /api/rag/session/new — response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// GET /api/rag/session/{id}/history — response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub messages: Vec<HistoryMessage>,
}

/// GET /api/rag/session/{id}/status — response body.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SessionStatus {
    #[serde(default)]
    pub exists: bool,
}

/// Who authored a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
    #[serde(other)]
    Other,
}

/// One prior turn as stored by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub metadata: Option<MessageMetadata>,
}

/// Per-message metadata. The service writes these keys in camelCase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetadata {
    #[serde(default)]
    pub has_context: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sources: Vec<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl HistoryMessage {
    /// Parse `timestamp`. Python's `isoformat()` omits the offset for
    /// naive datetimes, so those are read as UTC.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.as_deref()?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn has_context(&self) -> bool {
        self.metadata.as_ref().is_some_and(|m| m.has_context)
    }

    pub fn sources(&self) -> &[String] {
        self.metadata
            .as_ref()
            .map(|m| m.sources.as_slice())
            .unwrap_or_default()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Service extras
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// GET /health — response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub version: Option<String>,
}

/// POST /api/predict-disease — request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub symptoms: Vec<String>,
}

/// GET /api/find-doctors — query parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorQuery {
    pub speciality: String,
    pub lat: f64,
    pub lon: f64,
}

/// GET /api/find-doctors — response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctorsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub doctors: Vec<Doctor>,
}

/// A nearby practitioner. Only `name` is guaranteed; everything else
/// the service returns is kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// GET /api/outbreak-alert — query parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OutbreakQuery {
    pub lat: f64,
    pub lon: f64,
}

/// GET /api/outbreak-alert — response body. No alert is `null` or absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutbreakAlertResponse {
    #[serde(default)]
    pub alert: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Normalized results handed to UI code
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A successful assistant reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub has_context: bool,
    pub sources: Vec<String>,
    pub session_id: String,
}

/// A failed send, ready to render as a fallback bubble.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatFailure {
    /// Always [`APOLOGY`].
    pub response: String,
    /// The session held before the call; a failed send never changes it.
    pub session_id: Option<String>,
    pub error: String,
}

/// Outcome of [`ChatSession::send_message`](crate::ChatSession::send_message).
///
/// Serializes flat, in the shape chat UIs consume:
/// `{success, response, hasContext, sources, sessionId, error?}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatResult {
    Reply(ChatReply),
    Failed(ChatFailure),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatResultWire<'a> {
    success: bool,
    response: &'a str,
    has_context: bool,
    sources: &'a [String],
    session_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl Serialize for ChatResult {
    fn serialize<S: serde::Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        ChatResultWire {
            success: self.is_success(),
            response: self.response(),
            has_context: self.has_context(),
            sources: self.sources(),
            session_id: self.session_id(),
            error: self.error(),
        }
        .serialize(ser)
    }
}

impl ChatResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ChatResult::Reply(_))
    }

    /// Text to show in the assistant bubble.
    pub fn response(&self) -> &str {
        match self {
            ChatResult::Reply(r) => &r.response,
            ChatResult::Failed(f) => &f.response,
        }
    }

    pub fn has_context(&self) -> bool {
        match self {
            ChatResult::Reply(r) => r.has_context,
            ChatResult::Failed(_) => false,
        }
    }

    pub fn sources(&self) -> &[String] {
        match self {
            ChatResult::Reply(r) => &r.sources,
            ChatResult::Failed(_) => &[],
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        match self {
            ChatResult::Reply(r) => Some(&r.session_id),
            ChatResult::Failed(f) => f.session_id.as_deref(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ChatResult::Reply(_) => None,
            ChatResult::Failed(f) => Some(&f.error),
        }
    }
}

/// Snapshot used by UIs to decide which controls to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub session_id: Option<String>,
    pub is_active: bool,
    pub has_session: bool,
}

// ── serde helpers ────────────────────────────────────────────────────

/// Treat an explicit JSON `null` the same as a missing list.
fn null_as_empty<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(de)?.unwrap_or_default())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
