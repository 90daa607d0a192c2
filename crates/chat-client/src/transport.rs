//! The `ChatTransport` trait defines the network surface of the Health
//! ChatPal service (REST in production, scripted fakes in tests).

use async_trait::async_trait;
use cp_domain::error::Result;

use crate::types::{
    ChatRequest, ChatResponse, Doctor, DoctorQuery, HistoryMessage, NewSessionResponse,
    ServiceHealth, SessionStatus,
};

/// Abstraction over the chat service's HTTP API.
///
/// Implementations own no session state and never retry. Every failure
/// is returned as an error for which
/// [`Error::is_transport`](cp_domain::Error::is_transport) holds.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send one chat turn (POST /api/rag/chat).
    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse>;

    /// Mint a fresh session (POST /api/rag/session/new).
    async fn new_session(&self) -> Result<NewSessionResponse>;

    /// Erase a session's history (POST /api/rag/session/{id}/clear).
    async fn clear_session(&self, session_id: &str) -> Result<()>;

    /// Fetch prior turns (GET /api/rag/session/{id}/history).
    async fn history(&self, session_id: &str) -> Result<Vec<HistoryMessage>>;

    /// Liveness probe for a session (GET /api/rag/session/{id}/status).
    async fn status(&self, session_id: &str) -> Result<SessionStatus>;

    /// Service health check (GET /health).
    async fn health(&self) -> Result<ServiceHealth>;

    /// Legacy symptom → disease prediction (POST /api/predict-disease).
    async fn predict_disease(&self, symptoms: Vec<String>) -> Result<serde_json::Value>;

    /// Practitioners near a location (GET /api/find-doctors).
    async fn find_doctors(&self, query: DoctorQuery) -> Result<Vec<Doctor>>;

    /// Disease outbreak warning for a location (GET /api/outbreak-alert).
    /// `Ok(None)` means the service has nothing to report.
    async fn outbreak_alert(&self, lat: f64, lon: f64) -> Result<Option<String>>;
}
