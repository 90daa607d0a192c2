//! `cp-chat` — session-aware client for the Health ChatPal RAG service.
//!
//! Provides the [`ChatTransport`] trait over the service's HTTP API, a
//! production REST implementation ([`RestChatTransport`]), the
//! [`SessionStore`] trait with in-memory and file-backed stores, and the
//! [`ChatSession`] facade that ties them together.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use cp_chat::{ChatSession, FileSessionStore, RestChatTransport};
//! use cp_domain::config::ServiceConfig;
//!
//! # async fn example() -> cp_domain::Result<()> {
//! let transport = RestChatTransport::new(&ServiceConfig::default())?;
//! let store = FileSessionStore::new("session.json");
//! let chat = ChatSession::new(Arc::new(transport), Arc::new(store));
//!
//! let reply = chat.send_message("I have a headache").await;
//! println!("{}", reply.response());
//! # Ok(())
//! # }
//! ```

pub mod rest;
pub mod session;
pub mod store;
pub mod transport;
pub mod types;

// ── Re-exports for ergonomic imports ─────────────────────────────────

pub use rest::{from_reqwest, RestChatTransport};
pub use session::ChatSession;
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, SESSION_KEY};
pub use transport::ChatTransport;
pub use types::{
    ChatFailure, ChatReply, ChatRequest, ChatResponse, ChatResult, Doctor, DoctorQuery,
    HistoryMessage, MessageMetadata, NewSessionResponse, OutbreakQuery, Role, ServiceHealth,
    SessionInfo, SessionStatus, APOLOGY,
};
