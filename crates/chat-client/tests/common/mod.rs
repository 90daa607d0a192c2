//! Scripted `ChatTransport` double shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;

use async_trait::async_trait;
use cp_chat::{
    ChatRequest, ChatResponse, ChatTransport, Doctor, DoctorQuery, HistoryMessage,
    NewSessionResponse, Role, ServiceHealth, SessionStatus,
};
use cp_domain::error::{Error, Result};
use parking_lot::Mutex;

/// Replays queued results in order and records every call it receives.
/// A call with nothing queued fails like an unreachable service.
#[derive(Default)]
pub struct ScriptedTransport {
    calls: Mutex<Vec<String>>,
    chat_requests: Mutex<Vec<ChatRequest>>,
    chat: Mutex<VecDeque<Result<ChatResponse>>>,
    new_session: Mutex<VecDeque<Result<NewSessionResponse>>>,
    clear: Mutex<VecDeque<Result<()>>>,
    history: Mutex<VecDeque<Result<Vec<HistoryMessage>>>>,
    status: Mutex<VecDeque<Result<SessionStatus>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, response: &str, session_id: &str) -> &Self {
        self.chat.lock().push_back(Ok(chat_response(response, session_id)));
        self
    }

    pub fn chat_result(&self, result: Result<ChatResponse>) -> &Self {
        self.chat.lock().push_back(result);
        self
    }

    pub fn fail_chat(&self, message: &str) -> &Self {
        self.chat.lock().push_back(Err(Error::Http(message.into())));
        self
    }

    pub fn new_session_result(&self, result: Result<NewSessionResponse>) -> &Self {
        self.new_session.lock().push_back(result);
        self
    }

    pub fn clear_result(&self, result: Result<()>) -> &Self {
        self.clear.lock().push_back(result);
        self
    }

    pub fn history_result(&self, result: Result<Vec<HistoryMessage>>) -> &Self {
        self.history.lock().push_back(result);
        self
    }

    pub fn status_result(&self, result: Result<SessionStatus>) -> &Self {
        self.status.lock().push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_requests.lock().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

fn unscripted<T>(op: &str) -> Result<T> {
    Err(Error::Http(format!("{op}: connection refused")))
}

pub fn chat_response(response: &str, session_id: &str) -> ChatResponse {
    ChatResponse {
        response: response.into(),
        session_id: session_id.into(),
        conversation_context_used: false,
        sources: Vec::new(),
        extra: Default::default(),
    }
}

pub fn new_session(session_id: &str) -> NewSessionResponse {
    NewSessionResponse {
        session_id: session_id.into(),
        extra: Default::default(),
    }
}

pub fn message(role: Role, content: &str) -> HistoryMessage {
    HistoryMessage {
        role,
        content: content.into(),
        timestamp: None,
        metadata: None,
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse> {
        self.record(format!("chat:{}", req.session_id.as_deref().unwrap_or("-")));
        self.chat_requests.lock().push(req);
        self.chat.lock().pop_front().unwrap_or_else(|| unscripted("chat"))
    }

    async fn new_session(&self) -> Result<NewSessionResponse> {
        self.record("new_session".into());
        self.new_session
            .lock()
            .pop_front()
            .unwrap_or_else(|| unscripted("new_session"))
    }

    async fn clear_session(&self, session_id: &str) -> Result<()> {
        self.record(format!("clear:{session_id}"));
        self.clear.lock().pop_front().unwrap_or_else(|| unscripted("clear"))
    }

    async fn history(&self, session_id: &str) -> Result<Vec<HistoryMessage>> {
        self.record(format!("history:{session_id}"));
        self.history
            .lock()
            .pop_front()
            .unwrap_or_else(|| unscripted("history"))
    }

    async fn status(&self, session_id: &str) -> Result<SessionStatus> {
        self.record(format!("status:{session_id}"));
        self.status
            .lock()
            .pop_front()
            .unwrap_or_else(|| unscripted("status"))
    }

    async fn health(&self) -> Result<ServiceHealth> {
        self.record("health".into());
        unscripted("health")
    }

    async fn predict_disease(&self, _symptoms: Vec<String>) -> Result<serde_json::Value> {
        self.record("predict".into());
        unscripted("predict")
    }

    async fn find_doctors(&self, _query: DoctorQuery) -> Result<Vec<Doctor>> {
        self.record("doctors".into());
        unscripted("doctors")
    }

    async fn outbreak_alert(&self, _lat: f64, _lon: f64) -> Result<Option<String>> {
        self.record("outbreak".into());
        unscripted("outbreak")
    }
}
