//! REST implementation of [`ChatTransport`].
//!
//! `RestChatTransport` wraps a `reqwest::Client` and translates every
//! trait method into the corresponding HTTP call against the Health
//! ChatPal service. It performs exactly one attempt per call.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use cp_domain::config::ServiceConfig;
use cp_domain::error::{Error, Result};
use cp_domain::trace::TraceEvent;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::transport::ChatTransport;
use crate::types::{
    ChatRequest, ChatResponse, Doctor, DoctorQuery, DoctorsResponse, HistoryMessage,
    HistoryResponse, NewSessionResponse, OutbreakAlertResponse, OutbreakQuery, PredictRequest,
    ServiceHealth, SessionStatus,
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A REST client for the chat service.
///
/// Created once by the composition root and shared behind an `Arc`.
/// The underlying `reqwest::Client` maintains a connection pool.
#[derive(Debug, Clone)]
pub struct RestChatTransport {
    http: Client,
    base_url: Url,
    client_name: String,
}

impl RestChatTransport {
    /// Build a new transport from the shared `ServiceConfig`.
    pub fn new(cfg: &ServiceConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(ms) = cfg.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let http = builder.build().map_err(|e| Error::Http(e.to_string()))?;

        let trimmed = cfg.base_url.trim().trim_end_matches('/');
        let base_url = Url::parse(trimmed)
            .map_err(|e| Error::Config(format!("invalid service.base_url {trimmed:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "service.base_url {trimmed:?} cannot carry a path"
            )));
        }

        Ok(Self {
            http,
            base_url,
            client_name: cfg.client_name.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── request helpers ──────────────────────────────────────────────

    /// Decorate a `RequestBuilder` with the standard ChatPal headers.
    fn decorate(&self, rb: RequestBuilder) -> RequestBuilder {
        rb.header("X-Client-Type", &self.client_name)
            .header("X-Trace-Id", Uuid::new_v4().to_string())
    }

    /// Append path segments to the base URL. Each segment is
    /// percent-encoded, so session ids cannot escape their slot.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send one request, emit a trace event, and map non-2xx to an error.
    async fn execute(&self, endpoint: &str, rb: RequestBuilder) -> Result<Response> {
        let start = Instant::now();
        let result = self.decorate(rb).send().await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(resp) => {
                let status = resp.status();
                TraceEvent::ChatServiceCall {
                    endpoint: endpoint.to_owned(),
                    status: status.as_u16(),
                    duration_ms,
                }
                .emit();

                if !status.is_success() {
                    let body = resp.text().await.unwrap_or_default();
                    return Err(Error::Status {
                        endpoint: endpoint.to_owned(),
                        status: status.as_u16(),
                        body,
                    });
                }
                Ok(resp)
            }
            Err(e) => {
                TraceEvent::ChatServiceCall {
                    endpoint: endpoint.to_owned(),
                    status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                    duration_ms,
                }
                .emit();
                Err(from_reqwest(e))
            }
        }
    }

    /// Read the body and parse it as `T`.
    async fn decode<T: DeserializeOwned>(endpoint: &str, resp: Response) -> Result<T> {
        let body = resp.text().await.map_err(from_reqwest)?;
        serde_json::from_str(&body).map_err(|e| {
            Error::Decode(format!("failed to parse {endpoint} response: {e}: {body}"))
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait]
impl ChatTransport for RestChatTransport {
    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse> {
        const EP: &str = "POST /api/rag/chat";
        let url = self.url(&["api", "rag", "chat"]);
        let resp = self.execute(EP, self.http.post(url).json(&req)).await?;
        Self::decode(EP, resp).await
    }

    async fn new_session(&self) -> Result<NewSessionResponse> {
        const EP: &str = "POST /api/rag/session/new";
        let url = self.url(&["api", "rag", "session", "new"]);
        let resp = self.execute(EP, self.http.post(url)).await?;
        Self::decode(EP, resp).await
    }

    async fn clear_session(&self, session_id: &str) -> Result<()> {
        let url = self.url(&["api", "rag", "session", session_id, "clear"]);
        self.execute("POST /api/rag/session/{id}/clear", self.http.post(url))
            .await?;
        Ok(())
    }

    async fn history(&self, session_id: &str) -> Result<Vec<HistoryMessage>> {
        const EP: &str = "GET /api/rag/session/{id}/history";
        let url = self.url(&["api", "rag", "session", session_id, "history"]);
        let resp = self.execute(EP, self.http.get(url)).await?;
        let body: HistoryResponse = Self::decode(EP, resp).await?;
        Ok(body.messages)
    }

    async fn status(&self, session_id: &str) -> Result<SessionStatus> {
        const EP: &str = "GET /api/rag/session/{id}/status";
        let url = self.url(&["api", "rag", "session", session_id, "status"]);
        let resp = self.execute(EP, self.http.get(url)).await?;
        Self::decode(EP, resp).await
    }

    async fn health(&self) -> Result<ServiceHealth> {
        const EP: &str = "GET /health";
        let resp = self.execute(EP, self.http.get(self.url(&["health"]))).await?;
        Self::decode(EP, resp).await
    }

    async fn predict_disease(&self, symptoms: Vec<String>) -> Result<serde_json::Value> {
        const EP: &str = "POST /api/predict-disease";
        let url = self.url(&["api", "predict-disease"]);
        let body = PredictRequest { symptoms };
        let resp = self.execute(EP, self.http.post(url).json(&body)).await?;
        Self::decode(EP, resp).await
    }

    async fn find_doctors(&self, query: DoctorQuery) -> Result<Vec<Doctor>> {
        const EP: &str = "GET /api/find-doctors";
        let url = self.url(&["api", "find-doctors"]);
        let resp = self
            .execute(EP, self.http.get(url).query(&query))
            .await?;
        let body: DoctorsResponse = Self::decode(EP, resp).await?;
        Ok(body.doctors)
    }

    async fn outbreak_alert(&self, lat: f64, lon: f64) -> Result<Option<String>> {
        const EP: &str = "GET /api/outbreak-alert";
        let url = self.url(&["api", "outbreak-alert"]);
        let resp = self
            .execute(EP, self.http.get(url).query(&OutbreakQuery { lat, lon }))
            .await?;
        let body: OutbreakAlertResponse = Self::decode(EP, resp).await?;
        Ok(body.alert.filter(|a| !a.trim().is_empty()))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Error conversion helper
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Convert a `reqwest::Error` into a domain `Error`.
///
/// Timeout errors become `Error::Timeout`, body decoding errors become
/// `Error::Decode`, everything else becomes `Error::Http`.
pub fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else if e.is_decode() {
        Error::Decode(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}
