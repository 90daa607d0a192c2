/// Shared error type used across all ChatPal crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("decode: {0}")]
    Decode(String),

    #[error("config: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// True for every failure that happened talking to the chat service:
    /// unreachable host, timeout, non-2xx status or an unparsable body.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::Timeout(_) | Error::Status { .. } | Error::Decode(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_kinds_are_grouped() {
        assert!(Error::Http("connection refused".into()).is_transport());
        assert!(Error::Timeout("30s".into()).is_transport());
        assert!(Error::Decode("eof".into()).is_transport());
        assert!(Error::Status {
            endpoint: "POST /api/rag/chat".into(),
            status: 502,
            body: String::new(),
        }
        .is_transport());

        assert!(!Error::Config("bad".into()).is_transport());
        assert!(!Error::Other("x".into()).is_transport());
    }

    #[test]
    fn status_display_names_endpoint() {
        let err = Error::Status {
            endpoint: "GET /api/rag/session/abc/status".into(),
            status: 404,
            body: "not found".into(),
        };
        assert_eq!(
            err.to_string(),
            "GET /api/rag/session/abc/status returned 404: not found"
        );
    }
}
