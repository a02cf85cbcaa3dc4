// src/infra/errors.rs — Error types for proxydash

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxydashError {
    // Transport errors: the call never produced a usable envelope
    #[error("backend returned HTTP {status}")]
    Http { status: u16 },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    // Application error: 2xx HTTP, envelope code outside {200, 0}
    #[error("{message}")]
    Backend { code: i64, message: String },

    // Precondition violations
    #[error("not authenticated — run `proxydash login` first")]
    NotAuthenticated,

    // Infra
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProxydashError {
    /// Application-level failure from a backend envelope, with a fallback
    /// message when the backend sends none.
    pub fn backend(code: i64, message: Option<String>, fallback: &str) -> Self {
        let message = match message {
            Some(m) if !m.is_empty() => m,
            _ => fallback.to_string(),
        };
        Self::Backend { code, message }
    }
}
