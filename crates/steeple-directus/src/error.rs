use thiserror::Error;

/// Errors from talking to a Directus instance.
#[derive(Debug, Error)]
pub enum DirectusError {
    /// Transport-level failure: connection refused, timeout, invalid URL.
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `message` carries the human-readable text from
    /// the Directus error envelope when one was present, otherwise the
    /// raw response body.
    #[error("Directus returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body was not the JSON we required.
    #[error("failed to decode Directus response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl DirectusError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}
