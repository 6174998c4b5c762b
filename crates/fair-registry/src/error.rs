use thiserror::Error;

/// Why a registry lookup produced no record. Rendered into the fault
/// record's `error` message, so every variant reads as one line.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid registry url {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },

    #[error("identifier is empty")]
    EmptyIdentifier,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("registry answered status={status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: expected a JSON object, got {kind}")]
    NotAnObject { kind: &'static str },

    #[error("cache write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}
