use thiserror::Error;

/// How much of an offending upstream response is kept for diagnostics.
pub const PARSE_EXCERPT_LIMIT: usize = 200;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Caller-supplied data violates a documented constraint. Rejected at the
    /// boundary before any external call is made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Required external-service configuration is missing or invalid. Fatal
    /// at startup, never raised per call.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An external dependency is unreachable, timed out, or returned no
    /// content. Retryable by the caller.
    #[error("Service error: {0}")]
    Service(String),

    /// The transport payload was well-formed but its content does not match
    /// the expected schema. Not retryable; carries a bounded excerpt of the
    /// offending text.
    #[error("Parse error: {message}. Response: {excerpt}")]
    Parse { message: String, excerpt: String },
}

impl EngineError {
    /// Build a `Parse` error, truncating the offending text to
    /// [`PARSE_EXCERPT_LIMIT`] characters.
    pub fn parse(message: impl Into<String>, raw: &str) -> Self {
        Self::Parse {
            message: message.into(),
            excerpt: raw.chars().take(PARSE_EXCERPT_LIMIT).collect(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Service(_))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
