pub mod types;
pub mod prompt;
pub mod parser;
pub mod gemini;
pub mod openai;
pub mod mock;
pub mod orchestrator;

pub use types::*;
pub use prompt::*;
pub use parser::*;
pub use gemini::*;
pub use openai::*;
pub use mock::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("LLM not configured: no API key for any provider")]
    NotConfigured,

    #[error("Failed to initialize LLM client: {0}")]
    Init(String),

    #[error("Cannot reach LLM provider at {0}")]
    Connection(String),

    #[error("HTTP transport error: {0}")]
    Transport(String),

    #[error("LLM request timed out after {0}s")]
    Timeout(u64),

    #[error("LLM provider returned error (status {status}): {body}")]
    Http { status: u16, body: String },

    #[error("Empty response from LLM provider")]
    EmptyResponse,

    #[error("Malformed LLM response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("No valid sections in LLM response")]
    NoValidSections,
}

/// Error bodies are clipped before they are stored or logged.
pub(crate) const ERROR_BODY_LIMIT: usize = 200;

pub(crate) fn clip_error_body(body: &str) -> String {
    crate::text::take_chars(body, ERROR_BODY_LIMIT)
}

/// Map a transport failure onto the engine's error type.
pub(crate) fn map_transport_error(e: reqwest::Error, endpoint: &str, timeout_secs: u64) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout(timeout_secs)
    } else if e.is_connect() {
        LlmError::Connection(endpoint.to_string())
    } else {
        LlmError::Transport(e.to_string())
    }
}
