use std::sync::atomic::{AtomicUsize, Ordering};

use super::types::LlmClient;
use super::LlmError;

/// Mock LLM client for testing. Returns a fixed response or a fixed error and
/// counts calls.
pub struct MockLlmClient {
    outcome: Result<String, LlmError>,
    model: String,
    calls: AtomicUsize,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            outcome: Ok(response.to_string()),
            model: "mock-model".to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    /// A client whose every call fails with `error`.
    pub fn failing(error: LlmError) -> Self {
        Self {
            outcome: Err(error),
            model: "mock-model".to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LlmClient for MockLlmClient {
    fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_configured_response_and_counts() {
        let client = MockLlmClient::new("hello");
        assert_eq!(client.generate("p", "s").unwrap(), "hello");
        assert_eq!(client.generate("p", "s").unwrap(), "hello");
        assert_eq!(client.call_count(), 2);
        assert_eq!(client.model(), "mock-model");
    }

    #[test]
    fn failing_client_returns_error() {
        let client = MockLlmClient::failing(LlmError::Timeout(10)).with_model("gemini-1.5-flash");
        assert_eq!(client.generate("p", "s"), Err(LlmError::Timeout(10)));
        assert_eq!(client.model(), "gemini-1.5-flash");
    }
}
