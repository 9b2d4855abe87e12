use super::LlmError;

/// Remote text-generation provider (allows mocking).
///
/// One call per request, no retries. Implementations own their model name and
/// timeout; the timeout is enforced by the underlying HTTP client.
pub trait LlmClient: Send + Sync {
    fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError>;

    /// Model identifier, reported in audit metadata.
    fn model(&self) -> &str;
}

impl<C: LlmClient + ?Sized> LlmClient for Box<C> {
    fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        (**self).generate(prompt, system)
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}

/// Sampling settings shared by every provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

/// Low temperature: the model reorganizes, it does not compose.
pub const GENERATION_SETTINGS: GenerationSettings = GenerationSettings {
    temperature: 0.1,
    top_p: 0.8,
    top_k: 40,
    max_output_tokens: 4096,
};
