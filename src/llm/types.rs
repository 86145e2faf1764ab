use serde::{Deserialize, Serialize};

use super::LlmError;

/// Stop sequences that end generation early.
pub const STOP_SEQUENCES: &[&str] = &["Human:", "Observation"];

pub const MIN_NEW_TOKENS: u32 = 5;
pub const MAX_NEW_TOKENS: u32 = 500;

/// Text-completion client abstraction (allows mocking).
///
/// Implementations are blocking; async callers go through
/// `LlmService`, which moves the call onto the blocking pool.
pub trait LlmClient: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Model identifier, for display only.
    fn model_id(&self) -> &str;

    fn params(&self) -> &GenerationParams;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodingMethod {
    Greedy,
    Sample,
}

/// Fixed generation configuration sent with every request.
///
/// Decoding is greedy, so no temperature is configured: a sampling
/// temperature has no effect under greedy decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub decoding_method: DecodingMethod,
    pub min_new_tokens: u32,
    pub max_new_tokens: u32,
    pub stop_sequences: Vec<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            decoding_method: DecodingMethod::Greedy,
            min_new_tokens: MIN_NEW_TOKENS,
            max_new_tokens: MAX_NEW_TOKENS,
            stop_sequences: STOP_SEQUENCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
