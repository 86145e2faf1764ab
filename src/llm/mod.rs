pub mod types;
pub mod watsonx;

pub use types::*;
pub use watsonx::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("LLM service is not reachable at {0}")]
    Connection(String),

    #[error("LLM service returned error (status {status}): {body}")]
    Service { status: u16, body: String },

    #[error("IAM token exchange failed: {0}")]
    Authentication(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("LLM returned no generated text")]
    EmptyResponse,

    #[error("LLM task failed: {0}")]
    Task(String),
}
