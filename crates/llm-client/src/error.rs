use thiserror::Error;

/// Errors that can occur when talking to the LLM collaborator service.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Failed to reach LLM service: {0}")]
    ConnectionError(String),

    #[error("LLM service returned status {status}: {message}")]
    ServiceError { status: u16, message: String },

    #[error("Invalid response from LLM service: {0}")]
    InvalidResponse(String),

    #[error("LLM collaborator not configured")]
    NotConfigured,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LlmError::InvalidResponse(err.to_string())
        } else {
            LlmError::ConnectionError(err.to_string())
        }
    }
}
