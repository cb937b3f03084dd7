use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat credential missing: OPENAI_API_KEY is not set")]
    MissingCredential,
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Chat API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("chat completion contained no choices")]
    EmptyResponse,
}
