#[derive(Debug, thiserror::Error)]
pub enum DigestAiError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Empty completion returned by the API")]
    EmptyResponse,

    #[error("Nothing to summarize")]
    EmptyInput,

    #[error("Blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Fallback generation failed: {0}")]
    Fallback(Box<DigestAiError>),
}

pub type DigestAiResult<T> = Result<T, DigestAiError>;
