#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Repository error: {0}")]
    Repo(#[from] digest_repo::DigestRepoError),

    #[error("Digest generation failed: {0}")]
    AI(#[from] digest_ai::DigestAiError),

    #[error("Unknown timezone: {0}")]
    Timezone(String),

    #[error("Invalid time {0:?}, expected HH:MM (e.g. 21:30)")]
    InvalidDigestTime(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
