#[derive(Debug, thiserror::Error)]
pub enum DigestRepoError {
    #[error("database error: {0}")]
    MongodbError(#[from] mongodb::error::Error),

    #[error("serialization error: {0}")]
    MongodbSerializationError(#[from] mongodb::bson::ser::Error),

    #[error("deserialization error: {0}")]
    MongodbDeserializationError(#[from] mongodb::bson::de::Error),
}

pub type DigestRepoResult<T> = Result<T, DigestRepoError>;
