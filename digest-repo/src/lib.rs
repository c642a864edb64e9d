mod config;
mod error;
mod hit;
mod message;
pub mod models;
mod settings;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::{DigestRepoError, DigestRepoResult};
use mongodb::IndexModel;
use mongodb::bson::doc;
use mongodb::options::IndexOptions;

use crate::models::{ChatSettings, KeywordHit, StoredMessage};

#[derive(Clone)]
pub struct Repo {
    db: mongodb::Database,
}

impl Repo {
    pub async fn new(config: &Config) -> DigestRepoResult<Self> {
        let client_options =
            mongodb::options::ClientOptions::parse(&config.connection_string).await?;

        let client = mongodb::Client::with_options(client_options)?;

        let db = client.database(&config.database_name);

        let repo = Self { db };
        repo.ensure_indexes().await?;

        Ok(repo)
    }

    async fn ensure_indexes(&self) -> DigestRepoResult<()> {
        self.messages()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "chat_id": 1, "date": 1 })
                    .build(),
            )
            .await?;

        // full-text search over message bodies
        self.messages()
            .create_index(IndexModel::builder().keys(doc! { "text": "text" }).build())
            .await?;

        self.settings()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "chat_id": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
            )
            .await?;

        self.keyword_hits()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "chat_id": 1, "date": 1 })
                    .build(),
            )
            .await?;

        tracing::info!(database = %self.db.name(), "indexes ensured");

        Ok(())
    }

    fn messages(&self) -> mongodb::Collection<StoredMessage> {
        self.db.collection("messages")
    }

    fn settings(&self) -> mongodb::Collection<ChatSettings> {
        self.db.collection("chat_settings")
    }

    fn keyword_hits(&self) -> mongodb::Collection<KeywordHit> {
        self.db.collection("keyword_hits")
    }
}
