use mongodb::bson::doc;

use crate::models::ChatSettings;
use crate::{DigestRepoResult, Repo};

impl Repo {
    pub async fn get_settings(&self, chat_id: i64) -> DigestRepoResult<Option<ChatSettings>> {
        let settings = self
            .settings()
            .find_one(doc! { "chat_id": chat_id })
            .await?;

        Ok(settings)
    }

    pub async fn get_digest_time(&self, chat_id: i64) -> DigestRepoResult<Option<String>> {
        Ok(self
            .get_settings(chat_id)
            .await?
            .and_then(|s| s.digest_time))
    }

    pub async fn set_digest_time(&self, chat_id: i64, digest_time: &str) -> DigestRepoResult<()> {
        self.settings()
            .update_one(
                doc! { "chat_id": chat_id },
                doc! { "$set": { "digest_time": digest_time } },
            )
            .upsert(true)
            .await?;

        Ok(())
    }

    /// Comma separated watchlist, empty when none is configured.
    pub async fn get_keywords(&self, chat_id: i64) -> DigestRepoResult<String> {
        Ok(self
            .get_settings(chat_id)
            .await?
            .and_then(|s| s.keywords)
            .map(|k| k.trim().to_string())
            .unwrap_or_default())
    }

    pub async fn set_keywords(&self, chat_id: i64, keywords: &str) -> DigestRepoResult<()> {
        self.settings()
            .update_one(
                doc! { "chat_id": chat_id },
                doc! { "$set": { "keywords": keywords } },
            )
            .upsert(true)
            .await?;

        Ok(())
    }

    pub async fn get_admin(&self, chat_id: i64) -> DigestRepoResult<Option<i64>> {
        Ok(self
            .get_settings(chat_id)
            .await?
            .and_then(|s| s.admin_user_id))
    }

    pub async fn set_admin(&self, chat_id: i64, admin_user_id: i64) -> DigestRepoResult<()> {
        self.settings()
            .update_one(
                doc! { "chat_id": chat_id },
                doc! { "$set": { "admin_user_id": admin_user_id } },
            )
            .upsert(true)
            .await?;

        Ok(())
    }
}
