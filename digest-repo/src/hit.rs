use futures::TryStreamExt;
use mongodb::bson::doc;

use crate::models::KeywordHit;
use crate::{DigestRepoResult, Repo};

impl Repo {
    pub async fn store_keyword_hit(&self, hit: KeywordHit) -> DigestRepoResult<()> {
        self.keyword_hits().insert_one(hit).await?;
        Ok(())
    }

    pub async fn count_hits(&self, chat_id: i64, since: i64) -> DigestRepoResult<u64> {
        let count = self
            .keyword_hits()
            .count_documents(doc! { "chat_id": chat_id, "date": { "$gte": since } })
            .await?;

        Ok(count)
    }

    pub async fn get_hits(&self, chat_id: i64, since: i64) -> DigestRepoResult<Vec<KeywordHit>> {
        let cursor = self
            .keyword_hits()
            .find(doc! { "chat_id": chat_id, "date": { "$gte": since } })
            .sort(doc! { "date": 1 })
            .await?;

        let hits: Vec<KeywordHit> = cursor.try_collect().await?;
        Ok(hits)
    }
}
