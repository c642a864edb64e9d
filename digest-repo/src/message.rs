use std::collections::BTreeSet;

use futures::TryStreamExt;
use mongodb::bson::{Document, doc};

use crate::models::{StoredMessage, UserMessageCount};
use crate::{DigestRepoResult, Repo};

impl Repo {
    pub async fn store_message(&self, msg: StoredMessage) -> DigestRepoResult<()> {
        // Upsert to avoid duplicates on redelivered updates
        self.messages()
            .update_one(
                doc! {
                    "chat_id": msg.chat_id,
                    "message_id": msg.message_id
                },
                doc! { "$set": mongodb::bson::to_document(&msg)? },
            )
            .upsert(true)
            .await?;

        Ok(())
    }

    /// Messages of a chat within `[since, until)`, oldest first.
    /// Without `until` the window is open ended.
    pub async fn get_messages(
        &self,
        chat_id: i64,
        since: i64,
        until: Option<i64>,
    ) -> DigestRepoResult<Vec<StoredMessage>> {
        let mut date = doc! { "$gte": since };
        if let Some(until) = until {
            date.insert("$lt", until);
        }

        let cursor = self
            .messages()
            .find(doc! { "chat_id": chat_id, "date": date })
            .sort(doc! { "date": 1, "message_id": 1 })
            .await?;

        let messages: Vec<StoredMessage> = cursor.try_collect().await?;
        Ok(messages)
    }

    pub async fn count_messages(&self, chat_id: i64, since: i64) -> DigestRepoResult<u64> {
        let count = self
            .messages()
            .count_documents(doc! { "chat_id": chat_id, "date": { "$gte": since } })
            .await?;

        Ok(count)
    }

    /// Most active authors since `since`, busiest first.
    pub async fn top_users(
        &self,
        chat_id: i64,
        since: i64,
        limit: i64,
    ) -> DigestRepoResult<Vec<UserMessageCount>> {
        let pipeline = [
            doc! { "$match": { "chat_id": chat_id, "date": { "$gte": since } } },
            doc! {
                "$group": {
                    "_id": { "user_id": "$user_id", "username": "$username" },
                    "count": { "$sum": 1 }
                }
            },
            doc! { "$sort": { "count": -1 } },
            doc! { "$limit": limit },
            doc! {
                "$project": {
                    "_id": 0,
                    "user_id": "$_id.user_id",
                    "username": "$_id.username",
                    "count": 1
                }
            },
        ];

        let cursor = self.messages().aggregate(pipeline).await?;
        let rows: Vec<Document> = cursor.try_collect().await?;

        let counts = rows
            .into_iter()
            .map(mongodb::bson::from_document)
            .collect::<Result<Vec<UserMessageCount>, _>>()?;

        Ok(counts)
    }

    /// Full-text search over a chat's history, newest first.
    pub async fn search(
        &self,
        chat_id: i64,
        query: &str,
        limit: i64,
    ) -> DigestRepoResult<Vec<StoredMessage>> {
        let cursor = self
            .messages()
            .find(doc! { "chat_id": chat_id, "$text": { "$search": query } })
            .sort(doc! { "date": -1 })
            .limit(limit)
            .await?;

        let messages: Vec<StoredMessage> = cursor.try_collect().await?;
        Ok(messages)
    }

    /// Every chat the bot knows about: chats with stored messages or settings.
    pub async fn all_chats(&self) -> DigestRepoResult<Vec<i64>> {
        let with_messages = self.messages().distinct("chat_id", doc! {}).await?;
        let with_settings = self.settings().distinct("chat_id", doc! {}).await?;

        let chat_ids: BTreeSet<i64> = with_messages
            .into_iter()
            .chain(with_settings)
            .filter_map(|v| v.as_i64())
            .collect();

        Ok(chat_ids.into_iter().collect())
    }
}
