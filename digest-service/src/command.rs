use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use digest_ai::{ChatMessage, Summarizer};
use digest_common::event::BotEvent;
use digest_common::keywords::match_keywords;
use digest_common::models::{
    ChatStats, DigestPeriod, IncomingMessage, KeywordHitRow, SearchHit, UserActivity,
    author_label,
};
use digest_repo::Repo;
use digest_repo::models::{KeywordHit, StoredMessage};
use tokio::sync::oneshot;

use crate::schedule::{
    DAILY_LABEL, digest_window, format_local, is_digest_due, local_day_start, local_minute,
    normalize_digest_time,
};
use crate::{DigestService, ServiceError, ServiceResult, reply};

const SEARCH_LIMIT: i64 = 20;
const TOP_USERS_LIMIT: i64 = 10;
const STATS_DAYS: i64 = 7;
const MAX_EXPORT_DAYS: i64 = 365;
const LOG_PREVIEW_CHARS: usize = 200;

impl<S: Summarizer + Send + Sync + 'static> DigestService<S> {
    /// Stores a captured message and runs it against the chat's watchlist.
    /// Returns the keywords it matched.
    pub(crate) async fn store_message(&self, message: IncomingMessage) -> ServiceResult<Vec<String>> {
        if message.text.trim().is_empty() {
            return Ok(Vec::new());
        }

        self.repo
            .store_message(StoredMessage {
                id: None,
                chat_id: message.chat_id,
                message_id: message.message_id,
                user_id: message.user_id,
                username: message.username.clone(),
                text: message.text.clone(),
                date: message.date,
            })
            .await?;

        let keywords = self.repo.get_keywords(message.chat_id).await?;
        let hits = match_keywords(&message.text, &keywords);

        if hits.is_empty() {
            return Ok(hits);
        }

        let stored = self
            .repo
            .store_keyword_hit(KeywordHit {
                id: None,
                chat_id: message.chat_id,
                message_id: message.message_id,
                user_id: message.user_id,
                username: message.username.clone(),
                matched: hits.join(","),
                text: message.text.clone(),
                date: message.date,
            })
            .await;

        if let Err(error) = stored {
            tracing::warn!(%error, chat_id = %message.chat_id, "failed to store keyword hit");
        }

        tracing::info!(
            chat_id = %message.chat_id,
            keywords = %hits.join(", "),
            text = %log_preview(&message.text, LOG_PREVIEW_CHARS),
            "keyword hit"
        );

        self.route_alert(&message, &hits).await;

        Ok(hits)
    }

    /// Forwards a keyword hit to the chat's delegated recipient, if there is one.
    async fn route_alert(&self, message: &IncomingMessage, hits: &[String]) {
        let recipient_id = match self.repo.get_admin(message.chat_id).await {
            Ok(Some(recipient_id)) => recipient_id,
            Ok(None) => return,
            Err(error) => {
                tracing::error!(%error, chat_id = %message.chat_id, "failed to get alert recipient");
                return;
            }
        };

        let event = BotEvent::KeywordAlert {
            recipient_id,
            chat_id: message.chat_id,
            author: author_label(message.username.as_deref(), message.user_id),
            keywords: hits.to_vec(),
            text: message.text.clone(),
        };

        if let Err(error) = self.event_tx.send(event).await {
            tracing::error!(%error, "failed sending keyword alert to bot");
        }
    }

    /// Generates a requested digest off the command loop and answers through
    /// `response` once it is ready.
    pub(crate) fn spawn_digest(
        &self,
        chat_id: i64,
        period: DigestPeriod,
        response: oneshot::Sender<Result<Option<String>, String>>,
    ) {
        let window = digest_window(period, self.timezone, Utc::now());
        let repo = self.repo.clone();
        let summarizer = Arc::clone(&self.summarizer);

        tokio::spawn(async move {
            let result =
                digest_since(&repo, summarizer.as_ref(), chat_id, window.since, window.label).await;
            reply(response, result);
        });
    }

    /// Starts the daily digest of every chat due at the local minute of `at`.
    pub(crate) async fn run_scheduled_digests(&self, at: DateTime<Utc>) {
        let minute = local_minute(self.timezone, at);

        let chat_ids = match self.repo.all_chats().await {
            Ok(chat_ids) => chat_ids,
            Err(error) => {
                tracing::error!(%error, %minute, "failed to list chats for the scheduled digest");
                return;
            }
        };

        for chat_id in chat_ids {
            if !self.is_chat_allowed(chat_id) {
                continue;
            }

            let configured = match self.repo.get_digest_time(chat_id).await {
                Ok(configured) => configured,
                Err(error) => {
                    tracing::error!(%error, %chat_id, "failed to get digest time");
                    continue;
                }
            };

            if !is_digest_due(configured.as_deref(), &self.default_digest_time, &minute) {
                continue;
            }

            tracing::info!(%chat_id, %minute, "daily digest due");

            let since = local_day_start(self.timezone, at);
            let repo = self.repo.clone();
            let summarizer = Arc::clone(&self.summarizer);
            let event_tx = self.event_tx.clone();

            tokio::spawn(async move {
                match digest_since(&repo, summarizer.as_ref(), chat_id, since, DAILY_LABEL).await {
                    Ok(Some(text)) => {
                        if let Err(error) = event_tx
                            .send(BotEvent::ScheduledDigest { chat_id, text })
                            .await
                        {
                            tracing::error!(%error, "failed sending digest to bot");
                        }
                    }
                    Ok(None) => {
                        tracing::info!(%chat_id, "no messages today, skipping daily digest");
                    }
                    Err(error) => {
                        tracing::error!(%error, %chat_id, "daily digest failed");
                    }
                }
            });
        }
    }

    pub(crate) async fn search(&self, chat_id: i64, query: &str) -> ServiceResult<Vec<SearchHit>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let found = self.repo.search(chat_id, query, SEARCH_LIMIT).await?;

        Ok(found
            .into_iter()
            .map(|m| SearchHit {
                author: author_label(m.username.as_deref(), m.user_id),
                time: format_local(self.timezone, m.date),
                text: m.text,
            })
            .collect())
    }

    pub(crate) async fn stats(&self, chat_id: i64) -> ServiceResult<ChatStats> {
        let since = (Utc::now() - Duration::days(STATS_DAYS)).timestamp();

        let total = self.repo.count_messages(chat_id, since).await?;
        if total == 0 {
            return Ok(ChatStats::default());
        }

        let top = self
            .repo
            .top_users(chat_id, since, TOP_USERS_LIMIT)
            .await?
            .into_iter()
            .map(|row| UserActivity {
                author: author_label(row.username.as_deref(), row.user_id),
                count: row.count.max(0) as u64,
            })
            .collect();

        Ok(ChatStats { total, top })
    }

    pub(crate) async fn get_digest_time(&self, chat_id: i64) -> ServiceResult<String> {
        Ok(self
            .repo
            .get_digest_time(chat_id)
            .await?
            .unwrap_or_else(|| self.default_digest_time.clone()))
    }

    pub(crate) async fn set_digest_time(&self, chat_id: i64, time: &str) -> ServiceResult<String> {
        let time = normalize_digest_time(time)
            .ok_or_else(|| ServiceError::InvalidDigestTime(time.trim().to_string()))?;

        self.repo.set_digest_time(chat_id, &time).await?;
        tracing::info!(%chat_id, %time, "digest time updated");

        Ok(time)
    }

    pub(crate) async fn get_keywords(&self, chat_id: i64) -> ServiceResult<String> {
        Ok(self.repo.get_keywords(chat_id).await?)
    }

    pub(crate) async fn set_keywords(&self, chat_id: i64, keywords: &str) -> ServiceResult<String> {
        let keywords = normalize_keywords(keywords);

        self.repo.set_keywords(chat_id, &keywords).await?;
        tracing::info!(%chat_id, %keywords, "keywords updated");

        Ok(keywords)
    }

    pub(crate) async fn set_admin(&self, chat_id: i64, user_id: i64) -> ServiceResult<()> {
        self.repo.set_admin(chat_id, user_id).await?;
        tracing::info!(%chat_id, %user_id, "alert recipient updated");

        Ok(())
    }

    pub(crate) async fn hits_today(&self, chat_id: i64) -> ServiceResult<u64> {
        let since = local_day_start(self.timezone, Utc::now());
        Ok(self.repo.count_hits(chat_id, since).await?)
    }

    pub(crate) async fn export_hits(
        &self,
        chat_id: i64,
        days: i64,
    ) -> ServiceResult<Vec<KeywordHitRow>> {
        let since = (Utc::now() - Duration::days(days.clamp(1, MAX_EXPORT_DAYS))).timestamp();

        let hits = self.repo.get_hits(chat_id, since).await?;

        Ok(hits
            .into_iter()
            .map(|hit| KeywordHitRow {
                author: author_label(hit.username.as_deref(), hit.user_id),
                matched: hit.matched,
                text: hit.text,
                date: hit.date,
            })
            .collect())
    }
}

async fn digest_since<S: Summarizer>(
    repo: &Repo,
    summarizer: &S,
    chat_id: i64,
    since: i64,
    label: &str,
) -> ServiceResult<Option<String>> {
    let stored = repo.get_messages(chat_id, since, None).await?;

    tracing::debug!(%chat_id, count = stored.len(), label, "digest window loaded");

    summarize_window(summarizer, stored, label).await
}

/// `None` when the window holds no usable messages; the summarizer is never
/// called for it.
pub(crate) async fn summarize_window<S: Summarizer>(
    summarizer: &S,
    stored: Vec<StoredMessage>,
    label: &str,
) -> ServiceResult<Option<String>> {
    let messages = to_chat_messages(stored);

    if messages.is_empty() {
        return Ok(None);
    }

    tracing::info!(count = messages.len(), label, "generating digest");

    let digest = summarizer.summarize(messages, label).await?;

    Ok(Some(digest))
}

/// Drops blank messages, keeps the stored order.
pub(crate) fn to_chat_messages(stored: Vec<StoredMessage>) -> Vec<ChatMessage> {
    stored
        .into_iter()
        .filter(|m| !m.text.trim().is_empty())
        .map(|m| ChatMessage {
            username: m.username,
            user_id: m.user_id,
            text: m.text,
            date: m.date,
        })
        .collect()
}

/// Trims entries and drops blank ones: `" a, ,b "` becomes `"a,b"`.
pub(crate) fn normalize_keywords(keywords: &str) -> String {
    keywords
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

pub(crate) fn log_preview(text: &str, max_chars: usize) -> String {
    text.chars()
        .take(max_chars)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}
