mod command;
mod config;
mod error;
mod schedule;

#[cfg(test)]
mod tests;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
pub use config::Config;
use digest_ai::Summarizer;
use digest_common::command::ServiceCommand;
use digest_common::event::BotEvent;
pub use error::*;
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;

use crate::schedule::{normalize_digest_time, pending_minutes};

pub struct DigestService<S: Summarizer> {
    repo: digest_repo::Repo,
    summarizer: Arc<S>,
    timezone: Tz,
    default_digest_time: String,
    allowed_chat_ids: HashSet<i64>,
    tick: Duration,
    command_rx: mpsc::Receiver<ServiceCommand>,
    event_tx: mpsc::Sender<BotEvent>,
}

impl<S: Summarizer + Send + Sync + 'static> DigestService<S> {
    pub fn new(
        config: &Config,
        repo: digest_repo::Repo,
        summarizer: S,
        command_rx: mpsc::Receiver<ServiceCommand>,
        event_tx: mpsc::Sender<BotEvent>,
    ) -> ServiceResult<Self> {
        let timezone = config
            .local_tz
            .parse::<Tz>()
            .map_err(|_| ServiceError::Timezone(config.local_tz.clone()))?;

        let default_digest_time = normalize_digest_time(&config.default_digest_time)
            .ok_or_else(|| ServiceError::InvalidDigestTime(config.default_digest_time.clone()))?;

        Ok(DigestService {
            repo,
            summarizer: Arc::new(summarizer),
            timezone,
            default_digest_time,
            allowed_chat_ids: config.allowed_chat_ids.iter().copied().collect(),
            tick: Duration::from_secs(config.scheduler_tick_secs.max(1)),
            command_rx,
            event_tx,
        })
    }

    pub async fn run(mut self) -> ServiceResult<()> {
        let mut ticker = tokio::time::interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // start of the last minute the scheduler processed
        let mut last_minute: Option<i64> = None;

        tracing::info!(
            timezone = %self.timezone,
            default_digest_time = %self.default_digest_time,
            "digest service started"
        );

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(ServiceCommand::Shutdown) | None => {
                            tracing::warn!("received shutdown command");
                            break;
                        }
                        Some(cmd) => self.handle_command(cmd).await,
                    }
                }

                _ = ticker.tick() => {
                    for minute in pending_minutes(last_minute, Utc::now()) {
                        if let Some(at) = DateTime::from_timestamp(minute, 0) {
                            self.run_scheduled_digests(at).await;
                        }
                        last_minute = Some(minute);
                    }
                }
            }
        }

        tracing::info!("digest service stopped");

        Ok(())
    }

    fn is_chat_allowed(&self, chat_id: i64) -> bool {
        is_allowed(&self.allowed_chat_ids, chat_id)
    }

    async fn handle_command(&self, cmd: ServiceCommand) {
        if let Some(chat_id) = cmd.get_chat_id()
            && !self.is_chat_allowed(chat_id)
        {
            tracing::warn!(%chat_id, "chat is not in the allow-list");
            cmd.respond_with_error(
                "Sorry, this chat is not allowed to use the bot 🙅‍♂️. Contact the admin if you want to get the access."
                    .to_string(),
            );
            return;
        }

        match cmd {
            ServiceCommand::StoreMessage { message, response } => {
                reply(response, self.store_message(message).await);
            }
            ServiceCommand::Digest {
                chat_id,
                period,
                response,
            } => {
                self.spawn_digest(chat_id, period, response);
            }
            ServiceCommand::Search {
                chat_id,
                query,
                response,
            } => {
                reply(response, self.search(chat_id, &query).await);
            }
            ServiceCommand::Stats { chat_id, response } => {
                reply(response, self.stats(chat_id).await);
            }
            ServiceCommand::GetDigestTime { chat_id, response } => {
                reply(response, self.get_digest_time(chat_id).await);
            }
            ServiceCommand::SetDigestTime {
                chat_id,
                time,
                response,
            } => {
                reply(response, self.set_digest_time(chat_id, &time).await);
            }
            ServiceCommand::GetKeywords { chat_id, response } => {
                reply(response, self.get_keywords(chat_id).await);
            }
            ServiceCommand::SetKeywords {
                chat_id,
                keywords,
                response,
            } => {
                reply(response, self.set_keywords(chat_id, &keywords).await);
            }
            ServiceCommand::SetAdmin {
                chat_id,
                user_id,
                response,
            } => {
                reply(response, self.set_admin(chat_id, user_id).await);
            }
            ServiceCommand::HitsToday { chat_id, response } => {
                reply(response, self.hits_today(chat_id).await);
            }
            ServiceCommand::ExportHits {
                chat_id,
                days,
                response,
            } => {
                reply(response, self.export_hits(chat_id, days).await);
            }
            ServiceCommand::Shutdown => (),
        }
    }
}

pub(crate) fn is_allowed(allowed_chat_ids: &HashSet<i64>, chat_id: i64) -> bool {
    allowed_chat_ids.is_empty() || allowed_chat_ids.contains(&chat_id)
}

fn reply<T>(response: oneshot::Sender<Result<T, String>>, result: ServiceResult<T>) {
    if let Err(error) = &result {
        tracing::error!(%error, "command failed");
    }

    if response.send(result.map_err(|e| e.to_string())).is_err() {
        tracing::warn!("requester went away before the response was sent");
    }
}
