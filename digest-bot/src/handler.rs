use std::sync::Arc;

use digest_common::command::ServiceCommand;
use digest_common::event::BotEvent;
use digest_common::models::{DigestPeriod, IncomingMessage};
use teloxide::RequestError;
use teloxide::payloads::{SendDocumentSetters, SendMessageSetters};
use teloxide::prelude::Requester;
use teloxide::types::{ChatAction, ChatId, InputFile, ReplyParameters};
use teloxide::utils::command::BotCommands;
use tokio::sync::{mpsc, oneshot};

use crate::BotSettings;
use crate::command::Command;
use crate::rate_limit::RateLimiters;
use crate::response;
use crate::utils::{export_file_name, hits_csv, parse_export_days, split_telegram_message};

const SEND_TIMEOUT: tokio::time::Duration = tokio::time::Duration::from_secs(30);

/// Sends a command to the digest service and waits for its answer.
/// `None` means the service is gone.
async fn request<T>(
    service_tx: &mpsc::Sender<ServiceCommand>,
    command: impl FnOnce(oneshot::Sender<Result<T, String>>) -> ServiceCommand,
) -> Option<Result<T, String>> {
    let (tx, rx) = oneshot::channel();

    if service_tx.send(command(tx)).await.is_err() {
        return None;
    }

    rx.await.ok()
}

pub(crate) async fn handle_message(
    bot: teloxide::prelude::Bot,
    msg: teloxide::prelude::Message,
    me: teloxide::types::Me,
    service_tx: mpsc::Sender<ServiceCommand>,
    rate_limiters: Arc<RateLimiters>,
    settings: BotSettings,
) -> teloxide::prelude::ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    match Command::parse(text, me.username()) {
        Ok(cmd) => {
            if let Some(user) = msg.from.as_ref()
                && rate_limiters.commands.check_key(&(user.id.0 as i64)).is_err()
            {
                tracing::warn!(user_id = %user.id, "command rate limit hit");
                return Ok(());
            }

            handle_command(&bot, &msg, cmd, &service_tx, &rate_limiters).await
        }
        // Commands addressed to other bots are common in groups
        Err(_) if text.starts_with('/') => {
            if msg.chat.is_private() {
                bot.send_message(msg.chat.id, response::unknown_command())
                    .await?;
            }
            Ok(())
        }
        Err(_) => capture_message(&bot, &msg, text, &service_tx, &settings).await,
    }
}

async fn handle_command(
    bot: &teloxide::prelude::Bot,
    msg: &teloxide::prelude::Message,
    cmd: Command,
    service_tx: &mpsc::Sender<ServiceCommand>,
    rate_limiters: &RateLimiters,
) -> teloxide::prelude::ResponseResult<()> {
    let chat_id = msg.chat.id.0;

    let reply = match cmd {
        Command::Help => response::help(),
        Command::Start => response::start(),
        Command::Chatid => response::chat_id(chat_id),

        Command::Search(query) => {
            let query = query.trim().to_string();
            if query.is_empty() {
                response::search_usage()
            } else {
                let result = request(service_tx, |tx| ServiceCommand::Search {
                    chat_id,
                    query,
                    response: tx,
                })
                .await;

                match result {
                    Some(Ok(hits)) => response::search_results(&hits),
                    Some(Err(e)) => response::failed("search", &e),
                    None => response::service_unavailable(),
                }
            }
        }

        Command::Stats => {
            let result = request(service_tx, |tx| ServiceCommand::Stats {
                chat_id,
                response: tx,
            })
            .await;

            match result {
                Some(Ok(stats)) => response::stats(&stats),
                Some(Err(e)) => response::failed("collect statistics", &e),
                None => response::service_unavailable(),
            }
        }

        Command::DigestToday => {
            return send_requested_digest(bot, msg, DigestPeriod::Today, service_tx, rate_limiters)
                .await;
        }

        Command::DigestWeek => {
            return send_requested_digest(bot, msg, DigestPeriod::Week, service_tx, rate_limiters)
                .await;
        }

        Command::DigestTime(time) => {
            let time = time.trim().to_string();
            if time.is_empty() {
                let result = request(service_tx, |tx| ServiceCommand::GetDigestTime {
                    chat_id,
                    response: tx,
                })
                .await;

                match result {
                    Some(Ok(time)) => response::current_digest_time(&time),
                    Some(Err(e)) => response::failed("get the digest time", &e),
                    None => response::service_unavailable(),
                }
            } else {
                let result = request(service_tx, |tx| ServiceCommand::SetDigestTime {
                    chat_id,
                    time,
                    response: tx,
                })
                .await;

                match result {
                    Some(Ok(time)) => response::digest_time_updated(&time),
                    Some(Err(e)) => response::failed("set the digest time", &e),
                    None => response::service_unavailable(),
                }
            }
        }

        Command::Keywords => {
            let result = request(service_tx, |tx| ServiceCommand::GetKeywords {
                chat_id,
                response: tx,
            })
            .await;

            match result {
                Some(Ok(keywords)) => response::keywords(&keywords),
                Some(Err(e)) => response::failed("get keywords", &e),
                None => response::service_unavailable(),
            }
        }

        Command::SetKeywords(keywords) => {
            let result = request(service_tx, |tx| ServiceCommand::SetKeywords {
                chat_id,
                keywords,
                response: tx,
            })
            .await;

            match result {
                Some(Ok(keywords)) => response::keywords_updated(&keywords),
                Some(Err(e)) => response::failed("update keywords", &e),
                None => response::service_unavailable(),
            }
        }

        Command::SetAdmin => set_admin(bot, msg, service_tx).await?,

        Command::HitsToday => {
            let result = request(service_tx, |tx| ServiceCommand::HitsToday {
                chat_id,
                response: tx,
            })
            .await;

            match result {
                Some(Ok(count)) => response::hits_today(count),
                Some(Err(e)) => response::failed("count keyword hits", &e),
                None => response::service_unavailable(),
            }
        }

        Command::ExportHits(arg) => {
            let days = parse_export_days(&arg);
            let result = request(service_tx, |tx| ServiceCommand::ExportHits {
                chat_id,
                days,
                response: tx,
            })
            .await;

            match result {
                Some(Ok(rows)) if rows.is_empty() => response::no_hits(days),
                Some(Ok(rows)) => match hits_csv(&rows) {
                    Ok(data) => {
                        bot.send_document(
                            msg.chat.id,
                            InputFile::memory(data).file_name(export_file_name(days)),
                        )
                        .caption(response::export_caption(days))
                        .await?;

                        return Ok(());
                    }
                    Err(error) => {
                        tracing::error!(%error, "failed to render keyword hits CSV");
                        response::failed("export keyword hits", &error.to_string())
                    }
                },
                Some(Err(e)) => response::failed("export keyword hits", &e),
                None => response::service_unavailable(),
            }
        }
    };

    bot.send_message(msg.chat.id, reply).await?;

    Ok(())
}

async fn send_requested_digest(
    bot: &teloxide::prelude::Bot,
    msg: &teloxide::prelude::Message,
    period: DigestPeriod,
    service_tx: &mpsc::Sender<ServiceCommand>,
    rate_limiters: &RateLimiters,
) -> teloxide::prelude::ResponseResult<()> {
    let chat_id = msg.chat.id;

    if rate_limiters.digest.check_key(&chat_id.0).is_err() {
        bot.send_message(chat_id, response::digest_rate_limited())
            .await?;
        return Ok(());
    }

    // a digest takes a while, let the chat know something is happening
    if let Err(error) = bot.send_chat_action(chat_id, ChatAction::Typing).await {
        tracing::warn!(%error, "failed to send chat action");
    }

    let result = request(service_tx, |tx| ServiceCommand::Digest {
        chat_id: chat_id.0,
        period,
        response: tx,
    })
    .await;

    match result {
        Some(Ok(Some(digest))) => send_digest(bot, chat_id, digest).await,
        Some(Ok(None)) => {
            let reply = match period {
                DigestPeriod::Today => response::no_messages_today(),
                DigestPeriod::Week => response::no_messages_week(),
            };
            bot.send_message(chat_id, reply).await?;
            Ok(())
        }
        Some(Err(error)) => {
            tracing::error!(%error, chat_id = %chat_id.0, "requested digest failed");
            bot.send_message(chat_id, response::digest_failed()).await?;
            Ok(())
        }
        None => {
            bot.send_message(chat_id, response::service_unavailable())
                .await?;
            Ok(())
        }
    }
}

async fn set_admin(
    bot: &teloxide::prelude::Bot,
    msg: &teloxide::prelude::Message,
    service_tx: &mpsc::Sender<ServiceCommand>,
) -> teloxide::prelude::ResponseResult<String> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(response::failed("set the alert recipient", "unknown sender"));
    };

    if !msg.chat.is_private() {
        let member = bot.get_chat_member(msg.chat.id, user.id).await?;
        if !member.kind.is_privileged() {
            return Ok(response::failed(
                "set the alert recipient",
                "only chat administrators can do this",
            ));
        }
    }

    let result = request(service_tx, |tx| ServiceCommand::SetAdmin {
        chat_id: msg.chat.id.0,
        user_id: user.id.0 as i64,
        response: tx,
    })
    .await;

    Ok(match result {
        Some(Ok(())) => response::admin_updated(),
        Some(Err(e)) => response::failed("set the alert recipient", &e),
        None => response::service_unavailable(),
    })
}

async fn capture_message(
    bot: &teloxide::prelude::Bot,
    msg: &teloxide::prelude::Message,
    text: &str,
    service_tx: &mpsc::Sender<ServiceCommand>,
    settings: &BotSettings,
) -> teloxide::prelude::ResponseResult<()> {
    let message = IncomingMessage {
        chat_id: msg.chat.id.0,
        message_id: msg.id.0,
        user_id: msg.from.as_ref().map(|user| user.id.0 as i64),
        username: msg.from.as_ref().and_then(|user| user.username.clone()),
        text: text.to_string(),
        date: msg.date.timestamp(),
    };

    let result = request(service_tx, |tx| ServiceCommand::StoreMessage {
        message,
        response: tx,
    })
    .await;

    match result {
        Some(Ok(hits)) if !hits.is_empty() && settings.keyword_reply => {
            bot.send_message(msg.chat.id, response::keyword_reply(&hits))
                .reply_parameters(ReplyParameters::new(msg.id))
                .await?;
        }
        Some(Ok(_)) => (),
        Some(Err(error)) => {
            tracing::debug!(%error, chat_id = %msg.chat.id, "message not stored");
        }
        None => {
            tracing::error!("digest service not responding");
        }
    }

    Ok(())
}

/// Sends a digest as Markdown, falling back to plain text when Telegram
/// rejects the markup.
pub(crate) async fn send_digest(
    bot: &teloxide::prelude::Bot,
    chat_id: ChatId,
    text: String,
) -> teloxide::prelude::ResponseResult<()> {
    use teloxide::types::ParseMode;

    for part in split_telegram_message(text) {
        let sent = bot
            .send_message(chat_id, &part)
            .parse_mode(ParseMode::Markdown)
            .await;

        match sent {
            Ok(_) => (),
            Err(RequestError::Api(error)) => {
                tracing::warn!(%error, %chat_id, "markdown rejected, sending plain text");
                bot.send_message(chat_id, part).await?;
            }
            Err(error) => return Err(error),
        }
    }

    Ok(())
}

pub(crate) async fn handle_events(
    bot: teloxide::prelude::Bot,
    mut event_rx: mpsc::Receiver<BotEvent>,
) {
    while let Some(event) = event_rx.recv().await {
        match event {
            BotEvent::ScheduledDigest { chat_id, text } => {
                tracing::info!(%chat_id, "sending daily digest");

                match tokio::time::timeout(SEND_TIMEOUT, send_digest(&bot, ChatId(chat_id), text))
                    .await
                {
                    Ok(Ok(())) => tracing::info!(%chat_id, "daily digest sent"),
                    Ok(Err(error)) => {
                        tracing::error!(%error, %chat_id, "failed to send daily digest");
                    }
                    Err(_) => tracing::error!(%chat_id, "timed out sending daily digest"),
                }
            }

            BotEvent::KeywordAlert {
                recipient_id,
                chat_id,
                author,
                keywords,
                text,
            } => {
                let alert = response::keyword_alert(chat_id, &author, &keywords, &text);
                let send_msg_fut = bot.send_message(ChatId(recipient_id), alert);

                match tokio::time::timeout(SEND_TIMEOUT, send_msg_fut).await {
                    Ok(Ok(_)) => tracing::info!(%recipient_id, %chat_id, "keyword alert sent"),
                    Ok(Err(error)) => {
                        tracing::error!(%error, %recipient_id, "failed to send keyword alert");
                    }
                    Err(_) => tracing::error!(%recipient_id, "timed out sending keyword alert"),
                }
            }
        }
    }
}
