use chrono::DateTime;
use digest_common::models::{ChatStats, SearchHit};
use teloxide::utils::command::BotCommands;

use crate::command::Command;

const SNIPPET_CHARS: usize = 200;

pub fn start() -> String {
    format!(
        "👋 Hello! I keep track of this chat and write digests of the discussion.\n\n{}",
        Command::descriptions()
    )
}

pub fn help() -> String {
    Command::descriptions().to_string()
}

pub fn chat_id(chat_id: i64) -> String {
    format!("Chat ID: {chat_id}")
}

pub fn search_usage() -> String {
    "Usage: /search <query>".to_string()
}

pub fn search_results(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "Nothing found.".to_string();
    }

    hits.iter()
        .map(|hit| {
            format!(
                "• {} — {}: {}",
                hit.time,
                hit.author,
                snippet(&hit.text, SNIPPET_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn stats(stats: &ChatStats) -> String {
    if stats.total == 0 {
        return "No messages in the last 7 days.".to_string();
    }

    let mut response = format!(
        "📊 Messages in the last 7 days: {}\nTop participants:\n",
        stats.total
    );
    for user in &stats.top {
        response.push_str(&format!("• {} — {}\n", user.author, user.count));
    }

    response
}

pub fn no_messages_today() -> String {
    "No messages today.".to_string()
}

pub fn no_messages_week() -> String {
    "No messages in the last 7 days.".to_string()
}

pub fn digest_failed() -> String {
    "❌ Digest generation failed, please try again later.".to_string()
}

pub fn digest_rate_limited() -> String {
    "⏳ A digest was requested recently, try again in a minute.".to_string()
}

pub fn current_digest_time(time: &str) -> String {
    format!("Daily digest time: {time}\nExample: /digest_time 21:30")
}

pub fn digest_time_updated(time: &str) -> String {
    format!("✅ Daily digest time updated: {time}")
}

pub fn keywords(keywords: &str) -> String {
    if keywords.is_empty() {
        "Watched keywords: (none)".to_string()
    } else {
        format!("Watched keywords: {keywords}")
    }
}

pub fn keywords_updated(keywords: &str) -> String {
    if keywords.is_empty() {
        "✅ Watched keywords cleared".to_string()
    } else {
        format!("✅ Watched keywords updated: {keywords}")
    }
}

pub fn admin_updated() -> String {
    "✅ Keyword alerts for this chat will be sent to you in private messages. \
     Make sure you have started a conversation with the bot."
        .to_string()
}

pub fn hits_today(count: u64) -> String {
    format!("Messages with watched keywords today: {count}")
}

pub fn no_hits(days: i64) -> String {
    format!("No keyword hits in the last {days} days.")
}

pub fn export_caption(days: i64) -> String {
    format!("Keyword hits for the last {days} days")
}

pub fn keyword_reply(keywords: &[String]) -> String {
    format!("🔎 Keywords found: {}", keywords.join(", "))
}

pub fn keyword_alert(chat_id: i64, author: &str, keywords: &[String], text: &str) -> String {
    format!(
        "🔔 Keyword hit in chat {chat_id}\nKeywords: {}\nFrom: {author}\n\n{}",
        keywords.join(", "),
        snippet(text, SNIPPET_CHARS * 5)
    )
}

pub fn failed(action: &str, error: &str) -> String {
    format!("❌ Failed to {action}: {error}")
}

pub fn service_unavailable() -> String {
    "❌ Internal error: digest service not responding".to_string()
}

pub fn unknown_command() -> String {
    "❌ Unknown command".to_string()
}

pub(crate) fn format_timestamp(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|date| date.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

pub(crate) fn snippet(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}…", &text[..end]),
        None => text.to_string(),
    }
}
