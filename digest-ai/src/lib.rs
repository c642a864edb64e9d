mod blocking;
mod chunk;
mod config;
mod error;
pub mod openai;
mod summarize;

#[cfg(test)]
mod tests;

pub use blocking::{Blocking, BlockingGenerator};
pub use chunk::{DEFAULT_MAX_CHARS, chunk_messages, format_line};
pub use config::Config;
pub use error::*;
pub use summarize::{FallbackSummarizer, SYSTEM_PROMPT, block_prompt, merge_prompt, summarize_blocks};

/// A single chat message as it enters the summarization pipeline.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub username: Option<String>,
    pub user_id: Option<i64>,
    pub text: String,
    /// Unix timestamp, seconds
    pub date: i64,
}

impl ChatMessage {
    /// Author label used in the transcript: the username wins over the numeric id.
    pub fn label(&self) -> String {
        match (self.username.as_deref(), self.user_id) {
            (Some(username), _) if !username.is_empty() => username.to_string(),
            (_, Some(user_id)) => user_id.to_string(),
            _ => "unknown".to_string(),
        }
    }
}

/// Text generation capability backing the summarizer.
pub trait Generator: Send + Sync {
    fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> impl Future<Output = DigestAiResult<String>> + Send;
}

pub trait Summarizer {
    fn summarize(
        &self,
        messages: Vec<ChatMessage>,
        period_label: &str,
    ) -> impl Future<Output = DigestAiResult<String>> + Send;
}
