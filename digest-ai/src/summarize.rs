use crate::{
    ChatMessage, DigestAiError, DigestAiResult, Generator, Summarizer, chunk::chunk_messages,
};

pub const SYSTEM_PROMPT: &str = "You are the attentive secretary of a Telegram group. \
Write a concise summary of the discussion, grouped by topic. \
Highlight tasks, deadlines, contested points and decisions that were made. \
At the end, add a Todo list and a risks/blockers section if there are any.";

pub fn block_prompt(index: usize, total: usize, period_label: &str, block: &str) -> String {
    format!("Summarize block {index}/{total} {period_label}:\n{block}")
}

pub fn merge_prompt(period_label: &str, partial_summaries: &[String]) -> String {
    let joined = partial_summaries
        .iter()
        .enumerate()
        .map(|(i, summary)| format!("Block {}: {summary}", i + 1))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Briefly merge all blocks {period_label} into a single digest with section headers:\n{joined}"
    )
}

/// Summarizes every block in order, then merges the partial summaries with one
/// more call. Any failed call fails the whole run.
pub async fn summarize_blocks<G: Generator>(
    generator: &G,
    blocks: &[String],
    period_label: &str,
) -> DigestAiResult<String> {
    let total = blocks.len();
    let mut partial_summaries = Vec::with_capacity(total);

    for (i, block) in blocks.iter().enumerate() {
        let prompt = block_prompt(i + 1, total, period_label, block);
        let summary = generator.generate(SYSTEM_PROMPT, &prompt).await?;
        partial_summaries.push(summary.trim().to_string());
    }

    let prompt = merge_prompt(period_label, &partial_summaries);
    let digest = generator.generate(SYSTEM_PROMPT, &prompt).await?;

    Ok(digest.trim().to_string())
}

/// Runs the whole pipeline on `primary`; if anything fails there, starts over on
/// `fallback`. Only the fallback error reaches the caller.
pub struct FallbackSummarizer<P, F> {
    pub(crate) primary: P,
    pub(crate) fallback: F,
    max_chars: usize,
}

impl<P: Generator, F: Generator> FallbackSummarizer<P, F> {
    pub fn new(primary: P, fallback: F, max_chars: usize) -> Self {
        Self {
            primary,
            fallback,
            max_chars,
        }
    }
}

impl<P: Generator, F: Generator> Summarizer for FallbackSummarizer<P, F> {
    async fn summarize(
        &self,
        messages: Vec<ChatMessage>,
        period_label: &str,
    ) -> DigestAiResult<String> {
        if messages.is_empty() {
            return Err(DigestAiError::EmptyInput);
        }

        let blocks = chunk_messages(&messages, self.max_chars);

        match summarize_blocks(&self.primary, &blocks, period_label).await {
            Ok(digest) => Ok(digest),
            Err(_) => summarize_blocks(&self.fallback, &blocks, period_label)
                .await
                .map_err(|error| DigestAiError::Fallback(Box::new(error))),
        }
    }
}
