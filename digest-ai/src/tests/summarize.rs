use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::tests::message;
use crate::{
    Blocking, BlockingGenerator, DigestAiError, DigestAiResult, FallbackSummarizer, Generator,
    SYSTEM_PROMPT, Summarizer, chunk_messages, summarize_blocks,
};

/// Records every prompt it sees; answers map calls with `<name> partial N`
/// and the merge call with `<name> digest`.
struct RecordingGenerator {
    name: &'static str,
    fail_on_call: Option<usize>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl RecordingGenerator {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            fail_on_call: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn failing_on(name: &'static str, call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::new(name)
        }
    }

    fn user_prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .map(|(_, user)| user.clone())
            .collect()
    }
}

impl Generator for RecordingGenerator {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> DigestAiResult<String> {
        let call = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push((system_prompt.to_string(), user_prompt.to_string()));
            prompts.len()
        };

        if self.fail_on_call.is_some_and(|n| n <= call) {
            return Err(DigestAiError::Api(format!("{} unavailable", self.name)));
        }

        if user_prompt.starts_with("Briefly merge") {
            Ok(format!("  {} digest\n", self.name))
        } else {
            Ok(format!("{} partial {call} ", self.name))
        }
    }
}

struct CountingBlockingGenerator {
    calls: AtomicUsize,
}

impl BlockingGenerator for CountingBlockingGenerator {
    fn generate_blocking(&self, _system_prompt: &str, user_prompt: &str) -> DigestAiResult<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if user_prompt.starts_with("Briefly merge") {
            Ok(format!("blocking digest after {call} calls"))
        } else {
            Ok(format!("blocking partial {call}"))
        }
    }
}

struct FailingBlockingGenerator;

impl BlockingGenerator for FailingBlockingGenerator {
    fn generate_blocking(&self, _: &str, _: &str) -> DigestAiResult<String> {
        Err(DigestAiError::Api("blocking unavailable".to_string()))
    }
}

fn nine_thousand_chars() -> Vec<crate::ChatMessage> {
    (1..=25)
        .map(|i| message(&format!("user{i:02}"), &"x".repeat(349), i))
        .collect()
}

#[tokio::test]
async fn test_summarize_blocks_prompts_and_order() {
    let generator = RecordingGenerator::new("primary");
    let blocks = chunk_messages(&nine_thousand_chars(), 8000);

    let digest = summarize_blocks(&generator, &blocks, "(today)").await.unwrap();
    assert_eq!(digest, "primary digest");

    let prompts = generator.user_prompts();
    assert_eq!(prompts.len(), 3);
    assert!(prompts[0].starts_with("Summarize block 1/2 (today):\n"));
    assert!(prompts[0].ends_with(&blocks[0]));
    assert!(prompts[1].starts_with("Summarize block 2/2 (today):\n"));
    assert!(prompts[1].ends_with(&blocks[1]));

    let merge = &prompts[2];
    assert!(merge.contains("(today)"));
    assert!(merge.contains("Block 1: primary partial 1\n\nBlock 2: primary partial 2"));

    let systems = generator.prompts.lock().unwrap();
    assert!(systems.iter().all(|(system, _)| system == SYSTEM_PROMPT));
}

#[tokio::test]
async fn test_summarize_single_block_still_merges() {
    let generator = RecordingGenerator::new("primary");
    let summarizer = FallbackSummarizer::new(generator, RecordingGenerator::new("fallback"), 8000);

    let messages = vec![message("alice", "ship on friday", 1), message("bob", "ok", 2)];
    let digest = summarizer.summarize(messages, "(7 days)").await.unwrap();

    assert_eq!(digest, "primary digest");

    let prompts = summarizer.primary.user_prompts();
    assert_eq!(prompts.len(), 2);
    assert_eq!(
        prompts[0],
        "Summarize block 1/1 (7 days):\n- alice: ship on friday\n- bob: ok\n"
    );
    assert!(prompts[1].ends_with("Block 1: primary partial 1"));
}

#[tokio::test]
async fn test_fallback_used_when_primary_fails() {
    let summarizer = FallbackSummarizer::new(
        RecordingGenerator::failing_on("primary", 1),
        RecordingGenerator::new("fallback"),
        8000,
    );

    let digest = summarizer
        .summarize(nine_thousand_chars(), "(daily)")
        .await
        .unwrap();

    assert_eq!(digest, "fallback digest");
    assert_eq!(summarizer.primary.user_prompts().len(), 1);
    assert_eq!(summarizer.fallback.user_prompts().len(), 3);
}

#[tokio::test]
async fn test_fallback_restarts_from_first_block() {
    // primary dies on the merge call, after both blocks were summarized
    let summarizer = FallbackSummarizer::new(
        RecordingGenerator::failing_on("primary", 3),
        RecordingGenerator::new("fallback"),
        8000,
    );

    let digest = summarizer
        .summarize(nine_thousand_chars(), "(daily)")
        .await
        .unwrap();

    assert_eq!(digest, "fallback digest");

    let prompts = summarizer.fallback.user_prompts();
    assert_eq!(prompts.len(), 3);
    assert!(prompts[0].starts_with("Summarize block 1/2"));
    assert!(prompts[2].contains("Block 1: fallback partial 1"));
    assert!(!prompts[2].contains("primary"));
}

#[tokio::test]
async fn test_both_modes_failing_is_an_error() {
    let summarizer = FallbackSummarizer::new(
        RecordingGenerator::failing_on("primary", 1),
        RecordingGenerator::failing_on("fallback", 2),
        8000,
    );

    let result = summarizer.summarize(nine_thousand_chars(), "(daily)").await;

    match result {
        Err(DigestAiError::Fallback(inner)) => {
            assert!(inner.to_string().contains("fallback unavailable"));
        }
        _ => panic!("expected fallback failure"),
    }
    assert_eq!(summarizer.fallback.user_prompts().len(), 2);
}

#[tokio::test]
async fn test_empty_input_is_rejected() {
    let summarizer = FallbackSummarizer::new(
        RecordingGenerator::new("primary"),
        RecordingGenerator::new("fallback"),
        8000,
    );

    let result = summarizer.summarize(Vec::new(), "(today)").await;

    assert!(matches!(result, Err(DigestAiError::EmptyInput)));
    assert!(summarizer.primary.user_prompts().is_empty());
    assert!(summarizer.fallback.user_prompts().is_empty());
}

#[tokio::test]
async fn test_blocking_fallback_mode() {
    let summarizer = FallbackSummarizer::new(
        RecordingGenerator::failing_on("primary", 1),
        Blocking::new(CountingBlockingGenerator {
            calls: AtomicUsize::new(0),
        }),
        8000,
    );

    let digest = summarizer
        .summarize(nine_thousand_chars(), "(today)")
        .await
        .unwrap();

    assert_eq!(digest, "blocking digest after 3 calls");
}

#[tokio::test]
async fn test_blocking_fallback_failure_propagates() {
    let summarizer = FallbackSummarizer::new(
        RecordingGenerator::failing_on("primary", 1),
        Blocking::new(FailingBlockingGenerator),
        8000,
    );

    let result = summarizer
        .summarize(vec![message("a", "b", 1)], "(today)")
        .await;

    assert!(matches!(result, Err(DigestAiError::Fallback(_))));
}
