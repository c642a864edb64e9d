use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use digest_ai::{ChatMessage, DigestAiError, DigestAiResult, Summarizer};
use digest_repo::models::StoredMessage;

use crate::command::{log_preview, normalize_keywords, summarize_window, to_chat_messages};
use crate::{ServiceError, is_allowed};

struct CountingSummarizer {
    calls: AtomicUsize,
    fail: bool,
}

impl CountingSummarizer {
    fn new(fail: bool) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail,
        }
    }
}

impl Summarizer for CountingSummarizer {
    async fn summarize(
        &self,
        messages: Vec<ChatMessage>,
        period_label: &str,
    ) -> DigestAiResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(DigestAiError::Fallback(Box::new(DigestAiError::EmptyResponse)));
        }

        Ok(format!("{} messages {period_label}", messages.len()))
    }
}

fn stored(username: Option<&str>, user_id: Option<i64>, text: &str, date: i64) -> StoredMessage {
    StoredMessage {
        id: None,
        chat_id: -1,
        message_id: date as i32,
        user_id,
        username: username.map(String::from),
        text: text.to_string(),
        date,
    }
}

#[test]
fn test_to_chat_messages_drops_blank_and_keeps_order() {
    let messages = to_chat_messages(vec![
        stored(Some("alice"), Some(1), "first", 10),
        stored(Some("bob"), Some(2), "   ", 11),
        stored(None, Some(3), "third", 12),
    ]);

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].label(), "alice");
    assert_eq!(messages[0].date, 10);
    assert_eq!(messages[1].label(), "3");
    assert_eq!(messages[1].text, "third");
}

#[test]
fn test_normalize_keywords() {
    assert_eq!(normalize_keywords(" concert, venue ,, ticket "), "concert,venue,ticket");
    assert_eq!(normalize_keywords(""), "");
    assert_eq!(normalize_keywords(" , "), "");
}

#[test]
fn test_log_preview() {
    assert_eq!(log_preview("line one\nline two", 200), "line one line two");
    assert_eq!(log_preview("абвгд", 3), "абв");
}

#[test]
fn test_allow_list() {
    let everyone = HashSet::new();
    assert!(is_allowed(&everyone, -100));

    let only: HashSet<i64> = [-100, -200].into_iter().collect();
    assert!(is_allowed(&only, -200));
    assert!(!is_allowed(&only, -300));
}

#[tokio::test]
async fn test_summarize_window_empty_skips_summarizer() {
    let summarizer = CountingSummarizer::new(false);

    let digest = summarize_window(&summarizer, Vec::new(), "(today)")
        .await
        .unwrap();

    assert!(digest.is_none());
    assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_summarize_window_blank_only_skips_summarizer() {
    let summarizer = CountingSummarizer::new(false);
    let rows = vec![stored(Some("alice"), Some(1), "   ", 10)];

    let digest = summarize_window(&summarizer, rows, "(today)").await.unwrap();

    assert!(digest.is_none());
    assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_summarize_window_calls_summarizer_once() {
    let summarizer = CountingSummarizer::new(false);
    let rows = vec![
        stored(Some("alice"), Some(1), "hi", 10),
        stored(None, Some(2), "   ", 11),
        stored(None, Some(3), "release on friday", 12),
    ];

    let digest = summarize_window(&summarizer, rows, "(7 days)").await.unwrap();

    assert_eq!(digest.as_deref(), Some("2 messages (7 days)"));
    assert_eq!(summarizer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_summarize_window_failure_is_an_error() {
    let summarizer = CountingSummarizer::new(true);
    let rows = vec![stored(Some("alice"), Some(1), "hi", 10)];

    let result = summarize_window(&summarizer, rows, "(daily)").await;

    assert!(matches!(result, Err(ServiceError::AI(DigestAiError::Fallback(_)))));
    assert_eq!(summarizer.calls.load(Ordering::SeqCst), 1);
}
