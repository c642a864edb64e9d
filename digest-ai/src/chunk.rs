use crate::ChatMessage;

pub const DEFAULT_MAX_CHARS: usize = 8000;

pub fn format_line(message: &ChatMessage) -> String {
    format!("- {}: {}\n", message.label(), message.text)
}

/// Splits a chronological transcript into blocks of at most `max_chars` characters.
///
/// Lines are never split: a message whose line alone exceeds the budget ends up
/// in a block of its own, over budget.
pub fn chunk_messages(messages: &[ChatMessage], max_chars: usize) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for message in messages {
        let line = format_line(message);
        let line_len = line.chars().count();

        if current_len + line_len > max_chars && !current.is_empty() {
            blocks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        current.push_str(&line);
        current_len += line_len;
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}
