mod summarize;

use crate::ChatMessage;

pub(crate) fn message(username: &str, text: &str, date: i64) -> ChatMessage {
    ChatMessage {
        username: Some(username.to_string()),
        user_id: Some(1000 + date),
        text: text.to_string(),
        date,
    }
}
