#[derive(Debug)]
pub enum BotEvent {
    ScheduledDigest {
        chat_id: i64,
        text: String,
    },

    KeywordAlert {
        recipient_id: i64,
        chat_id: i64,
        author: String,
        keywords: Vec<String>,
        text: String,
    },
}
