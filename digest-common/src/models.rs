/// Text message captured from a group chat.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub message_id: i32,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub text: String,
    pub date: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestPeriod {
    Today,
    Week,
}

#[derive(Debug, Clone)]
pub struct SearchHit {
    pub author: String,
    pub text: String,
    /// `YYYY-MM-DD HH:MM`, local to the bot's timezone
    pub time: String,
}

#[derive(Debug, Clone)]
pub struct UserActivity {
    pub author: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ChatStats {
    pub total: u64,
    pub top: Vec<UserActivity>,
}

#[derive(Debug, Clone)]
pub struct KeywordHitRow {
    pub author: String,
    pub matched: String,
    pub text: String,
    pub date: i64,
}

/// `@username` when there is one, the numeric id otherwise.
pub fn author_label(username: Option<&str>, user_id: Option<i64>) -> String {
    match (username, user_id) {
        (Some(username), _) if !username.is_empty() => format!("@{username}"),
        (_, Some(user_id)) => user_id.to_string(),
        _ => String::new(),
    }
}
