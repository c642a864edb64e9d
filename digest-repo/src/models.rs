use mongodb::bson::oid::ObjectId;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StoredMessage {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub chat_id: i64,
    pub message_id: i32,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    pub text: String,
    /// Unix timestamp, seconds
    pub date: i64,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ChatSettings {
    pub chat_id: i64,
    /// Local `HH:MM` of the daily digest
    #[serde(default)]
    pub digest_time: Option<String>,
    /// Comma separated watchlist
    #[serde(default)]
    pub keywords: Option<String>,
    /// Recipient of keyword alerts
    #[serde(default)]
    pub admin_user_id: Option<i64>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct KeywordHit {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub chat_id: i64,
    pub message_id: i32,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    /// Matched keywords, comma separated
    pub matched: String,
    pub text: String,
    pub date: i64,
}

/// Row of the per-user message count aggregation.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct UserMessageCount {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    pub count: i64,
}
