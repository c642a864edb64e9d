#[derive(Clone, serde::Deserialize)]
pub struct Config {
    /// IANA name of the timezone digest times are expressed in
    #[serde(default = "default_local_tz")]
    pub local_tz: String,
    #[serde(default = "default_digest_time")]
    pub default_digest_time: String,
    /// Chats the bot serves; empty means every chat
    #[serde(default)]
    pub allowed_chat_ids: Vec<i64>,
    #[serde(default = "default_scheduler_tick_secs")]
    pub scheduler_tick_secs: u64,
}

fn default_local_tz() -> String {
    "Asia/Tashkent".to_string()
}

fn default_digest_time() -> String {
    "21:00".to_string()
}

fn default_scheduler_tick_secs() -> u64 {
    20
}

impl Default for Config {
    fn default() -> Self {
        Self {
            local_tz: default_local_tz(),
            default_digest_time: default_digest_time(),
            allowed_chat_ids: Vec::new(),
            scheduler_tick_secs: default_scheduler_tick_secs(),
        }
    }
}
