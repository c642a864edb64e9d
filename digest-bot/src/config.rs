#[derive(serde::Deserialize)]
pub struct Config {
    pub token: String,
    /// Reply in the chat when a message hits a watched keyword
    #[serde(default)]
    pub keyword_reply: bool,
}
