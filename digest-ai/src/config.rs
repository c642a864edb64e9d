use std::num::NonZeroUsize;

use crate::chunk::DEFAULT_MAX_CHARS;

#[derive(Clone, serde::Deserialize)]
pub struct Config {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Character budget of a single transcript block
    #[serde(default = "default_max_chars")]
    pub max_chars: NonZeroUsize,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_chars() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_MAX_CHARS).unwrap_or(NonZeroUsize::MIN)
}
