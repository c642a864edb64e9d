mod models;

use std::time::Duration;

pub(crate) use models::{ChatCompletionRequest, ChatCompletionResponse};

use crate::{BlockingGenerator, Config, DigestAiError, DigestAiResult, Generator};

/// Chat completions client, non-blocking flavour. The primary execution mode.
pub struct OpenAiClient {
    client: reqwest::Client,
    config: Config,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> DigestAiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

impl Generator for OpenAiClient {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> DigestAiResult<String> {
        let request = ChatCompletionRequest::new(
            &self.config.model,
            self.config.temperature,
            system_prompt,
            user_prompt,
        );

        let response = self
            .client
            .post(completions_url(&self.config))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%status, %body, "completion API error");
            return Err(DigestAiError::Api(format!("{status}: {body}")));
        }

        response.json::<ChatCompletionResponse>().await?.into_text()
    }
}

/// Chat completions client, blocking flavour. Wrap it in [`crate::Blocking`] to
/// use it as the fallback execution mode.
pub struct BlockingOpenAiClient {
    config: Config,
}

impl BlockingOpenAiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl BlockingGenerator for BlockingOpenAiClient {
    fn generate_blocking(&self, system_prompt: &str, user_prompt: &str) -> DigestAiResult<String> {
        // Built per call: a blocking client must not be dropped inside the async runtime
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build()?;

        let request = ChatCompletionRequest::new(
            &self.config.model,
            self.config.temperature,
            system_prompt,
            user_prompt,
        );

        let response = client
            .post(completions_url(&self.config))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            tracing::debug!(%status, %body, "completion API error (blocking)");
            return Err(DigestAiError::Api(format!("{status}: {body}")));
        }

        response.json::<ChatCompletionResponse>()?.into_text()
    }
}

pub(crate) fn completions_url(config: &Config) -> String {
    format!("{}/chat/completions", config.base_url.trim_end_matches('/'))
}
