#[derive(serde::Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub temperature: f32,
    pub messages: [ChatCompletionMessage<'a>; 2],
}

#[derive(serde::Serialize)]
pub struct ChatCompletionMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> ChatCompletionRequest<'a> {
    pub fn new(model: &'a str, temperature: f32, system_prompt: &'a str, user_prompt: &'a str) -> Self {
        Self {
            model,
            temperature,
            messages: [
                ChatCompletionMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatCompletionMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        }
    }
}

#[derive(serde::Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(serde::Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(serde::Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(serde::Deserialize)]
pub struct ApiError {
    pub message: String,
}

impl ChatCompletionResponse {
    pub fn into_text(self) -> crate::DigestAiResult<String> {
        if let Some(error) = self.error {
            return Err(crate::DigestAiError::Api(error.message));
        }

        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(crate::DigestAiError::EmptyResponse)
    }
}
