use std::sync::Arc;

use crate::{DigestAiResult, Generator};

/// Synchronous counterpart of [`Generator`], used as the degraded execution mode.
pub trait BlockingGenerator: Send + Sync + 'static {
    fn generate_blocking(&self, system_prompt: &str, user_prompt: &str) -> DigestAiResult<String>;
}

/// Runs a [`BlockingGenerator`] on the blocking thread pool so it can stand in
/// wherever a [`Generator`] is expected.
pub struct Blocking<G> {
    inner: Arc<G>,
}

impl<G: BlockingGenerator> Blocking<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }
}

impl<G: BlockingGenerator> Generator for Blocking<G> {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> DigestAiResult<String> {
        let inner = Arc::clone(&self.inner);
        let system_prompt = system_prompt.to_string();
        let user_prompt = user_prompt.to_string();

        tokio::task::spawn_blocking(move || inner.generate_blocking(&system_prompt, &user_prompt))
            .await?
    }
}
