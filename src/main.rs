mod config;

use anyhow::Context;
use digest_ai::openai::{BlockingOpenAiClient, OpenAiClient};
use digest_ai::{Blocking, FallbackSummarizer};
use digest_bot::DigestBot;
use digest_service::DigestService;
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = config::Config::new().context("Error parsing config")?;

    tracing::info!(
        database = %config.repo_config.database_name,
        model = %config.ai_config.model,
        timezone = %config.service_config.local_tz,
        "starting service"
    );

    let repo = digest_repo::Repo::new(&config.repo_config).await?;

    let summarizer = FallbackSummarizer::new(
        OpenAiClient::new(&config.ai_config)?,
        Blocking::new(BlockingOpenAiClient::new(&config.ai_config)),
        config.ai_config.max_chars.get(),
    );

    let (service_tx, service_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (event_tx, event_rx) = mpsc::channel(CHANNEL_CAPACITY);

    let service = DigestService::new(
        &config.service_config,
        repo,
        summarizer,
        service_rx,
        event_tx,
    )?;
    let service_handle = tokio::spawn(service.run());

    let bot = DigestBot::new(&config.bot_config, service_tx, event_rx);
    bot.run().await?;

    service_handle.await??;

    tracing::info!("shut down");

    Ok(())
}
