mod command;
mod config;
mod handler;
mod rate_limit;
mod response;
mod utils;


use std::sync::Arc;

pub use config::Config;
use digest_common::command::ServiceCommand;
use digest_common::event::BotEvent;
use teloxide::dispatching::UpdateFilterExt;
use teloxide::prelude::Requester;
use teloxide::utils::command::BotCommands;
use tokio::sync::mpsc;

use crate::command::Command;
use crate::rate_limit::RateLimiters;

/// Per-bot switches handed to the update handlers.
#[derive(Debug, Clone)]
pub(crate) struct BotSettings {
    pub(crate) keyword_reply: bool,
}

pub struct DigestBot {
    bot: teloxide::prelude::Bot,
    settings: BotSettings,
    service_tx: mpsc::Sender<ServiceCommand>,
    event_rx: mpsc::Receiver<BotEvent>,
}

impl DigestBot {
    pub fn new(
        config: &Config,
        service_tx: mpsc::Sender<ServiceCommand>,
        event_rx: mpsc::Receiver<BotEvent>,
    ) -> Self {
        let bot = teloxide::prelude::Bot::new(&config.token);
        Self {
            bot,
            settings: BotSettings {
                keyword_reply: config.keyword_reply,
            },
            service_tx,
            event_rx,
        }
    }

    /// Runs the dispatcher until ctrl-c, then asks the digest service to stop.
    pub async fn run(self) -> Result<(), teloxide::RequestError> {
        tracing::info!("Starting Telegram bot...");

        self.bot.set_my_commands(Command::bot_commands()).await?;

        let handler = teloxide::prelude::Update::filter_message().endpoint(handler::handle_message);

        let event_handle = {
            let bot = self.bot.clone();
            let event_rx = self.event_rx;
            tokio::spawn(async move {
                handler::handle_events(bot, event_rx).await;
            })
        };

        let rate_limiters = Arc::new(RateLimiters::new());

        teloxide::prelude::Dispatcher::builder(self.bot, handler)
            .dependencies(teloxide::prelude::dptree::deps![
                self.service_tx.clone(),
                rate_limiters,
                self.settings
            ])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        tracing::info!("Bot stopped, shutting down digest service");

        if self.service_tx.send(ServiceCommand::Shutdown).await.is_err() {
            tracing::warn!("digest service already stopped");
        }
        // the event channel closes once the service drops its sender
        drop(self.service_tx);

        if let Err(error) = event_handle.await {
            tracing::error!(%error, "event handler loop failed");
        }

        Ok(())
    }
}
