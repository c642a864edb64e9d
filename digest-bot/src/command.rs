use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "snake_case", description = "Available commands:")]
pub(crate) enum Command {
    #[command(description = "Show this help message")]
    Help,
    #[command(description = "Start the bot")]
    Start,
    #[command(description = "Show the current chat ID")]
    Chatid,
    #[command(description = "Search the chat history: /search <query>")]
    Search(String),
    #[command(description = "Message statistics for the last 7 days")]
    Stats,
    #[command(description = "Digest of today's discussion")]
    DigestToday,
    #[command(description = "Digest of the last 7 days")]
    DigestWeek,
    #[command(description = "Show or set the daily digest time: /digest_time HH:MM")]
    DigestTime(String),
    #[command(description = "Show the watched keywords")]
    Keywords,
    #[command(description = "Replace the watched keywords: /set_keywords a,b,c")]
    SetKeywords(String),
    #[command(description = "Send keyword alerts for this chat to me")]
    SetAdmin,
    #[command(description = "Number of keyword hits today")]
    HitsToday,
    #[command(description = "Export keyword hits as CSV: /export_hits [days]")]
    ExportHits(String),
}
