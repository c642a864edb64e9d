use tokio::sync::oneshot;

use crate::models::{ChatStats, DigestPeriod, IncomingMessage, KeywordHitRow, SearchHit};

#[derive(Debug)]
pub enum ServiceCommand {
    /// Persist a message; responds with the keywords it matched
    StoreMessage {
        message: IncomingMessage,
        response: oneshot::Sender<Result<Vec<String>, String>>,
    },

    /// `None` when the window holds no messages
    Digest {
        chat_id: i64,
        period: DigestPeriod,
        response: oneshot::Sender<Result<Option<String>, String>>,
    },

    Search {
        chat_id: i64,
        query: String,
        response: oneshot::Sender<Result<Vec<SearchHit>, String>>,
    },

    Stats {
        chat_id: i64,
        response: oneshot::Sender<Result<ChatStats, String>>,
    },

    GetDigestTime {
        chat_id: i64,
        response: oneshot::Sender<Result<String, String>>,
    },

    SetDigestTime {
        chat_id: i64,
        time: String,
        response: oneshot::Sender<Result<String, String>>,
    },

    GetKeywords {
        chat_id: i64,
        response: oneshot::Sender<Result<String, String>>,
    },

    SetKeywords {
        chat_id: i64,
        keywords: String,
        response: oneshot::Sender<Result<String, String>>,
    },

    SetAdmin {
        chat_id: i64,
        user_id: i64,
        response: oneshot::Sender<Result<(), String>>,
    },

    HitsToday {
        chat_id: i64,
        response: oneshot::Sender<Result<u64, String>>,
    },

    ExportHits {
        chat_id: i64,
        days: i64,
        response: oneshot::Sender<Result<Vec<KeywordHitRow>, String>>,
    },

    Shutdown,
}

impl ServiceCommand {
    pub fn get_chat_id(&self) -> Option<i64> {
        match self {
            ServiceCommand::StoreMessage { message, .. } => Some(message.chat_id),
            ServiceCommand::Digest { chat_id, .. }
            | ServiceCommand::Search { chat_id, .. }
            | ServiceCommand::Stats { chat_id, .. }
            | ServiceCommand::GetDigestTime { chat_id, .. }
            | ServiceCommand::SetDigestTime { chat_id, .. }
            | ServiceCommand::GetKeywords { chat_id, .. }
            | ServiceCommand::SetKeywords { chat_id, .. }
            | ServiceCommand::SetAdmin { chat_id, .. }
            | ServiceCommand::HitsToday { chat_id, .. }
            | ServiceCommand::ExportHits { chat_id, .. } => Some(*chat_id),
            ServiceCommand::Shutdown => None,
        }
    }

    /// Answers the command with `error`, whatever its response type is.
    /// A receiver that has gone away is ignored.
    pub fn respond_with_error(self, error: String) {
        match self {
            ServiceCommand::StoreMessage { response, .. } => {
                let _ = response.send(Err(error));
            }
            ServiceCommand::Digest { response, .. } => {
                let _ = response.send(Err(error));
            }
            ServiceCommand::Search { response, .. } => {
                let _ = response.send(Err(error));
            }
            ServiceCommand::Stats { response, .. } => {
                let _ = response.send(Err(error));
            }
            ServiceCommand::GetDigestTime { response, .. }
            | ServiceCommand::SetDigestTime { response, .. }
            | ServiceCommand::GetKeywords { response, .. }
            | ServiceCommand::SetKeywords { response, .. } => {
                let _ = response.send(Err(error));
            }
            ServiceCommand::SetAdmin { response, .. } => {
                let _ = response.send(Err(error));
            }
            ServiceCommand::HitsToday { response, .. } => {
                let _ = response.send(Err(error));
            }
            ServiceCommand::ExportHits { response, .. } => {
                let _ = response.send(Err(error));
            }
            ServiceCommand::Shutdown => (),
        }
    }
}
