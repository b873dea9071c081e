//! Substring search over channel names and message texts.
//!
//! Nothing is indexed; each query scans every message of every channel.

use axum::{
    debug_handler,
    extract::{Query, State},
    Json,
};
use serde::Serialize;

use crate::{
    model::{Channel, Document, Message},
    store::Db,
    AppResult, AppState,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub channels: Vec<Channel>,
    pub messages: Vec<MessageHit>,
}

/// A matching message tagged with the channel it lives in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageHit {
    #[serde(flatten)]
    pub message: Message,
    pub channel_id: String,
}

impl Document {
    /// Case-insensitive match in registry order. An empty query yields every
    /// channel and no messages.
    pub fn search(&self, query: &str) -> SearchResults {
        let query = query.to_lowercase();
        if query.is_empty() {
            return SearchResults {
                channels: self.channels.clone(),
                messages: Vec::new(),
            };
        }

        let channels = self
            .channels
            .iter()
            .filter(|channel| channel.name.to_lowercase().contains(&query))
            .cloned()
            .collect();

        let messages = self
            .channels
            .iter()
            .flat_map(|channel| {
                channel.messages.iter().map(move |message| (channel, message))
            })
            .filter(|(_, message)| message.text.to_lowercase().contains(&query))
            .map(|(channel, message)| MessageHit {
                message: message.clone(),
                channel_id: channel.id.clone(),
            })
            .collect();

        SearchResults { channels, messages }
    }
}

/// The first `q` in the query string. Repeated or unknown keys are ignored.
fn first_q(params: &[(String, String)]) -> &str {
    params
        .iter()
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value.as_str())
        .unwrap_or_default()
}

#[debug_handler(state = AppState)]
pub(crate) async fn search(
    Query(params): Query<Vec<(String, String)>>,
    State(db): State<Db>,
) -> AppResult<Json<SearchResults>> {
    let doc = db.load().await?;
    Ok(Json(doc.search(first_q(&params))))
}
