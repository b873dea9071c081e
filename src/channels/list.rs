use axum::{debug_handler, extract::State, Json};

use crate::{model::Channel, store::Db, AppResult, AppState};

/// Full channel records, messages included.
#[debug_handler(state = AppState)]
pub(crate) async fn list_channels(State(db): State<Db>) -> AppResult<Json<Vec<Channel>>> {
    Ok(Json(db.load().await?.channels))
}
