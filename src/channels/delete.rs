use axum::{
    debug_handler,
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::{auth::SessionToken, ok, store::Db, AppResult, AppState};

#[debug_handler(state = AppState)]
pub(crate) async fn delete_channel(
    Path(id): Path<String>,
    State(db): State<Db>,
    token: SessionToken,
) -> AppResult<Json<Value>> {
    let removed = db
        .write(|doc| {
            let requester = doc.resolve_session(token.as_deref()).map(str::to_owned);
            doc.delete_channel(&id, requester.as_deref())
        })
        .await?;

    info!(id = %removed.id, messages = removed.messages.len(), "deleted channel");
    Ok(ok())
}
