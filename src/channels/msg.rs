use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

use crate::{model::Message, ok, store::Db, AppResult, AppState, GetField, JsonBody};

#[debug_handler(state = AppState)]
pub(crate) async fn list_messages(
    Path(channel_id): Path<String>,
    State(db): State<Db>,
) -> AppResult<Json<Vec<Message>>> {
    let doc = db.load().await?;
    Ok(Json(doc.messages(&channel_id)?.to_vec()))
}

#[debug_handler(state = AppState)]
pub(crate) async fn post_message(
    Path(channel_id): Path<String>,
    State(db): State<Db>,
    JsonBody(body): JsonBody,
) -> AppResult<impl IntoResponse> {
    let text = body.get_str_field("text")?;
    let message = db.write(|doc| doc.post_message(&channel_id, &text)).await?;

    Ok((StatusCode::CREATED, Json(message)))
}

#[debug_handler(state = AppState)]
pub(crate) async fn delete_message(
    Path((channel_id, message_id)): Path<(String, String)>,
    State(db): State<Db>,
) -> AppResult<Json<Value>> {
    db.write(|doc| doc.delete_message(&channel_id, &message_id)).await?;
    Ok(ok())
}
