use axum::{debug_handler, extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::info;

use crate::{auth::SessionToken, store::Db, AppResult, AppState, GetField, JsonBody};

#[debug_handler(state = AppState)]
pub(crate) async fn new_channel(
    State(db): State<Db>,
    token: SessionToken,
    JsonBody(body): JsonBody,
) -> AppResult<impl IntoResponse> {
    let name = body.get_str_field("name")?;

    let channel = db
        .write(|doc| {
            let owner = doc.resolve_session(token.as_deref()).map(str::to_owned);
            doc.create_channel(&name, owner)
        })
        .await?;

    info!(id = %channel.id, owner = ?channel.owner, "created channel");
    Ok((StatusCode::CREATED, Json(channel)))
}
