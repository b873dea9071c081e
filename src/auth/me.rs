use axum::{debug_handler, extract::State, Json};
use serde::Serialize;

use crate::{store::Db, AppResult, AppState};

use super::SessionToken;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MeResponse {
    logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn me(
    State(db): State<Db>,
    token: SessionToken,
) -> AppResult<Json<MeResponse>> {
    let doc = db.load().await?;
    let username = doc.resolve_session(token.as_deref()).map(str::to_owned);

    Ok(Json(MeResponse {
        logged_in: username.is_some(),
        username,
    }))
}
