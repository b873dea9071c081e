use axum::{debug_handler, extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::info;

use crate::{store::Db, AppResult, AppState, GetField, JsonBody};

#[debug_handler(state = AppState)]
pub(crate) async fn register(
    State(db): State<Db>,
    JsonBody(body): JsonBody,
) -> AppResult<impl IntoResponse> {
    let username = body.get_str_field("username")?;
    let user = db.write(|doc| doc.register_user(&username)).await?;

    info!(%username, "registered user");
    Ok((StatusCode::CREATED, Json(user)))
}
