use axum::{
    debug_handler,
    extract::State,
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse},
};
use tracing::info;

use crate::{ok, store::Db, AppResult, AppState, GetField, JsonBody};

use super::CookiePolicy;

#[debug_handler(state = AppState)]
pub(crate) async fn login(
    State(db): State<Db>,
    State(cookies): State<CookiePolicy>,
    JsonBody(body): JsonBody,
) -> AppResult<impl IntoResponse> {
    let username = body.get_str_field("username")?;
    let token = db.write(|doc| doc.create_session(&username)).await?;

    info!(%username, "logged in");
    Ok((
        AppendHeaders([(SET_COOKIE, cookies.session_cookie(token).to_string())]),
        ok(),
    ))
}
