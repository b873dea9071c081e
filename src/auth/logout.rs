use axum::{
    debug_handler,
    extract::State,
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse},
};
use tracing::info;

use crate::{ok, store::Db, AppResult, AppState};

use super::{CookiePolicy, SessionToken};

/// Always succeeds and always clears the cookie, known session or not.
#[debug_handler(state = AppState)]
pub(crate) async fn logout(
    State(db): State<Db>,
    State(cookies): State<CookiePolicy>,
    SessionToken(token): SessionToken,
) -> AppResult<impl IntoResponse> {
    if let Some(token) = token {
        let revoked = db.write(|doc| Ok(doc.revoke_session(&token))).await?;
        if revoked > 0 {
            info!("logged out");
        }
    }

    Ok((
        AppendHeaders([(SET_COOKIE, cookies.removal_cookie().to_string())]),
        ok(),
    ))
}
