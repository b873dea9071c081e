mod directory;
mod login;
mod logout;
mod me;
mod register;

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
    routing::{get, post},
    Router,
};
use cookie::{Cookie, SameSite};

use crate::AppState;

pub const SESSION_COOKIE: &str = "session";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(register::register))
        .route("/api/login", post(login::login))
        .route("/api/logout", post(logout::logout))
        .route("/api/me", get(me::me))
}

/// The raw `session` cookie, if the request carried a non-empty one.
/// Whether it names a live session is decided against the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionToken(pub Option<String>);

impl SessionToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .find(|cookie| cookie.name() == SESSION_COOKIE)
            .map(|cookie| cookie.value().to_owned())
            .filter(|token| !token.is_empty());

        Ok(Self(token))
    }
}

/// Attributes of the session cookie. Cross-site frontends need
/// `secure` and `SameSite=None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CookiePolicy {
    pub secure: bool,
    pub same_site: Option<SameSite>,
}

impl CookiePolicy {
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        let mut cookie = Cookie::build((SESSION_COOKIE, token))
            .http_only(true)
            .path("/");
        if self.secure {
            cookie = cookie.secure(true);
        }
        if let Some(same_site) = self.same_site {
            cookie = cookie.same_site(same_site);
        }
        cookie.build()
    }

    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.session_cookie(String::new());
        cookie.make_removal();
        cookie
    }
}
