pub mod auth;
pub mod channels;
pub mod config;
pub mod error;
pub mod model;
pub mod search;
pub mod store;

use axum::{
    extract::{rejection::JsonRejection, FromRef, FromRequest, Request},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

pub use auth::{CookiePolicy, SessionToken};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use store::{Db, DocumentStore, JsonFileStore, MemoryStore, StoreError};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db: Db,
    pub cookies: CookiePolicy,
}

impl AppState {
    pub fn new(db: Db, cookies: CookiePolicy) -> Self {
        Self { db, cookies }
    }
}

/// Every API route. Static files, CORS and tracing are layered on in `main`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(channels::router())
        .merge(auth::router())
        .route("/api/search", get(search::search))
        .with_state(state)
}

pub trait GetField {
    /// A non-empty string field, or `400 {field} required`.
    fn get_str_field(&self, field: &str) -> AppResult<String>;
}

impl GetField for Value {
    fn get_str_field(&self, field: &str) -> AppResult<String> {
        self.get(field)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| AppError::BadRequest(format!("{field} required")))
    }
}

/// Request body as loose JSON. A missing or unparsable body reads as `null`,
/// so handlers report the absent field instead of a parser rejection.
/// A body that could not be read at all (too large, aborted) is rejected
/// with its own status.
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(JsonRejection::BytesRejection(err)) => {
                Err(AppError::Rejected(err.status(), err.body_text()))
            }
            Err(_) => Ok(Self(Value::Null)),
        }
    }
}

pub(crate) fn ok() -> Json<Value> {
    Json(json!({ "ok": true }))
}
