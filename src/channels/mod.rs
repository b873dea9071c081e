mod delete;
mod list;
mod msg;
mod new;
mod registry;

use axum::{
    routing::{delete, get},
    Router,
};

use crate::AppState;

pub use registry::slugify;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/channels", get(list::list_channels).post(new::new_channel))
        .route("/api/channels/{id}", delete(delete::delete_channel))
        .route(
            "/api/channels/{id}/messages",
            get(msg::list_messages).post(msg::post_message),
        )
        .route("/api/channels/{id}/messages/{mid}", delete(msg::delete_message))
}
