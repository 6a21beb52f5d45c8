mod dto;
pub mod handlers;
pub mod model;
mod validate;


use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user", post(handlers::create))
        .route(
            "/user/:user_id",
            put(handlers::update)
                .get(handlers::get_by_id)
                .delete(handlers::delete_by_id),
        )
        .route("/users", get(handlers::list))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB
}
