pub mod dto;
pub mod handlers;
pub mod repo;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/ingredients",
            get(handlers::list).post(handlers::create),
        )
        .route(
            "/ingredients/:id",
            get(handlers::retrieve)
                .put(handlers::replace)
                .patch(handlers::update)
                .delete(handlers::remove),
        )
}
