pub mod dto;
pub mod handlers;
pub mod repo;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(handlers::list).post(handlers::create))
        .route(
            "/recipes/:id",
            get(handlers::retrieve)
                .put(handlers::replace)
                .patch(handlers::update)
                .delete(handlers::remove),
        )
}
