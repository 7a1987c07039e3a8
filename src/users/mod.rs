pub mod dto;
pub mod email;
pub mod handlers;
pub mod repo;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(handlers::register))
        .route("/users/token", post(handlers::token))
        .route("/users/token/refresh", post(handlers::refresh))
        .route("/users/me", get(handlers::me).patch(handlers::update_me))
}
