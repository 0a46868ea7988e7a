pub mod details;
pub mod trips;

use axum::{response::Redirect, routing::get, Router};
use tower_http::services::ServeDir;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config.static_dir);
    Router::new()
        .route("/", get(|| async { Redirect::to("/trips") }))
        .merge(trips::router())
        .merge(details::router())
        .nest_service("/static", static_dir)
        .with_state(state)
}
