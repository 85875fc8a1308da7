pub mod health;
pub mod prejoin;
pub mod session;
pub mod token;

use axum::{routing::get, Router};

use crate::res;
use crate::state::AppState;

/// Create the front-end router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(prejoin::prejoin_routes())
        .nest("/api", token::token_routes())
        .merge(health::health_routes())
        .route("/static/prejoin.css", get(res::stylesheet))
        .with_state(state)
}
