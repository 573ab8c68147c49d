pub mod health;
pub mod position;
pub mod ws;

use axum::{
    routing::{get, post, put},
    Extension, Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::session::SessionHandle;

/// Build the viewer API around a running session.
pub fn app(session: SessionHandle) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/state", get(position::get_state))
        .route("/api/position", put(position::set_position))
        .route("/api/squares/{square}/click", post(position::click_square))
        .route("/api/moves", post(position::drop_piece))
        .route("/api/history/{index}", post(position::navigate))
        .route("/api/analyze", post(position::analyze))
        .route("/api/pgn", get(position::get_pgn))
        .route("/ws", get(ws::ws_handler))
        .layer(Extension(session))
        .layer(cors)
}
