//! Router assembly.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::*;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Accounts
        .route("/api/accounts", post(open_account))
        .route("/api/accounts/:id", get(get_account))
        // Games
        .route("/api/games", post(start_game))
        .route("/api/games/:id", get(get_game))
        .route("/api/games/:id/join", post(join_game))
        .route("/api/games/:id/bet", post(send_bet))
        .route("/api/games/:id/reveal", post(reveal_move))
        .route("/api/games/:id/abort", post(abort_game))
        .route("/api/games/:id/state", get(get_game_state))
        .route("/api/games/:id/bets", get(get_bet_amounts))
        // Events
        .route("/api/events", get(list_events))
        // System
        .route("/api/system/tick", post(tick))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
