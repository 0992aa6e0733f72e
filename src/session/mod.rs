// Public API - what other modules can use
pub use handlers::{
    add_stats, finish_session, get_player, get_session, list_stat_types, remove_stats,
    update_stats,
};
pub use models::{Player, Session};
pub use repository::{InMemorySessionRepository, SessionRepository};
pub use service::{PendingWrite, SessionService};

mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::shared::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/stat-types", get(list_stat_types))
        .route("/sessions/:session_id", get(get_session))
        .route("/sessions/:session_id/finish", post(finish_session))
        .route("/sessions/:session_id/players/:player_id", get(get_player))
        .route("/sessions/:session_id/players/:player_id/stats", post(add_stats))
        .route(
            "/sessions/:session_id/players/:player_id/stats/:key",
            patch(update_stats).delete(remove_stats),
        )
        .with_state(state)
}
