// Library crate for the game companion server
// This file exposes the public API for integration tests

pub mod config;
pub mod session;
pub mod shared;
pub mod stats;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use session::{
    router, InMemorySessionRepository, Player, Session, SessionRepository, SessionService,
};
pub use shared::{AppError, AppState};
pub use stats::{PlayerStatsData, StatType, StatTypeRegistry, StatsError};
