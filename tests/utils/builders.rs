use std::sync::Arc;

use game_companion::{
    InMemorySessionRepository, Player, PlayerStatsData, Session, SessionRepository,
    SessionService, StatTypeRegistry,
};

// ============================================================================
// Record Builders
// ============================================================================

pub fn score_record(count: i64) -> PlayerStatsData {
    PlayerStatsData::new("score").with_field("scoreCount", count)
}

pub fn card_record(card: &str, count: i64, ratio: i64) -> PlayerStatsData {
    PlayerStatsData::new("card-vps")
        .with_field("cardName", card)
        .with_field("scoreCount", count)
        .with_field("vpsRatio", ratio)
}

// ============================================================================
// Session Builder
// ============================================================================

pub struct SessionBuilder {
    id: String,
    players: Vec<Player>,
}

impl SessionBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            players: vec![],
        }
    }

    pub fn with_player(mut self, id: &str, name: &str, stats: Vec<PlayerStatsData>) -> Self {
        self.players.push(Player::new(id, name).with_stats(stats));
        self
    }

    pub fn build(self) -> Session {
        Session::new(self.id).with_players(self.players)
    }
}

// ============================================================================
// Service Setup
// ============================================================================

pub struct TestSetup {
    pub repository: Arc<dyn SessionRepository>,
    pub registry: Arc<StatTypeRegistry>,
    pub service: Arc<SessionService>,
}

impl TestSetup {
    pub fn with_sessions(sessions: Vec<Session>) -> Self {
        Self::with_repository(Arc::new(InMemorySessionRepository::with_sessions(sessions)))
    }

    pub fn with_repository(repository: Arc<dyn SessionRepository>) -> Self {
        let registry = Arc::new(
            StatTypeRegistry::builder()
                .build()
                .expect("default registry should build"),
        );
        let service = Arc::new(SessionService::new(repository.clone(), registry.clone()));

        Self {
            repository,
            registry,
            service,
        }
    }
}
