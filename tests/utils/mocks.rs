use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use game_companion::{AppError, InMemorySessionRepository, Player, Session, SessionRepository};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// In-memory store whose writes can be switched off
pub struct FlakySessionRepository {
    inner: InMemorySessionRepository,
    failing: AtomicBool,
    writes: AtomicUsize,
}

impl FlakySessionRepository {
    pub fn new(sessions: Vec<Session>) -> Self {
        Self {
            inner: InMemorySessionRepository::with_sessions(sessions),
            failing: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Persistence("store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for FlakySessionRepository {
    async fn create_session(&self, session: &Session) -> Result<(), AppError> {
        self.check()?;
        self.inner.create_session(session).await
    }

    async fn get_by_id(&self, session_id: &str) -> Result<Option<Session>, AppError> {
        self.inner.get_by_id(session_id).await
    }

    async fn update_player(&self, session_id: &str, player: &Player) -> Result<Session, AppError> {
        self.check()?;
        self.inner.update_player(session_id, player).await
    }

    async fn finish_session(&self, session_id: &str) -> Result<Session, AppError> {
        self.check()?;
        self.inner.finish_session(session_id).await
    }
}
