use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{Player, Session};
use crate::shared::AppError;

/// Session store consumed by the core.
///
/// A missing session is `Ok(None)` on reads and `AppError::NotFound` on writes.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create_session(&self, session: &Session) -> Result<(), AppError>;
    async fn get_by_id(&self, session_id: &str) -> Result<Option<Session>, AppError>;
    /// Stores the player's new state and returns the refreshed session.
    async fn update_player(&self, session_id: &str, player: &Player) -> Result<Session, AppError>;
    /// Sets `is_active = false`. Finishing an already finished session changes nothing.
    async fn finish_session(&self, session_id: &str) -> Result<Session, AppError>;
}

/// In-memory implementation of SessionRepository
///
/// Writes replace whole players; the last write wins.
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an in-memory repository with pre-populated sessions.
    /// A later session with a repeated id replaces the earlier one.
    pub fn with_sessions(sessions: Vec<Session>) -> Self {
        let session_map = sessions
            .into_iter()
            .map(|session| (session.id.clone(), session))
            .collect();

        Self {
            sessions: RwLock::new(session_map),
        }
    }

    /// Loads sessions from a JSON array file. Repeated session ids are an error.
    pub async fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::Persistence(format!("cannot read {}: {e}", path.display()))
        })?;
        let sessions: Vec<Session> = serde_json::from_str(&contents).map_err(|e| {
            AppError::Persistence(format!("cannot parse {}: {e}", path.display()))
        })?;

        let repository = Self::new();
        for session in &sessions {
            repository.create_session(session).await.map_err(|e| {
                AppError::Persistence(format!(
                    "cannot seed session {} from {}: {e}",
                    session.id,
                    path.display()
                ))
            })?;
        }

        debug!(count = sessions.len(), path = %path.display(), "Loaded seed sessions");
        Ok(repository)
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    #[instrument(skip(self, session), fields(session_id = %session.id))]
    async fn create_session(&self, session: &Session) -> Result<(), AppError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            warn!("Session already exists in memory");
            return Err(AppError::Persistence("Session already exists".to_string()));
        }
        sessions.insert(session.id.clone(), session.clone());

        debug!("Session created in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, session_id: &str) -> Result<Option<Session>, AppError> {
        let session = self.sessions.read().await.get(session_id).cloned();

        if session.is_none() {
            debug!("Session not found in memory");
        }
        Ok(session)
    }

    #[instrument(skip(self, player), fields(player_id = %player.id))]
    async fn update_player(&self, session_id: &str, player: &Player) -> Result<Session, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(session_id).ok_or_else(|| {
            warn!("Session not found for player update");
            AppError::NotFound(format!("session {session_id}"))
        })?;

        let stored = session.player_mut(&player.id).ok_or_else(|| {
            warn!("Player not found for update");
            AppError::NotFound(format!("player {} in session {session_id}", player.id))
        })?;
        *stored = player.clone();

        debug!(stats = player.stats.len(), "Player updated in memory");
        Ok(session.clone())
    }

    #[instrument(skip(self))]
    async fn finish_session(&self, session_id: &str) -> Result<Session, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| AppError::NotFound(format!("session {session_id}")))?;

        session.finish();

        debug!("Session finished in memory");
        Ok(session.clone())
    }
}
