use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::{Player, Session},
    repository::SessionRepository,
};
use crate::shared::AppError;
use crate::stats::{
    final_score, scoreboard, Capability, Component, ComponentKind, ComponentLoader,
    PlayerScore, PlayerStatsData, RecordKey, StatEditor, StatPatch, StatTypeRegistry, StatsError,
};

/// Player stats operations on top of the session store.
///
/// Mutations are optimistic: they change the caller's `Session` right away and hand
/// back a [`PendingWrite`] that still has to be persisted.
pub struct SessionService {
    repository: Arc<dyn SessionRepository>,
    registry: Arc<StatTypeRegistry>,
    loader: ComponentLoader,
}

/// A player state already applied in memory and not yet stored.
#[must_use = "the change is only in memory until persisted"]
pub struct PendingWrite {
    repository: Arc<dyn SessionRepository>,
    session_id: String,
    player: Player,
}

impl PendingWrite {
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Sends the player to the store.
    ///
    /// On failure the in-memory session keeps the optimistic state; callers that
    /// want the durable state back use [`SessionService::reload`].
    #[instrument(skip(self), fields(session_id = %self.session_id, player_id = %self.player.id))]
    pub async fn persist(self) -> Result<Session, AppError> {
        match self
            .repository
            .update_player(&self.session_id, &self.player)
            .await
        {
            Ok(session) => Ok(session),
            Err(err) => {
                warn!(%err, "Persisting player failed, in-memory state kept");
                Err(match err {
                    AppError::NotFound(msg) => AppError::NotFound(msg),
                    other => AppError::Persistence(other.to_string()),
                })
            }
        }
    }
}

impl SessionService {
    pub fn new(repository: Arc<dyn SessionRepository>, registry: Arc<StatTypeRegistry>) -> Self {
        let loader = ComponentLoader::new(registry.clone());
        Self {
            repository,
            registry,
            loader,
        }
    }

    pub fn registry(&self) -> &StatTypeRegistry {
        &self.registry
    }

    #[instrument(skip(self))]
    pub async fn get_session(&self, session_id: &str) -> Result<Option<Session>, AppError> {
        self.repository.get_by_id(session_id).await
    }

    /// Like [`Self::get_session`] with a missing session turned into `NotFound`.
    pub async fn load_session(&self, session_id: &str) -> Result<Session, AppError> {
        self.get_session(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("session {session_id}")))
    }

    /// Replaces a working copy with what the store holds.
    #[instrument(skip(self, session), fields(session_id = %session.id))]
    pub async fn reload(&self, session: &mut Session) -> Result<(), AppError> {
        *session = self.load_session(&session.id).await?;
        info!("Session reloaded from store");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn finish_session(&self, session_id: &str) -> Result<Session, AppError> {
        let session = self.repository.finish_session(session_id).await?;
        info!(players = session.players.len(), "Session finished");
        Ok(session)
    }

    pub fn final_score(&self, player: &Player) -> i64 {
        final_score(&self.registry, player)
    }

    pub fn scoreboard(&self, session: &Session) -> Vec<PlayerScore> {
        scoreboard(&self.registry, session)
    }

    /// Editor for a record when its stat type is updatable.
    pub async fn render_update_stats(&self, record: &PlayerStatsData) -> Option<StatEditor> {
        self.loader
            .load(&record.id, ComponentKind::Updater)
            .await
            .map(|component| component.bind(record))
    }

    /// Setup form for a configurable stat type.
    pub async fn render_configuration(&self, stat_type_id: &str) -> Option<Arc<Component>> {
        self.loader
            .load(stat_type_id, ComponentKind::Configurator)
            .await
    }

    /// Appends a ready-made record.
    #[instrument(
        skip(self, session, record),
        fields(session_id = %session.id, stat_type = %record.id)
    )]
    pub fn add_stats(
        &self,
        session: &mut Session,
        player_id: &str,
        record: PlayerStatsData,
    ) -> Result<PendingWrite, AppError> {
        self.registry.require(&record.id)?.validate(&record)?;

        let session_id = session.id.clone();
        let player = Self::writable_player(session, player_id)?;
        let updated = player.with_stats_added(record);
        info!(stats = updated.stats.len(), "Stats added");

        Ok(self.apply(session_id, player, updated))
    }

    /// Runs a configurable stat type's setup flow and appends the result.
    #[instrument(skip(self, session, input), fields(session_id = %session.id))]
    pub fn configure_stats(
        &self,
        session: &mut Session,
        player_id: &str,
        stat_type_id: &str,
        input: &Map<String, Value>,
    ) -> Result<PendingWrite, AppError> {
        let stat_type = self.registry.require(stat_type_id)?;
        let configurable =
            stat_type
                .as_configurable()
                .ok_or_else(|| StatsError::CapabilityUnavailable {
                    stat_type: stat_type_id.to_string(),
                    capability: Capability::Configurable,
                })?;

        let record = configurable.configure(input)?;
        self.add_stats(session, player_id, record)
    }

    #[instrument(skip(self, session, patch), fields(session_id = %session.id))]
    pub fn update_stats(
        &self,
        session: &mut Session,
        player_id: &str,
        key: RecordKey,
        patch: &StatPatch,
    ) -> Result<PendingWrite, AppError> {
        let session_id = session.id.clone();
        let player = Self::writable_player(session, player_id)?;
        let record = player
            .stats_record(key)
            .ok_or_else(|| AppError::NotFound(format!("stats record {key}")))?;

        let stat_type = self.registry.require(&record.id)?;
        let updatable = stat_type
            .as_updatable()
            .ok_or_else(|| StatsError::CapabilityUnavailable {
                stat_type: record.id.clone(),
                capability: Capability::Updatable,
            })?;
        updatable.validate_patch(record, patch)?;
        stat_type.validate(&record.merged(patch)?)?;

        let updated = player.with_stats_updated(key, patch)?;
        info!(%key, "Stats updated");

        Ok(self.apply(session_id, player, updated))
    }

    /// Removes a record. An unknown key leaves the stats untouched but still writes.
    #[instrument(skip(self, session), fields(session_id = %session.id))]
    pub fn remove_stats(
        &self,
        session: &mut Session,
        player_id: &str,
        key: RecordKey,
    ) -> Result<PendingWrite, AppError> {
        let session_id = session.id.clone();
        let player = Self::writable_player(session, player_id)?;
        let updated = player.with_stats_removed(key);
        info!(%key, remaining = updated.stats.len(), "Stats removed");

        Ok(self.apply(session_id, player, updated))
    }

    fn writable_player<'a>(
        session: &'a mut Session,
        player_id: &str,
    ) -> Result<&'a mut Player, AppError> {
        if !session.is_active {
            return Err(AppError::SessionFinished(session.id.clone()));
        }
        let session_id = session.id.clone();
        session
            .player_mut(player_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("player {player_id} in session {session_id}"))
            })
    }

    fn apply(&self, session_id: String, slot: &mut Player, updated: Player) -> PendingWrite {
        *slot = updated.clone();
        PendingWrite {
            repository: self.repository.clone(),
            session_id,
            player: updated,
        }
    }
}
