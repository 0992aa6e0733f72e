use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::models::{Player, Session};
use super::service::SessionService;
use crate::stats::{Capability, Component, RecordKey, StatEditor, StatType};

/// One rendered stats record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatRow {
    pub key: RecordKey,
    pub stat_type: String,
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<StatEditor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub id: String,
    pub name: String,
    pub final_score: i64,
    pub stats: Vec<StatRow>,
}

/// Response for the session page: every player with totals and read-only rows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    pub players: Vec<PlayerSummary>,
}

/// Response for the player page: rows carry editors where the stat type allows edits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub session_id: String,
    pub is_active: bool,
    pub player: PlayerSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatTypeResponse {
    pub id: String,
    pub name: String,
    pub capabilities: Vec<Capability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Component>,
}

/// Body of `POST .../stats`. `input` is the setup form for configurable stat
/// types and the record fields otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStatsRequest {
    pub stat_type: String,
    #[serde(default)]
    pub input: Map<String, Value>,
}

impl StatRow {
    fn read_only(service: &SessionService, player: &Player) -> Vec<StatRow> {
        let registry = service.registry();
        player
            .stats
            .iter()
            .map(|record| StatRow {
                key: record.key(),
                stat_type: record.id.clone(),
                name: registry.display_name(record),
                value: registry.render_stats(record),
                editor: None,
            })
            .collect()
    }
}

impl PlayerSummary {
    pub fn build(service: &SessionService, player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            final_score: service.final_score(player),
            stats: StatRow::read_only(service, player),
        }
    }
}

impl SessionResponse {
    pub fn build(service: &SessionService, session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            is_active: session.is_active,
            finished_at: session.finished_at,
            players: session
                .players
                .iter()
                .map(|player| PlayerSummary::build(service, player))
                .collect(),
        }
    }
}

impl PlayerResponse {
    pub async fn build(service: &SessionService, session: &Session, player: &Player) -> Self {
        let mut summary = PlayerSummary::build(service, player);
        if session.is_active {
            for (row, record) in summary.stats.iter_mut().zip(&player.stats) {
                row.editor = service.render_update_stats(record).await;
            }
        }

        Self {
            session_id: session.id.clone(),
            is_active: session.is_active,
            player: summary,
        }
    }
}

impl StatTypeResponse {
    pub async fn build(service: &SessionService, stat_type: &dyn StatType) -> Self {
        Self {
            id: stat_type.id().to_string(),
            name: stat_type.name().to_string(),
            capabilities: stat_type.capabilities(),
            configuration: service
                .render_configuration(stat_type.id())
                .await
                .map(|component| component.as_ref().clone()),
        }
    }
}
