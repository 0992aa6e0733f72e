use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stats::{PlayerStatsData, RecordKey, StatPatch, StatsError};

/// A tracked game session as stored by the session store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub players: Vec<Player>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_active: true,
            finished_at: None,
            players: Vec::new(),
        }
    }

    pub fn with_players(mut self, players: Vec<Player>) -> Self {
        self.players = players;
        self
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn player_mut(&mut self, player_id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }

    /// Marks the session finished. Only ever goes from active to inactive;
    /// finishing twice keeps the first timestamp.
    pub fn finish(&mut self) {
        if self.is_active {
            self.is_active = false;
            self.finished_at = Some(Utc::now());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub stats: Vec<PlayerStatsData>,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stats: Vec::new(),
        }
    }

    pub fn with_stats(mut self, stats: Vec<PlayerStatsData>) -> Self {
        self.stats = stats;
        self
    }

    pub fn stats_record(&self, key: RecordKey) -> Option<&PlayerStatsData> {
        self.stats.iter().find(|record| record.key() == key)
    }

    /// New player with `record` appended after the existing records.
    pub fn with_stats_added(&self, record: PlayerStatsData) -> Player {
        let mut stats = Vec::with_capacity(self.stats.len() + 1);
        stats.extend(self.stats.iter().cloned());
        stats.push(record);
        self.replaced_stats(stats)
    }

    /// New player where the record identified by `key` is replaced by its merge
    /// with `patch`, at the same position. Unknown keys leave the stats as they are.
    pub fn with_stats_updated(
        &self,
        key: RecordKey,
        patch: &StatPatch,
    ) -> Result<Player, StatsError> {
        let stats = self
            .stats
            .iter()
            .map(|record| {
                if record.key() == key {
                    record.merged(patch)
                } else {
                    Ok(record.clone())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.replaced_stats(stats))
    }

    /// New player without the record identified by `key`.
    pub fn with_stats_removed(&self, key: RecordKey) -> Player {
        let stats = self
            .stats
            .iter()
            .filter(|record| record.key() != key)
            .cloned()
            .collect();
        self.replaced_stats(stats)
    }

    fn replaced_stats(&self, stats: Vec<PlayerStatsData>) -> Player {
        Player {
            id: self.id.clone(),
            name: self.name.clone(),
            stats,
        }
    }
}
