use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use super::{CardVpsStatType, PlayerStatsData, ScoreStatType, StatType, StatsError};

/// Catalogue of the stat types available to this process.
///
/// Built once at startup and shared by reference; it never changes afterwards.
pub struct StatTypeRegistry {
    stat_types: Vec<Arc<dyn StatType>>,
}

impl StatTypeRegistry {
    pub fn builder() -> StatTypeRegistryBuilder {
        StatTypeRegistryBuilder::new()
    }

    /// Registry without the default plugins.
    pub fn empty() -> StatTypeRegistryBuilder {
        StatTypeRegistryBuilder {
            stat_types: Vec::new(),
        }
    }

    /// Every registered stat type, in registration order.
    pub fn get_available(&self) -> &[Arc<dyn StatType>] {
        &self.stat_types
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn StatType>> {
        let found = self.stat_types.iter().find(|stat_type| stat_type.id() == id);
        if found.is_none() {
            debug!(stat_type = %id, "Stat type not registered");
        }
        found
    }

    pub fn require(&self, id: &str) -> Result<&Arc<dyn StatType>, StatsError> {
        self.get(id)
            .ok_or_else(|| StatsError::UnknownStatType(id.to_string()))
    }

    /// Label of a record: its own display name when the plugin is nameable,
    /// otherwise the plugin name, or `Unknown(id)` for unregistered types.
    pub fn display_name(&self, record: &PlayerStatsData) -> String {
        match self.get(&record.id) {
            Some(stat_type) => match stat_type.as_nameable() {
                Some(nameable) => nameable.render_display_name(record),
                None => stat_type.name().to_string(),
            },
            None => format!("Unknown({})", record.id),
        }
    }

    /// Read-only rendering of a record; the raw identifier for unregistered types.
    pub fn render_stats(&self, record: &PlayerStatsData) -> String {
        match self.get(&record.id) {
            Some(stat_type) => stat_type.render_stats(record),
            None => record.id.clone(),
        }
    }
}

pub struct StatTypeRegistryBuilder {
    stat_types: Vec<Arc<dyn StatType>>,
}

impl StatTypeRegistryBuilder {
    fn new() -> Self {
        Self {
            stat_types: vec![
                Arc::new(ScoreStatType::new("score", "Score")),
                Arc::new(CardVpsStatType::new()),
            ],
        }
    }

    pub fn with_stat_type(mut self, stat_type: Arc<dyn StatType>) -> Self {
        self.stat_types.push(stat_type);
        self
    }

    pub fn build(self) -> Result<StatTypeRegistry, StatsError> {
        let mut seen = HashSet::new();
        for stat_type in &self.stat_types {
            if !seen.insert(stat_type.id().to_string()) {
                return Err(StatsError::DuplicateStatType(stat_type.id().to_string()));
            }
        }

        info!(
            stat_types = ?self.stat_types.iter().map(|s| s.id()).collect::<Vec<_>>(),
            "Stat type registry built"
        );

        Ok(StatTypeRegistry {
            stat_types: self.stat_types,
        })
    }
}
