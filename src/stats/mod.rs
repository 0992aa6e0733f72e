pub mod loader;
pub mod models;
pub mod registry;
pub mod scoring;
pub mod types;

mod errors;

pub use errors::StatsError;
pub use loader::ComponentLoader;
pub use models::*;
pub use registry::{StatTypeRegistry, StatTypeRegistryBuilder};
pub use scoring::{final_score, scoreboard, PlayerScore};
pub use types::{CardVpsStatType, ScoreRestrictions, ScoreStatType};

use serde::{Deserialize, Serialize};
use serde_json::Map;
use strum_macros::{Display, EnumIter};

/// Optional extensions a stat type may support on top of [`StatType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Capability {
    Updatable,
    Configurable,
    Nameable,
}

/// Contract every stat-type plugin implements.
///
/// Optional capabilities are discovered at runtime through the `as_*` queries; a
/// `None` means the capability is absent, which is never an error.
pub trait StatType: Send + Sync {
    /// Stable identifier, unique across the registry.
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    /// Read-only presentation of the record's current value.
    fn render_stats(&self, record: &PlayerStatsData) -> String;

    /// Contribution of the record to the player's total. Must be pure.
    fn final_score(&self, record: &PlayerStatsData) -> i64;

    /// Rejects records this plugin could not score sensibly.
    fn validate(&self, _record: &PlayerStatsData) -> Result<(), StatsError> {
        Ok(())
    }

    fn as_updatable(&self) -> Option<&dyn Updatable> {
        None
    }

    fn as_configurable(&self) -> Option<&dyn Configurable> {
        None
    }

    fn as_nameable(&self) -> Option<&dyn Nameable> {
        None
    }

    fn capabilities(&self) -> Vec<Capability> {
        let mut capabilities = Vec::new();
        if self.as_updatable().is_some() {
            capabilities.push(Capability::Updatable);
        }
        if self.as_configurable().is_some() {
            capabilities.push(Capability::Configurable);
        }
        if self.as_nameable().is_some() {
            capabilities.push(Capability::Nameable);
        }
        capabilities
    }

    fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Updatable => self.as_updatable().is_some(),
            Capability::Configurable => self.as_configurable().is_some(),
            Capability::Nameable => self.as_nameable().is_some(),
        }
    }
}

pub trait Updatable {
    /// Editor definition. Expensive to build; callers go through [`ComponentLoader`].
    fn updater(&self) -> Component;

    fn render_update_stats(&self, record: &PlayerStatsData) -> StatEditor {
        self.updater().bind(record)
    }

    /// Checks a patch against the record it will be merged into.
    fn validate_patch(&self, record: &PlayerStatsData, patch: &StatPatch) -> Result<(), StatsError>;
}

pub trait Configurable {
    fn configurator(&self) -> Component;

    fn render_configuration(&self) -> Component {
        self.configurator()
    }

    /// Setup flow: turns the submitted form into a fresh record.
    fn configure(
        &self,
        input: &Map<String, serde_json::Value>,
    ) -> Result<PlayerStatsData, StatsError>;
}

pub trait Nameable {
    fn render_display_name(&self, record: &PlayerStatsData) -> String;
}
