use serde::Deserialize;
use tracing::warn;

use super::super::{
    Component, FieldSpec, PlayerStatsData, StatPatch, StatType, StatsError, Updatable,
};
use super::{check_bounds, integer_input};

/// Bounds on a score counter, shown by the editor and enforced on update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreRestrictions {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoreStatsData {
    score_count: Option<i64>,
}

/// Plain score counter. One plugin per counted quantity, each with its own id.
pub struct ScoreStatType {
    id: String,
    name: String,
    restrictions: ScoreRestrictions,
}

impl ScoreStatType {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            restrictions: ScoreRestrictions::default(),
        }
    }

    pub fn with_restrictions(mut self, restrictions: ScoreRestrictions) -> Self {
        self.restrictions = restrictions;
        self
    }

    pub fn restrictions(&self) -> ScoreRestrictions {
        self.restrictions
    }
}

impl StatType for ScoreStatType {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn render_stats(&self, record: &PlayerStatsData) -> String {
        self.final_score(record).to_string()
    }

    fn final_score(&self, record: &PlayerStatsData) -> i64 {
        match record.parse::<ScoreStatsData>() {
            Ok(data) => data.score_count.unwrap_or_default(),
            Err(err) => {
                warn!(stat_type = %self.id, %err, "Unreadable score record, scoring 0");
                0
            }
        }
    }

    fn validate(&self, record: &PlayerStatsData) -> Result<(), StatsError> {
        let data = record.parse::<ScoreStatsData>()?;
        check_bounds(
            "scoreCount",
            data.score_count.unwrap_or_default(),
            self.restrictions.min,
            self.restrictions.max,
        )
    }

    fn as_updatable(&self) -> Option<&dyn Updatable> {
        Some(self)
    }
}

impl Updatable for ScoreStatType {
    fn updater(&self) -> Component {
        Component {
            selector: "gc-score-player-stats-updater".to_string(),
            fields: vec![FieldSpec::integer("scoreCount", &self.name)
                .bounded(self.restrictions.min, self.restrictions.max)],
        }
    }

    fn validate_patch(
        &self,
        _record: &PlayerStatsData,
        patch: &StatPatch,
    ) -> Result<(), StatsError> {
        if let Some(count) = integer_input(patch, "scoreCount")? {
            check_bounds(
                "scoreCount",
                count,
                self.restrictions.min,
                self.restrictions.max,
            )?;
        }
        Ok(())
    }
}
