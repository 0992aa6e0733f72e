use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use super::super::{
    Component, Configurable, FieldSpec, Nameable, PlayerStatsData, StatPatch, StatType,
    StatsError, Updatable,
};
use super::{check_bounds, integer_input, text_input};

pub const CARD_VPS_ID: &str = "card-vps";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardVpsStatsData {
    card_name: String,
    score_count: i64,
    vps_ratio: i64,
}

/// Victory points granted by a card: one VP per `vpsRatio` resources on it.
#[derive(Debug, Default)]
pub struct CardVpsStatType;

impl CardVpsStatType {
    pub fn new() -> Self {
        Self
    }

    fn victory_points(data: &CardVpsStatsData) -> i64 {
        if data.vps_ratio <= 0 {
            warn!(
                card = %data.card_name,
                ratio = data.vps_ratio,
                "Card record with non-positive ratio, scoring 0"
            );
            return 0;
        }
        data.score_count.div_euclid(data.vps_ratio)
    }
}

fn check_card_name(name: &str) -> Result<(), StatsError> {
    if name.trim().is_empty() {
        return Err(StatsError::Validation("cardName must not be empty".to_string()));
    }
    Ok(())
}

fn check_ratio(ratio: i64) -> Result<(), StatsError> {
    check_bounds("vpsRatio", ratio, Some(1), None)
}

fn check_count(count: i64) -> Result<(), StatsError> {
    check_bounds("scoreCount", count, Some(0), None)
}

impl StatType for CardVpsStatType {
    fn id(&self) -> &str {
        CARD_VPS_ID
    }

    fn name(&self) -> &str {
        "Card Victory Points"
    }

    fn render_stats(&self, record: &PlayerStatsData) -> String {
        match record.parse::<CardVpsStatsData>() {
            Ok(data) => format!(
                "{} - {}VPs ({}/1 VP)",
                data.score_count,
                Self::victory_points(&data),
                data.vps_ratio
            ),
            Err(_) => "invalid card record".to_string(),
        }
    }

    fn final_score(&self, record: &PlayerStatsData) -> i64 {
        match record.parse::<CardVpsStatsData>() {
            Ok(data) => Self::victory_points(&data),
            Err(err) => {
                warn!(%err, "Unreadable card record, scoring 0");
                0
            }
        }
    }

    fn validate(&self, record: &PlayerStatsData) -> Result<(), StatsError> {
        let data = record.parse::<CardVpsStatsData>()?;
        check_card_name(&data.card_name)?;
        check_ratio(data.vps_ratio)?;
        check_count(data.score_count)
    }

    fn as_updatable(&self) -> Option<&dyn Updatable> {
        Some(self)
    }

    fn as_configurable(&self) -> Option<&dyn Configurable> {
        Some(self)
    }

    fn as_nameable(&self) -> Option<&dyn Nameable> {
        Some(self)
    }
}

impl Updatable for CardVpsStatType {
    fn updater(&self) -> Component {
        Component {
            selector: "tfm-card-vps-player-stats-updater".to_string(),
            fields: vec![FieldSpec::integer("scoreCount", "Resources").bounded(Some(0), None)],
        }
    }

    fn validate_patch(
        &self,
        _record: &PlayerStatsData,
        patch: &StatPatch,
    ) -> Result<(), StatsError> {
        if let Some(count) = integer_input(patch, "scoreCount")? {
            check_count(count)?;
        }
        if let Some(ratio) = integer_input(patch, "vpsRatio")? {
            check_ratio(ratio)?;
        }
        if let Some(name) = text_input(patch, "cardName")? {
            check_card_name(name)?;
        }
        Ok(())
    }
}

impl Configurable for CardVpsStatType {
    fn configurator(&self) -> Component {
        Component {
            selector: "tfm-card-vps-player-stats-configurator".to_string(),
            fields: vec![
                FieldSpec::text("cardName", "Card"),
                FieldSpec::integer("vpsRatio", "Resources per VP").bounded(Some(1), None),
            ],
        }
    }

    fn configure(&self, input: &Map<String, Value>) -> Result<PlayerStatsData, StatsError> {
        let card_name = text_input(input, "cardName")?
            .ok_or_else(|| StatsError::Validation("cardName is required".to_string()))?;
        check_card_name(card_name)?;

        let ratio = integer_input(input, "vpsRatio")?
            .ok_or_else(|| StatsError::Validation("vpsRatio is required".to_string()))?;
        check_ratio(ratio)?;

        let count = integer_input(input, "scoreCount")?.unwrap_or_default();
        check_count(count)?;

        Ok(PlayerStatsData::new(CARD_VPS_ID)
            .with_field("cardName", card_name.trim())
            .with_field("scoreCount", count)
            .with_field("vpsRatio", ratio))
    }
}

impl Nameable for CardVpsStatType {
    fn render_display_name(&self, record: &PlayerStatsData) -> String {
        match record.fields.get("cardName").and_then(Value::as_str) {
            Some(name) => format!("Card {name}"),
            None => "Card".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn card(count: i64, ratio: i64) -> PlayerStatsData {
        PlayerStatsData::new(CARD_VPS_ID)
            .with_field("cardName", "Birds")
            .with_field("scoreCount", count)
            .with_field("vpsRatio", ratio)
    }

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[rstest]
    #[case(11, 3, 3)]
    #[case(9, 3, 3)]
    #[case(0, 5, 0)]
    #[case(2, 3, 0)]
    #[case(7, 1, 7)]
    fn scores_one_vp_per_ratio(#[case] count: i64, #[case] ratio: i64, #[case] expected: i64) {
        assert_eq!(CardVpsStatType::new().final_score(&card(count, ratio)), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(-2)]
    fn non_positive_ratio_scores_zero_without_panicking(#[case] ratio: i64) {
        let stat_type = CardVpsStatType::new();
        let record = card(10, ratio);

        assert_eq!(stat_type.final_score(&record), 0);
        assert!(stat_type.validate(&record).is_err());
    }

    #[test]
    fn renders_count_and_victory_points() {
        let stat_type = CardVpsStatType::new();

        assert_eq!(stat_type.render_stats(&card(11, 3)), "11 - 3VPs (3/1 VP)");
        assert_eq!(stat_type.render_display_name(&card(11, 3)), "Card Birds");
    }

    #[test]
    fn missing_fields_score_zero() {
        let record = PlayerStatsData::new(CARD_VPS_ID).with_field("cardName", "Birds");

        assert_eq!(CardVpsStatType::new().final_score(&record), 0);
        assert_eq!(CardVpsStatType::new().render_stats(&record), "invalid card record");
    }

    #[test]
    fn configure_builds_fresh_record() {
        let record = CardVpsStatType::new()
            .configure(&map(json!({ "cardName": " Tardigrades ", "vpsRatio": 4 })))
            .unwrap();

        assert_eq!(record.id, CARD_VPS_ID);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "id": "card-vps",
                "cardName": "Tardigrades",
                "scoreCount": 0,
                "vpsRatio": 4
            })
        );
    }

    #[rstest]
    #[case(json!({ "cardName": "Birds", "vpsRatio": 0 }))]
    #[case(json!({ "cardName": "Birds", "vpsRatio": -3 }))]
    #[case(json!({ "cardName": "Birds" }))]
    #[case(json!({ "cardName": "  ", "vpsRatio": 2 }))]
    #[case(json!({ "vpsRatio": 2 }))]
    #[case(json!({ "cardName": "Birds", "vpsRatio": "2" }))]
    fn configure_rejects_invalid_input(#[case] input: Value) {
        let result = CardVpsStatType::new().configure(&map(input));

        assert!(matches!(result, Err(StatsError::Validation(_))));
    }

    #[test]
    fn patch_cannot_zero_the_ratio() {
        let stat_type = CardVpsStatType::new();

        assert!(stat_type
            .validate_patch(&card(3, 2), &map(json!({ "vpsRatio": 0 })))
            .is_err());
        assert!(stat_type
            .validate_patch(&card(3, 2), &map(json!({ "scoreCount": -1 })))
            .is_err());
        assert!(stat_type
            .validate_patch(&card(3, 2), &map(json!({ "scoreCount": 4 })))
            .is_ok());
    }
}
