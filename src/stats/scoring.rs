use serde::Serialize;
use tracing::warn;

use super::StatTypeRegistry;
use crate::session::models::{Player, Session};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerScore {
    pub player_id: String,
    pub name: String,
    pub final_score: i64,
}

/// Sum of every record's contribution. Records of unregistered types count 0.
///
/// Saturates at the `i64` bounds instead of overflowing.
pub fn final_score(registry: &StatTypeRegistry, player: &Player) -> i64 {
    let total = player
        .stats
        .iter()
        .map(|record| {
            registry
                .get(&record.id)
                .map(|stat_type| i128::from(stat_type.final_score(record)))
                .unwrap_or_default()
        })
        .fold(0i128, |acc, value| acc.saturating_add(value));

    i64::try_from(total).unwrap_or_else(|_| {
        warn!(player_id = %player.id, "Final score out of range, clamping");
        if total.is_negative() {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}

/// Players ranked by final score, highest first. Ties keep session order.
pub fn scoreboard(registry: &StatTypeRegistry, session: &Session) -> Vec<PlayerScore> {
    let mut scores: Vec<PlayerScore> = session
        .players
        .iter()
        .map(|player| PlayerScore {
            player_id: player.id.clone(),
            name: player.name.clone(),
            final_score: final_score(registry, player),
        })
        .collect();
    scores.sort_by(|a, b| b.final_score.cmp(&a.final_score));
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::PlayerStatsData;

    fn registry() -> StatTypeRegistry {
        StatTypeRegistry::builder().build().unwrap()
    }

    fn score(count: i64) -> PlayerStatsData {
        PlayerStatsData::new("score").with_field("scoreCount", count)
    }

    fn card(count: i64, ratio: i64) -> PlayerStatsData {
        PlayerStatsData::new("card-vps")
            .with_field("cardName", "Birds")
            .with_field("scoreCount", count)
            .with_field("vpsRatio", ratio)
    }

    #[test]
    fn sums_every_record() {
        let player = Player::new("p1", "Alice").with_stats(vec![score(5), card(11, 3)]);

        assert_eq!(final_score(&registry(), &player), 8);
    }

    #[test]
    fn empty_player_scores_zero() {
        assert_eq!(final_score(&registry(), &Player::new("p1", "Alice")), 0);
    }

    #[test]
    fn unknown_records_contribute_zero() {
        let player = Player::new("p1", "Alice").with_stats(vec![
            score(4),
            PlayerStatsData::new("ghost").with_field("scoreCount", 100),
            score(2),
        ]);

        assert_eq!(final_score(&registry(), &player), 6);
    }

    #[test]
    fn duplicate_types_all_count() {
        let player = Player::new("p1", "Alice").with_stats(vec![score(1), score(1), score(1)]);

        assert_eq!(final_score(&registry(), &player), 3);
    }

    #[test]
    fn corrupt_ratio_does_not_abort_sum() {
        let player = Player::new("p1", "Alice").with_stats(vec![card(9, 0), score(3)]);

        assert_eq!(final_score(&registry(), &player), 3);
    }

    #[test]
    fn huge_scores_clamp_instead_of_overflowing() {
        let player = Player::new("p1", "Alice").with_stats(vec![score(i64::MAX), score(1)]);

        assert_eq!(final_score(&registry(), &player), i64::MAX);
    }

    #[test]
    fn intermediate_overflow_does_not_stick() {
        let player =
            Player::new("p1", "Alice").with_stats(vec![score(i64::MAX), score(1), score(-1)]);

        assert_eq!(final_score(&registry(), &player), i64::MAX);
    }

    #[test]
    fn huge_negative_scores_clamp_at_minimum() {
        let player = Player::new("p1", "Alice").with_stats(vec![score(i64::MIN), score(-1)]);

        assert_eq!(final_score(&registry(), &player), i64::MIN);
    }

    #[test]
    fn scoreboard_survives_extreme_scores() {
        let session = Session::new("s1").with_players(vec![
            Player::new("a", "Alice").with_stats(vec![score(i64::MAX), score(i64::MAX)]),
            Player::new("b", "Bob").with_stats(vec![score(3)]),
        ]);

        let board = scoreboard(&registry(), &session);

        assert_eq!(board[0].player_id, "a");
        assert_eq!(board[0].final_score, i64::MAX);
    }

    #[test]
    fn scoreboard_ranks_by_score_and_keeps_ties_in_order() {
        let session = Session::new("s1").with_players(vec![
            Player::new("a", "Alice").with_stats(vec![score(2)]),
            Player::new("b", "Bob").with_stats(vec![score(7)]),
            Player::new("c", "Cleo").with_stats(vec![score(2)]),
        ]);

        let board = scoreboard(&registry(), &session);
        let order: Vec<&str> = board.iter().map(|s| s.player_id.as_str()).collect();

        assert_eq!(order, vec!["b", "a", "c"]);
        assert_eq!(board[0].final_score, 7);
    }
}
