use super::aggregator::EventStats;
use super::player_stats::Tally;
use std::cmp::Ordering;

pub const DEFAULT_POLARIZED_THRESHOLD: f64 = 60.0;
pub const DEFAULT_MIN_MATCHES: usize = 10;
pub const DEFAULT_MIN_HERO_MATCHES: usize = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct HeroRanking {
    pub hero: String,
    pub record: Tally,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolarizedMatchup {
    pub hero: String,
    pub opponent_hero: String,
    pub record: Tally,
    /// Percent, 0-100.
    pub win_rate: f64,
    /// Distance of `win_rate` from an even 50%.
    pub deviation: f64,
}

/// Heroes with at least `min_matches`, best win rate first.
/// Ties go to the more played hero, then by name.
pub fn hero_rankings(stats: &EventStats, min_matches: usize) -> Vec<HeroRanking> {
    let mut rankings: Vec<HeroRanking> = stats
        .heroes
        .values()
        .filter(|h| h.matches_played() >= min_matches)
        .map(|h| HeroRanking {
            hero: h.hero.clone(),
            record: h.record,
            win_rate: h.win_rate(),
        })
        .collect();

    rankings.sort_by(|a, b| {
        b.win_rate
            .partial_cmp(&a.win_rate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.record.matches().cmp(&a.record.matches()))
            .then_with(|| a.hero.cmp(&b.hero))
    });
    rankings
}

/// Matchups that lean hard one way: win rate >= `threshold_pct` or
/// <= `100 - threshold_pct`, with at least `min_matches` games.
/// Most lopsided first.
pub fn polarized_matchups(
    stats: &EventStats,
    threshold_pct: f64,
    min_matches: usize,
) -> Vec<PolarizedMatchup> {
    let low = 100.0 - threshold_pct;

    let mut polarized: Vec<PolarizedMatchup> = stats
        .heroes
        .values()
        .flat_map(|h| {
            h.matchup_table.iter().map(move |(opponent, record)| {
                let win_rate = record.win_rate() * 100.0;
                PolarizedMatchup {
                    hero: h.hero.clone(),
                    opponent_hero: opponent.clone(),
                    record: *record,
                    win_rate,
                    deviation: (win_rate - 50.0).abs(),
                }
            })
        })
        .filter(|m| m.record.matches() >= min_matches)
        .filter(|m| m.win_rate >= threshold_pct || m.win_rate <= low)
        .collect();

    polarized.sort_by(|a, b| {
        b.deviation
            .partial_cmp(&a.deviation)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.hero.cmp(&b.hero))
            .then_with(|| a.opponent_hero.cmp(&b.opponent_hero))
    });
    polarized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregator::StatsAggregator;
    use crate::coverage::models::{MatchRecord, Outcome};

    fn game(round: u32, a_hero: &str, b_hero: &str, result: Outcome) -> MatchRecord {
        MatchRecord::new(
            round,
            format!("a{}{}", round, a_hero),
            Some(a_hero.to_string()),
            format!("b{}{}", round, b_hero),
            Some(b_hero.to_string()),
            result,
        )
    }

    fn stats() -> EventStats {
        let mut records = Vec::new();
        // Brute beats Ninja 3 of 4; Guardian and Ninja split 1-1.
        for round in 1..=3 {
            records.push(game(round, "Brute", "Ninja", Outcome::AWin));
        }
        records.push(game(4, "Brute", "Ninja", Outcome::BWin));
        records.push(game(5, "Guardian", "Ninja", Outcome::AWin));
        records.push(game(6, "Guardian", "Ninja", Outcome::BWin));
        StatsAggregator::aggregate(&records)
    }

    #[test]
    fn rankings_sort_by_win_rate_then_volume() {
        let rankings = hero_rankings(&stats(), 1);
        let order: Vec<&str> = rankings.iter().map(|r| r.hero.as_str()).collect();
        assert_eq!(order, vec!["Brute", "Guardian", "Ninja"]);
        assert_eq!(rankings[0].win_rate, 0.75);

        let rankings = hero_rankings(&stats(), 3);
        assert_eq!(rankings.len(), 2);
    }

    #[test]
    fn polarized_keeps_both_directions() {
        let polarized = polarized_matchups(&stats(), 60.0, 4);
        let pairs: Vec<(&str, &str)> = polarized
            .iter()
            .map(|m| (m.hero.as_str(), m.opponent_hero.as_str()))
            .collect();
        assert_eq!(pairs, vec![("Brute", "Ninja"), ("Ninja", "Brute")]);
        assert_eq!(polarized[0].win_rate, 75.0);
        assert_eq!(polarized[0].deviation, 25.0);
        assert_eq!(polarized[1].win_rate, 25.0);
    }

    #[test]
    fn even_or_thin_matchups_are_dropped() {
        assert!(polarized_matchups(&stats(), 60.0, 5).is_empty());
        let polarized = polarized_matchups(&stats(), 60.0, 2);
        assert!(polarized.iter().all(|m| m.hero != "Guardian"));
    }
}
