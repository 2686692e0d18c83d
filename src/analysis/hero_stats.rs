use super::player_stats::{PlayerResult, Tally};
use std::collections::BTreeMap;

/// Results of one hero against one opposing hero.
pub type MatchupRecord = Tally;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroStats {
    pub hero: String,
    pub record: Tally,
    pub byes: usize,
    pub matchup_table: BTreeMap<String, MatchupRecord>,
}

impl HeroStats {
    pub fn new(hero: String) -> Self {
        HeroStats {
            hero,
            record: Tally::default(),
            byes: 0,
            matchup_table: BTreeMap::new(),
        }
    }

    pub fn add_match(&mut self, opponent_hero: &str, result: PlayerResult) {
        self.record.add(result);
        self.matchup_table
            .entry(opponent_hero.to_string())
            .or_default()
            .add(result);
    }

    /// A bye is a win with no opposing hero, so the matchup table is untouched.
    pub fn add_bye(&mut self) {
        self.record.add(PlayerResult::Bye);
        self.byes += 1;
    }

    pub fn matches_played(&self) -> usize {
        self.record.matches()
    }

    pub fn win_rate(&self) -> f64 {
        self.record.win_rate()
    }
}
