use super::hero_stats::HeroStats;
use super::player_stats::{hero_key, PlayerMatch, PlayerResult, PlayerStats};
use crate::coverage::models::{MatchRecord, Outcome};
use std::collections::BTreeMap;

/// Player and hero aggregates for one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventStats {
    pub players: BTreeMap<String, PlayerStats>,
    pub heroes: BTreeMap<String, HeroStats>,
    pub matches: usize,
    pub byes: usize,
}

impl EventStats {
    pub fn player(&self, name: &str) -> Option<&PlayerStats> {
        self.players.get(name)
    }

    pub fn hero(&self, hero: &str) -> Option<&HeroStats> {
        self.heroes.get(hero)
    }
}

/// Folds match records into [`EventStats`].
///
/// Players are keyed by their published display name, so two entrants
/// sharing a name in one event end up in the same row.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    stats: EventStats,
}

impl StatsAggregator {
    pub fn new() -> Self {
        StatsAggregator::default()
    }

    /// Aggregates a whole event. Records are folded in round order; the
    /// sort is stable so page order is kept within a round.
    pub fn aggregate(records: &[MatchRecord]) -> EventStats {
        let mut ordered: Vec<&MatchRecord> = records.iter().collect();
        ordered.sort_by_key(|r| r.round);

        let mut aggregator = StatsAggregator::new();
        for record in ordered {
            aggregator.add(record);
        }
        aggregator.finish()
    }

    pub fn add(&mut self, record: &MatchRecord) {
        self.stats.matches += 1;
        let hero_a = hero_key(&record.hero_a);

        let opponent = record.opponent().and_then(|(b, hero_b)| {
            let (result_a, result_b) = match record.result {
                Outcome::AWin => (PlayerResult::Win, PlayerResult::Loss),
                Outcome::BWin => (PlayerResult::Loss, PlayerResult::Win),
                Outcome::Draw => (PlayerResult::Draw, PlayerResult::Draw),
                Outcome::Bye => return None,
            };
            Some((b, hero_b, result_a, result_b))
        });

        let Some((player_b, hero_b, result_a, result_b)) = opponent else {
            self.stats.byes += 1;
            self.player_entry(&record.player_a).add_match(PlayerMatch {
                round: record.round,
                opponent: None,
                hero: hero_a.clone(),
                opponent_hero: None,
                result: PlayerResult::Bye,
            });
            self.hero_entry(&hero_a).add_bye();
            return;
        };

        let hero_b = hero_key(&hero_b.map(str::to_string));

        self.player_entry(&record.player_a).add_match(PlayerMatch {
            round: record.round,
            opponent: Some(player_b.to_string()),
            hero: hero_a.clone(),
            opponent_hero: Some(hero_b.clone()),
            result: result_a,
        });
        self.player_entry(player_b).add_match(PlayerMatch {
            round: record.round,
            opponent: Some(record.player_a.clone()),
            hero: hero_b.clone(),
            opponent_hero: Some(hero_a.clone()),
            result: result_b,
        });

        self.hero_entry(&hero_a).add_match(&hero_b, result_a);
        self.hero_entry(&hero_b).add_match(&hero_a, result_b);
    }

    pub fn finish(self) -> EventStats {
        self.stats
    }

    fn player_entry(&mut self, name: &str) -> &mut PlayerStats {
        self.stats
            .players
            .entry(name.to_string())
            .or_insert_with(|| PlayerStats::new(name.to_string()))
    }

    fn hero_entry(&mut self, hero: &str) -> &mut HeroStats {
        self.stats
            .heroes
            .entry(hero.to_string())
            .or_insert_with(|| HeroStats::new(hero.to_string()))
    }
}
