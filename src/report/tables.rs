use crate::analysis::aggregator::EventStats;
use crate::analysis::meta::{HeroRanking, PolarizedMatchup};
use crate::analysis::player_stats::{hero_key, Tally};
use crate::coverage::models::{MatchRecord, BYE};
use serde::Serialize;

/// A row type with a fixed column set, so empty tables still get a header.
pub trait TableRow: Serialize {
    const HEADERS: &'static [&'static str];
}

/// Fraction to percent, two decimals.
pub fn percent(rate: f64) -> f64 {
    (rate * 10_000.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRow {
    pub round: u32,
    pub player_a: String,
    pub player_b: String,
    pub hero_a: String,
    pub hero_b: String,
    pub result: &'static str,
}

impl TableRow for MatchRow {
    const HEADERS: &'static [&'static str] =
        &["round", "player_a", "player_b", "hero_a", "hero_b", "result"];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRow {
    pub player: String,
    pub matches_played: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub byes: usize,
    pub win_rate: f64,
    pub heroes_played: String,
}

impl TableRow for PlayerRow {
    const HEADERS: &'static [&'static str] = &[
        "player",
        "matches_played",
        "wins",
        "losses",
        "draws",
        "byes",
        "win_rate",
        "heroes_played",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroRow {
    pub hero: String,
    pub matches_played: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub byes: usize,
    pub win_rate: f64,
}

impl TableRow for HeroRow {
    const HEADERS: &'static [&'static str] = &[
        "hero",
        "matches_played",
        "wins",
        "losses",
        "draws",
        "byes",
        "win_rate",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerDetailRow {
    pub round: u32,
    pub opponent: String,
    pub own_hero: String,
    pub opponent_hero: String,
    pub result: &'static str,
}

impl TableRow for PlayerDetailRow {
    const HEADERS: &'static [&'static str] =
        &["round", "opponent", "own_hero", "opponent_hero", "result"];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedPlayerDetailRow {
    pub player: String,
    pub round: u32,
    pub opponent: String,
    pub own_hero: String,
    pub opponent_hero: String,
    pub result: &'static str,
}

impl TableRow for CombinedPlayerDetailRow {
    const HEADERS: &'static [&'static str] = &[
        "player",
        "round",
        "opponent",
        "own_hero",
        "opponent_hero",
        "result",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupRow {
    pub opposing_hero: String,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub matches: usize,
    pub win_rate: f64,
}

impl MatchupRow {
    fn new(opposing_hero: &str, record: &Tally) -> Self {
        MatchupRow {
            opposing_hero: opposing_hero.to_string(),
            wins: record.wins,
            losses: record.losses,
            draws: record.draws,
            matches: record.matches(),
            win_rate: percent(record.win_rate()),
        }
    }
}

impl TableRow for MatchupRow {
    const HEADERS: &'static [&'static str] =
        &["opposing_hero", "wins", "losses", "draws", "matches", "win_rate"];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedMatchupRow {
    pub hero: String,
    pub opposing_hero: String,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub matches: usize,
    pub win_rate: f64,
}

impl TableRow for CombinedMatchupRow {
    const HEADERS: &'static [&'static str] = &[
        "hero",
        "opposing_hero",
        "wins",
        "losses",
        "draws",
        "matches",
        "win_rate",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroRankingRow {
    pub rank: usize,
    pub hero: String,
    pub matches_played: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub win_rate: f64,
}

impl TableRow for HeroRankingRow {
    const HEADERS: &'static [&'static str] = &[
        "rank",
        "hero",
        "matches_played",
        "wins",
        "losses",
        "draws",
        "win_rate",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolarizedRow {
    pub hero: String,
    pub opposing_hero: String,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub matches: usize,
    pub win_rate: f64,
    pub deviation: f64,
}

impl TableRow for PolarizedRow {
    const HEADERS: &'static [&'static str] = &[
        "hero",
        "opposing_hero",
        "wins",
        "losses",
        "draws",
        "matches",
        "win_rate",
        "deviation",
    ];
}

/// Every output table, in write order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportTables {
    pub matches: Vec<MatchRow>,
    pub players: Vec<PlayerRow>,
    pub heroes: Vec<HeroRow>,
    /// One sub-table per player, sorted by player name.
    pub player_details: Vec<(String, Vec<PlayerDetailRow>)>,
    /// One sub-table per hero, sorted by hero name.
    pub hero_matchups: Vec<(String, Vec<MatchupRow>)>,
    pub hero_rankings: Vec<HeroRankingRow>,
    pub polarized: Vec<PolarizedRow>,
}

impl ReportTables {
    pub fn build(
        records: &[MatchRecord],
        stats: &EventStats,
        rankings: &[HeroRanking],
        polarized: &[PolarizedMatchup],
    ) -> Self {
        // Hero cells use the same "Unknown" key as the stats tables; only a
        // bye leaves the opponent's hero empty.
        let matches = records
            .iter()
            .map(|r| {
                let (player_b, hero_b) = match r.opponent() {
                    Some((b, hero)) => (b.to_string(), hero_key(&hero.map(str::to_string))),
                    None => (BYE.to_string(), String::new()),
                };
                MatchRow {
                    round: r.round,
                    player_a: r.player_a.clone(),
                    player_b,
                    hero_a: hero_key(&r.hero_a),
                    hero_b,
                    result: r.outcome().as_str(),
                }
            })
            .collect();

        let players = stats
            .players
            .values()
            .map(|p| PlayerRow {
                player: p.name.clone(),
                matches_played: p.matches_played(),
                wins: p.record.wins,
                losses: p.record.losses,
                draws: p.record.draws,
                byes: p.byes,
                win_rate: percent(p.win_rate()),
                heroes_played: p.heroes_label(),
            })
            .collect();

        let heroes = stats
            .heroes
            .values()
            .map(|h| HeroRow {
                hero: h.hero.clone(),
                matches_played: h.matches_played(),
                wins: h.record.wins,
                losses: h.record.losses,
                draws: h.record.draws,
                byes: h.byes,
                win_rate: percent(h.win_rate()),
            })
            .collect();

        let player_details = stats
            .players
            .values()
            .map(|p| {
                let rows = p
                    .match_history
                    .iter()
                    .map(|m| PlayerDetailRow {
                        round: m.round,
                        opponent: m.opponent.clone().unwrap_or_else(|| BYE.to_string()),
                        own_hero: m.hero.clone(),
                        opponent_hero: m.opponent_hero.clone().unwrap_or_default(),
                        result: m.result.as_str(),
                    })
                    .collect();
                (p.name.clone(), rows)
            })
            .collect();

        let hero_matchups = stats
            .heroes
            .values()
            .map(|h| {
                let rows = h
                    .matchup_table
                    .iter()
                    .map(|(opponent, record)| MatchupRow::new(opponent, record))
                    .collect();
                (h.hero.clone(), rows)
            })
            .collect();

        let hero_rankings = rankings
            .iter()
            .enumerate()
            .map(|(idx, h)| HeroRankingRow {
                rank: idx + 1,
                hero: h.hero.clone(),
                matches_played: h.record.matches(),
                wins: h.record.wins,
                losses: h.record.losses,
                draws: h.record.draws,
                win_rate: percent(h.win_rate),
            })
            .collect();

        let polarized = polarized
            .iter()
            .map(|m| PolarizedRow {
                hero: m.hero.clone(),
                opposing_hero: m.opponent_hero.clone(),
                wins: m.record.wins,
                losses: m.record.losses,
                draws: m.record.draws,
                matches: m.record.matches(),
                win_rate: (m.win_rate * 100.0).round() / 100.0,
                deviation: (m.deviation * 100.0).round() / 100.0,
            })
            .collect();

        ReportTables {
            matches,
            players,
            heroes,
            player_details,
            hero_matchups,
            hero_rankings,
            polarized,
        }
    }

    pub fn combined_player_details(&self) -> Vec<CombinedPlayerDetailRow> {
        self.player_details
            .iter()
            .flat_map(|(player, rows)| {
                rows.iter().map(move |r| CombinedPlayerDetailRow {
                    player: player.clone(),
                    round: r.round,
                    opponent: r.opponent.clone(),
                    own_hero: r.own_hero.clone(),
                    opponent_hero: r.opponent_hero.clone(),
                    result: r.result,
                })
            })
            .collect()
    }

    pub fn combined_hero_matchups(&self) -> Vec<CombinedMatchupRow> {
        self.hero_matchups
            .iter()
            .flat_map(|(hero, rows)| {
                rows.iter().map(move |r| CombinedMatchupRow {
                    hero: hero.clone(),
                    opposing_hero: r.opposing_hero.clone(),
                    wins: r.wins,
                    losses: r.losses,
                    draws: r.draws,
                    matches: r.matches,
                    win_rate: r.win_rate,
                })
            })
            .collect()
    }
}
