use std::collections::BTreeSet;

/// Hero key used when the page did not say what a player piloted.
pub const UNKNOWN_HERO: &str = "Unknown";

pub fn hero_key(hero: &Option<String>) -> String {
    hero.clone().unwrap_or_else(|| UNKNOWN_HERO.to_string())
}

/// One match from a single player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerResult {
    Win,
    Loss,
    Draw,
    Bye,
}

impl PlayerResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerResult::Win => "Win",
            PlayerResult::Loss => "Loss",
            PlayerResult::Draw => "Draw",
            PlayerResult::Bye => "Bye",
        }
    }
}

/// Win/loss/draw counters; byes count as wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
}

impl Tally {
    pub fn add(&mut self, result: PlayerResult) {
        match result {
            PlayerResult::Win | PlayerResult::Bye => self.wins += 1,
            PlayerResult::Loss => self.losses += 1,
            PlayerResult::Draw => self.draws += 1,
        }
    }

    pub fn matches(&self) -> usize {
        self.wins + self.losses + self.draws
    }

    /// Draws count in the denominator only.
    pub fn win_rate(&self) -> f64 {
        let matches = self.matches();
        if matches == 0 {
            0.0
        } else {
            self.wins as f64 / matches as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerMatch {
    pub round: u32,
    /// `None` for a bye.
    pub opponent: Option<String>,
    pub hero: String,
    pub opponent_hero: Option<String>,
    pub result: PlayerResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStats {
    pub name: String,
    pub record: Tally,
    pub byes: usize,
    pub heroes_played: BTreeSet<String>,
    pub match_history: Vec<PlayerMatch>,
}

impl PlayerStats {
    pub fn new(name: String) -> Self {
        PlayerStats {
            name,
            record: Tally::default(),
            byes: 0,
            heroes_played: BTreeSet::new(),
            match_history: Vec::new(),
        }
    }

    pub fn add_match(&mut self, entry: PlayerMatch) {
        self.record.add(entry.result);
        if entry.result == PlayerResult::Bye {
            self.byes += 1;
        }
        self.heroes_played.insert(entry.hero.clone());
        self.match_history.push(entry);
    }

    pub fn matches_played(&self) -> usize {
        self.record.matches()
    }

    pub fn win_rate(&self) -> f64 {
        self.record.win_rate()
    }

    pub fn heroes_label(&self) -> String {
        self.heroes_played
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(round: u32, hero: &str, result: PlayerResult) -> PlayerMatch {
        PlayerMatch {
            round,
            opponent: Some("Opp".to_string()),
            hero: hero.to_string(),
            opponent_hero: Some("Ninja".to_string()),
            result,
        }
    }

    #[test]
    fn tallies_results_and_heroes() {
        let mut stats = PlayerStats::new("Alice".to_string());
        stats.add_match(entry(1, "Brute", PlayerResult::Win));
        stats.add_match(entry(2, "Brute", PlayerResult::Draw));
        stats.add_match(entry(3, "Guardian", PlayerResult::Loss));
        stats.add_match(entry(4, "Guardian", PlayerResult::Bye));

        assert_eq!(stats.record, Tally { wins: 2, losses: 1, draws: 1 });
        assert_eq!(stats.byes, 1);
        assert_eq!(stats.matches_played(), 4);
        assert_eq!(stats.win_rate(), 0.5);
        assert_eq!(stats.heroes_label(), "Brute, Guardian");
    }

    #[test]
    fn empty_win_rate_is_zero() {
        assert_eq!(Tally::default().win_rate(), 0.0);
    }
}
