/// Placeholder the coverage pages use (and the tables print) for a missing opponent.
pub const BYE: &str = "BYE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    AWin,
    BWin,
    Draw,
    Bye,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::AWin => "A_WIN",
            Outcome::BWin => "B_WIN",
            Outcome::Draw => "DRAW",
            Outcome::Bye => "BYE",
        }
    }

    /// Maps an explicit result label from the page. Win/loss labels are not
    /// handled here; the winner is read from the player markup instead.
    pub fn from_marker(raw: &str) -> Option<Outcome> {
        let normalized = raw
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        match normalized.as_str() {
            "bye" => Some(Outcome::Bye),
            "draw" | "tie" | "double loss" | "dl" | "id" | "intentional draw" => {
                Some(Outcome::Draw)
            }
            _ => None,
        }
    }
}

/// One reported match from one round page. A `Bye` result never carries an
/// opponent; use [`MatchRecord::opponent`] rather than reading `player_b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub round: u32,
    pub player_a: String,
    /// `None` when `player_a` received a bye.
    pub player_b: Option<String>,
    pub hero_a: Option<String>,
    pub hero_b: Option<String>,
    pub result: Outcome,
}

impl MatchRecord {
    /// A played match. Passing `Outcome::Bye` yields the same record as
    /// [`MatchRecord::bye`]; the listed opponent is dropped.
    pub fn new(
        round: u32,
        player_a: impl Into<String>,
        hero_a: Option<String>,
        player_b: impl Into<String>,
        hero_b: Option<String>,
        result: Outcome,
    ) -> Self {
        if result == Outcome::Bye {
            return MatchRecord::bye(round, player_a, hero_a);
        }
        MatchRecord {
            round,
            player_a: player_a.into(),
            player_b: Some(player_b.into()),
            hero_a,
            hero_b,
            result,
        }
    }

    pub fn bye(round: u32, player: impl Into<String>, hero: Option<String>) -> Self {
        MatchRecord {
            round,
            player_a: player.into(),
            player_b: None,
            hero_a: hero,
            hero_b: None,
            result: Outcome::Bye,
        }
    }

    /// Records without an opponent count as byes, whatever `result` says.
    pub fn is_bye(&self) -> bool {
        self.opponent().is_none()
    }

    /// The opponent's name and hero, or `None` for a bye. A `Bye` result
    /// wins over a listed `player_b`.
    pub fn opponent(&self) -> Option<(&str, Option<&str>)> {
        match (&self.player_b, self.result) {
            (_, Outcome::Bye) | (None, _) => None,
            (Some(b), _) => Some((b.as_str(), self.hero_b.as_deref())),
        }
    }

    /// `result`, reported as `Bye` whenever there is no opponent.
    pub fn outcome(&self) -> Outcome {
        if self.is_bye() {
            Outcome::Bye
        } else {
            self.result
        }
    }
}

/// Result of parsing one round page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    pub matches: Vec<MatchRecord>,
    /// Match rows that were present but could not be read.
    pub skipped_rows: usize,
}

impl ParsedPage {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
