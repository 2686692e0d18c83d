use super::models::{MatchRecord, Outcome, ParsedPage, BYE};
use crate::error::PageStructureError;
use scraper::{CaseSensitivity, ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

const WINNER_CLASS: &str = "tournament-coverage__player--winner";

static COVERAGE_LAYOUT: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"[class*="tournament-coverage"]"#));
static MATCH_ROW: LazyLock<Selector> =
    LazyLock::new(|| selector("div.tournament-coverage__row--results"));
static PLAYER: LazyLock<Selector> = LazyLock::new(|| selector("div.tournament-coverage__player"));
static PLAYER_NAME: LazyLock<Selector> =
    LazyLock::new(|| selector(".tournament-coverage__player-name"));
static FIRST_SPAN: LazyLock<Selector> = LazyLock::new(|| selector("span"));
static HERO: LazyLock<Selector> =
    LazyLock::new(|| selector("div.tournament-coverage__player-hero-and-deck"));
static RESULT_MARKER: LazyLock<Selector> =
    LazyLock::new(|| selector(".tournament-coverage__result"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|_| unreachable!("invalid static selector {css}"))
}

/// One player cell of a match row.
#[derive(Debug)]
struct Side {
    name: Option<String>,
    hero: Option<String>,
    winner: bool,
}

impl Side {
    fn read(el: ElementRef<'_>) -> Side {
        let name = el
            .select(&PLAYER_NAME)
            .next()
            .or_else(|| el.select(&FIRST_SPAN).next())
            .and_then(collapsed_text);
        let hero = el.select(&HERO).next().and_then(collapsed_text);
        let winner = el
            .value()
            .has_class(WINNER_CLASS, CaseSensitivity::CaseSensitive);

        Side { name, hero, winner }
    }

    fn is_bye(&self) -> bool {
        self.name
            .as_deref()
            .map(|n| n.eq_ignore_ascii_case(BYE))
            .unwrap_or(false)
    }
}

/// Concatenated text of an element with runs of whitespace collapsed; `None` if blank.
fn collapsed_text(el: ElementRef<'_>) -> Option<String> {
    let raw: String = el.text().collect();
    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Turns one round-results page into match records, in page order.
#[derive(Debug, Default, Clone, Copy)]
pub struct RoundPageParser;

impl RoundPageParser {
    pub fn new() -> Self {
        RoundPageParser
    }

    pub fn parse(&self, round: u32, html: &str) -> Result<ParsedPage, PageStructureError> {
        let document = Html::parse_document(html);

        if document.select(&COVERAGE_LAYOUT).next().is_none() {
            return Err(PageStructureError::UnrecognizedLayout {
                reason: "no tournament-coverage elements on page".to_string(),
            });
        }

        let mut page = ParsedPage::default();
        for row in document.select(&MATCH_ROW) {
            match parse_row(round, row) {
                Some(record) => page.matches.push(record),
                None => page.skipped_rows += 1,
            }
        }

        debug!(
            round,
            matches = page.matches.len(),
            skipped = page.skipped_rows,
            "parsed round page"
        );
        Ok(page)
    }
}

fn parse_row(round: u32, row: ElementRef<'_>) -> Option<MatchRecord> {
    let sides: Vec<Side> = row.select(&PLAYER).map(Side::read).collect();
    let marker = row
        .select(&RESULT_MARKER)
        .next()
        .and_then(collapsed_text)
        .and_then(|text| Outcome::from_marker(&text));

    // A lone player, or one listed against "BYE", received the bye.
    let mut players: Vec<Side> = sides.into_iter().filter(|s| !s.is_bye()).collect();
    if players.len() == 1 {
        let player = players.remove(0);
        return player
            .name
            .map(|name| MatchRecord::bye(round, name, player.hero));
    }

    if players.len() != 2 || marker == Some(Outcome::Bye) {
        return None;
    }

    let b = players.pop()?;
    let a = players.pop()?;
    let (player_a, player_b) = (a.name?, b.name?);

    let result = match (marker, a.winner, b.winner) {
        (Some(Outcome::Draw), _, _) => Outcome::Draw,
        (_, true, true) => return None,
        (_, true, false) => Outcome::AWin,
        (_, false, true) => Outcome::BWin,
        (_, false, false) => Outcome::Draw,
    };

    Some(MatchRecord::new(
        round, player_a, a.hero, player_b, b.hero, result,
    ))
}
