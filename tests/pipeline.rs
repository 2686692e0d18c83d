use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use fab_coverage::analysis::aggregator::StatsAggregator;
use fab_coverage::analysis::meta::{hero_rankings, polarized_matchups};
use fab_coverage::analysis::player_stats::{Tally, UNKNOWN_HERO};
use fab_coverage::coverage::client::PageFetcher;
use fab_coverage::coverage::discovery::{RoundDiscoverer, StopReason};
use fab_coverage::coverage::endpoints::CoverageUrl;
use fab_coverage::coverage::models::Outcome;
use fab_coverage::error::{FetchError, UrlValidationError};
use fab_coverage::report::summary::{RunStatus, RunSummary};
use fab_coverage::report::tables::ReportTables;
use fab_coverage::report::writer::{CsvReportWriter, ReportWriter};
use pretty_assertions::assert_eq;

const BASE: &str = "https://fabtcg.com/en/coverage/test-event/results/";

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

/// Serves fixture pages by round URL; anything else is a 404.
struct FixtureFetcher {
    pages: HashMap<String, Result<String, FetchError>>,
}

impl FixtureFetcher {
    fn new(rounds: &[(u32, Result<String, FetchError>)]) -> Self {
        let pages = rounds
            .iter()
            .map(|(round, page)| (format!("{}{}/", BASE, round), page.clone()))
            .collect();
        FixtureFetcher { pages }
    }
}

impl PageFetcher for FixtureFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.pages.get(url).cloned().unwrap_or_else(|| {
            Err(FetchError::NotFound {
                url: url.to_string(),
            })
        })
    }
}

fn two_round_event() -> FixtureFetcher {
    FixtureFetcher::new(&[
        (1, Ok(read_fixture("round_1.html"))),
        (2, Ok(read_fixture("round_2.html"))),
        (3, Ok(read_fixture("round_empty.html"))),
    ])
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fab_coverage_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn discovers_fixture_rounds_until_empty_page() {
    let fetcher = two_round_event();
    let outcome = RoundDiscoverer::new(&fetcher).discover(&CoverageUrl::parse(BASE).unwrap());

    assert_eq!(outcome.stop, StopReason::EmptyRound { round: 3 });
    assert_eq!(outcome.rounds_processed(), 2);
    assert_eq!(outcome.records.len(), 6);
    assert_eq!(outcome.skipped_rows(), 1);

    let results: Vec<(u32, &str, Outcome)> = outcome
        .records
        .iter()
        .map(|r| (r.round, r.player_a.as_str(), r.result))
        .collect();
    assert_eq!(
        results,
        vec![
            (1, "Alice", Outcome::AWin),
            (1, "Carol", Outcome::Bye),
            (1, "Đorđe Müller", Outcome::BWin),
            (2, "Alice", Outcome::Draw),
            (2, "Eve", Outcome::BWin),
            (2, "Đorđe Müller", Outcome::Bye),
        ]
    );
}

#[test]
fn aggregates_fixture_event() {
    let fetcher = two_round_event();
    let outcome = RoundDiscoverer::new(&fetcher).discover(&CoverageUrl::parse(BASE).unwrap());
    let stats = StatsAggregator::aggregate(&outcome.records);

    let record = |name: &str| stats.player(name).unwrap().record;
    assert_eq!(record("Alice"), Tally { wins: 1, losses: 0, draws: 1 });
    assert_eq!(record("Bob"), Tally { wins: 1, losses: 1, draws: 0 });
    assert_eq!(record("Carol"), Tally { wins: 1, losses: 0, draws: 1 });
    assert_eq!(record("Đorđe Müller"), Tally { wins: 1, losses: 1, draws: 0 });
    assert_eq!(record("Eve"), Tally { wins: 1, losses: 1, draws: 0 });

    let ninja = stats.hero("Ninja").unwrap();
    assert_eq!(ninja.record, Tally { wins: 2, losses: 1, draws: 1 });
    assert_eq!(ninja.byes, 2);
    assert_eq!(ninja.matchup_table.len(), 2);

    let unknown = stats.hero(UNKNOWN_HERO).unwrap();
    assert_eq!(unknown.matchup_table["Ninja"], Tally { wins: 1, losses: 0, draws: 0 });
    assert_eq!(unknown.matchup_table["Guardian"], Tally { wins: 0, losses: 1, draws: 0 });

    let total_wins: usize = stats.players.values().map(|p| p.record.wins).sum();
    assert_eq!(total_wins, 5);
}

#[test]
fn writes_every_table() {
    let fetcher = two_round_event();
    let url = CoverageUrl::parse(BASE).unwrap();
    let outcome = RoundDiscoverer::new(&fetcher).discover(&url);
    let stats = StatsAggregator::aggregate(&outcome.records);
    let tables = ReportTables::build(
        &outcome.records,
        &stats,
        &hero_rankings(&stats, 1),
        &polarized_matchups(&stats, 60.0, 1),
    );
    let summary = RunSummary::new(&url, &outcome);

    let dir = scratch_dir("writes_every_table");
    let writer = CsvReportWriter::new(&dir);
    let written = writer.write(&tables, &summary).unwrap();
    assert!(written.iter().all(|p| p.exists()));

    let matches = fs::read_to_string(dir.join("match_results.csv")).unwrap();
    let mut lines = matches.lines();
    assert_eq!(lines.next(), Some("round,player_a,player_b,hero_a,hero_b,result"));
    assert_eq!(lines.next(), Some("1,Alice,Bob,Brute,Guardian,A_WIN"));
    assert_eq!(lines.next(), Some("1,Carol,BYE,Ninja,,BYE"));
    assert_eq!(lines.next(), Some("1,Đorđe Müller,Eve,Ninja,Unknown,B_WIN"));

    let players = fs::read_to_string(dir.join("player_stats.csv")).unwrap();
    assert!(players.starts_with(
        "player,matches_played,wins,losses,draws,byes,win_rate,heroes_played\n"
    ));
    assert!(players.contains("Alice,2,1,0,1,0,50.0,Brute\n"));

    let heroes = fs::read_to_string(dir.join("hero_stats.csv")).unwrap();
    assert!(heroes.contains("Ninja,4,2,1,1,2,50.0\n"));

    let alice = fs::read_to_string(dir.join("player_details").join("Alice_details.csv")).unwrap();
    assert_eq!(
        alice,
        "round,opponent,own_hero,opponent_hero,result\n1,Bob,Brute,Guardian,Win\n2,Carol,Brute,Ninja,Draw\n"
    );
    assert!(dir.join("player_details").join("Đorđe_Müller_details.csv").exists());

    let header = |file: &str| {
        fs::read_to_string(dir.join(file))
            .unwrap()
            .lines()
            .next()
            .map(str::to_string)
    };
    assert_eq!(
        header("player_details.csv").as_deref(),
        Some("player,round,opponent,own_hero,opponent_hero,result")
    );
    assert_eq!(
        header("hero_matchups.csv").as_deref(),
        Some("hero,opposing_hero,wins,losses,draws,matches,win_rate")
    );
    assert_eq!(
        header("polarized_matchups.csv").as_deref(),
        Some("hero,opposing_hero,wins,losses,draws,matches,win_rate,deviation")
    );
    assert_eq!(
        header("hero_rankings.csv").as_deref(),
        Some("rank,hero,matches_played,wins,losses,draws,win_rate")
    );

    let combined_details = fs::read_to_string(dir.join("player_details.csv")).unwrap();
    assert!(combined_details.contains("\nAlice,1,Bob,Brute,Guardian,Win\n"));
    let combined_matchups = fs::read_to_string(dir.join("hero_matchups.csv")).unwrap();
    assert!(combined_matchups.contains("\nNinja,Brute,0,0,1,1,0.0\n"));
    let polarized = fs::read_to_string(dir.join("polarized_matchups.csv")).unwrap();
    assert!(polarized.contains("\nUnknown,Ninja,1,0,0,1,100.0,50.0\n"));
    let rankings = fs::read_to_string(dir.join("hero_rankings.csv")).unwrap();
    assert_eq!(rankings.lines().count(), stats.heroes.len() + 1);
    assert!(rankings.lines().nth(1).unwrap().starts_with("1,"));

    let ninja = fs::read_to_string(dir.join("hero_matchups").join("Ninja_matchups.csv")).unwrap();
    assert_eq!(
        ninja,
        "opposing_hero,wins,losses,draws,matches,win_rate\nBrute,0,0,1,1,0.0\nUnknown,0,1,0,1,0.0\n"
    );

    let summary_json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("run_summary.json")).unwrap()).unwrap();
    assert_eq!(summary_json["status"], "complete");
    assert_eq!(summary_json["rounds_processed"], 2);
    assert_eq!(summary_json["skipped_rows"], 1);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn rewriting_the_same_event_is_byte_identical() {
    let fetcher = two_round_event();
    let url = CoverageUrl::parse(BASE).unwrap();
    let outcome = RoundDiscoverer::new(&fetcher).discover(&url);
    let summary = RunSummary::new(&url, &outcome);

    let render = |name: &str| {
        let stats = StatsAggregator::aggregate(&outcome.records);
        let tables = ReportTables::build(&outcome.records, &stats, &hero_rankings(&stats, 1), &[]);
        let dir = scratch_dir(name);
        CsvReportWriter::new(&dir).write(&tables, &summary).unwrap();
        let files = [
            "match_results.csv",
            "player_stats.csv",
            "hero_stats.csv",
            "hero_matchups.csv",
            "hero_rankings.csv",
        ]
            .iter()
            .map(|f| fs::read(dir.join(f)).unwrap())
            .collect::<Vec<_>>();
        let _ = fs::remove_dir_all(&dir);
        files
    };

    assert_eq!(render("idempotent_a"), render("idempotent_b"));
}

#[test]
fn partial_run_still_writes_gathered_rounds() {
    let fetcher = FixtureFetcher::new(&[
        (1, Ok(read_fixture("round_1.html"))),
        (
            2,
            Err(FetchError::Status {
                url: format!("{}2/", BASE),
                code: 503,
            }),
        ),
    ]);
    let url = CoverageUrl::parse(BASE).unwrap();
    let outcome = RoundDiscoverer::new(&fetcher).discover(&url);
    let summary = RunSummary::new(&url, &outcome);
    assert_eq!(summary.status, RunStatus::Partial);
    assert_eq!(summary.rounds_processed, 1);

    let stats = StatsAggregator::aggregate(&outcome.records);
    let tables = ReportTables::build(&outcome.records, &stats, &[], &[]);
    let dir = scratch_dir("partial_run");
    CsvReportWriter::new(&dir).write(&tables, &summary).unwrap();

    let matches = fs::read_to_string(dir.join("match_results.csv")).unwrap();
    assert_eq!(matches.lines().count(), 4);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn zero_rounds_writes_header_only_tables() {
    let fetcher = FixtureFetcher::new(&[]);
    let url = CoverageUrl::parse(BASE).unwrap();
    let outcome = RoundDiscoverer::new(&fetcher).discover(&url);
    let stats = StatsAggregator::aggregate(&outcome.records);
    let tables = ReportTables::build(&outcome.records, &stats, &[], &[]);
    let summary = RunSummary::new(&url, &outcome);
    assert_eq!(summary.status, RunStatus::Complete);

    let dir = scratch_dir("zero_rounds");
    CsvReportWriter::new(&dir).write(&tables, &summary).unwrap();
    assert_eq!(
        fs::read_to_string(dir.join("hero_stats.csv")).unwrap(),
        "hero,matches_played,wins,losses,draws,byes,win_rate\n"
    );
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn rewriting_a_directory_drops_stale_entity_files() {
    let dir = scratch_dir("stale_entities");
    let stale_player = dir.join("player_details").join("Zed_details.csv");
    let stale_hero = dir.join("hero_matchups").join("Wizard_matchups.csv");
    fs::create_dir_all(stale_player.parent().unwrap()).unwrap();
    fs::create_dir_all(stale_hero.parent().unwrap()).unwrap();
    fs::write(&stale_player, "round,opponent,own_hero,opponent_hero,result\n").unwrap();
    fs::write(&stale_hero, "opposing_hero,wins,losses,draws,matches,win_rate\n").unwrap();
    let unrelated = dir.join("notes.txt");
    fs::write(&unrelated, "kept").unwrap();

    let fetcher = two_round_event();
    let url = CoverageUrl::parse(BASE).unwrap();
    let outcome = RoundDiscoverer::new(&fetcher).discover(&url);
    let stats = StatsAggregator::aggregate(&outcome.records);
    let tables = ReportTables::build(&outcome.records, &stats, &[], &[]);
    CsvReportWriter::new(&dir)
        .write(&tables, &RunSummary::new(&url, &outcome))
        .unwrap();

    assert!(!stale_player.exists());
    assert!(!stale_hero.exists());
    assert!(unrelated.exists());
    let players = fs::read_dir(dir.join("player_details")).unwrap().count();
    assert_eq!(players, stats.players.len());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn malformed_url_fails_before_fetching() {
    let fetcher = two_round_event();
    let err = RoundDiscoverer::new(&fetcher)
        .discover_url("https://fabtcg.com/en/coverage/test-event/")
        .unwrap_err();
    assert!(matches!(err, UrlValidationError::MissingResultsSegment(_)));
}
