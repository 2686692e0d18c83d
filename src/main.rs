use anyhow::Context;
use clap::Parser;
use fab_coverage::analysis::aggregator::StatsAggregator;
use fab_coverage::analysis::meta::{
    hero_rankings, polarized_matchups, DEFAULT_MIN_HERO_MATCHES, DEFAULT_MIN_MATCHES,
    DEFAULT_POLARIZED_THRESHOLD,
};
use fab_coverage::config::Config;
use fab_coverage::coverage::client::CoverageClient;
use fab_coverage::coverage::discovery::{DiscoveryProgress, RoundDiscoverer};
use fab_coverage::coverage::endpoints::CoverageUrl;
use fab_coverage::display::output::{
    display_error, display_hero_rankings, display_info, display_player_standings,
    display_polarized_matchups, display_run_summary,
};
use fab_coverage::report::summary::{RunStatus, RunSummary};
use fab_coverage::report::tables::ReportTables;
use fab_coverage::report::writer::{CsvReportWriter, ReportWriter};
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Exit code when output was written but discovery was cut short.
const EXIT_PARTIAL: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "FaB Coverage")]
#[command(about = "Scrape tournament round results and build player and hero stats", long_about = None)]
struct Args {
    /// Coverage results URL, e.g. https://fabtcg.com/en/coverage/calling-bologna-2025/results/
    url: String,

    /// Output directory (default: $FAB_OUTPUT_DIR or tournament_results)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of players and heroes to show in the terminal summary
    #[arg(short, long, default_value = "10")]
    top_n: usize,

    /// Win rate (%) at or above which a matchup counts as polarized
    #[arg(long, default_value_t = DEFAULT_POLARIZED_THRESHOLD)]
    polarized_threshold: f64,

    /// Minimum games for a matchup to be considered polarized
    #[arg(long, default_value_t = DEFAULT_MIN_MATCHES)]
    min_matches: usize,

    /// Minimum games for a hero to appear in the hero rankings
    #[arg(long, default_value_t = DEFAULT_MIN_HERO_MATCHES)]
    min_hero_matches: usize,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(RunStatus::Complete) => ExitCode::SUCCESS,
        Ok(RunStatus::Partial) => ExitCode::from(EXIT_PARTIAL),
        Err(e) => {
            display_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "fab_coverage=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> anyhow::Result<RunStatus> {
    let mut config = Config::from_env()?;
    if let Some(output) = args.output {
        config.output_dir = output;
    }

    // Nothing is fetched or written for a malformed URL.
    let url = CoverageUrl::parse(&args.url)?;
    display_info(&format!("Scraping rounds for {}", url.event_slug()));

    let client = CoverageClient::new(&config);
    let discoverer = RoundDiscoverer::new(client);

    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(120));
    let outcome = discoverer.discover_with(&url, |progress| match progress {
        DiscoveryProgress::Fetching { round, .. } => {
            pb.set_message(format!("Fetching round {}...", round))
        }
        DiscoveryProgress::Parsed { round, matches } => {
            pb.println(format!("  Round {}: {} matches", round, matches))
        }
    });
    pb.finish_and_clear();

    let stats = StatsAggregator::aggregate(&outcome.records);
    let rankings = hero_rankings(&stats, args.min_hero_matches);
    let polarized = polarized_matchups(&stats, args.polarized_threshold, args.min_matches);
    let tables = ReportTables::build(&outcome.records, &stats, &rankings, &polarized);
    let summary = RunSummary::new(&url, &outcome);

    let writer = CsvReportWriter::new(&config.output_dir);
    let written = writer
        .write(&tables, &summary)
        .with_context(|| format!("writing report to {}", writer.root().display()))?;
    info!(files = written.len(), "report written");

    display_player_standings(&stats, args.top_n);
    display_hero_rankings(&rankings, args.top_n);
    display_polarized_matchups(&polarized, args.top_n);
    display_run_summary(&summary, &writer.root().display().to_string());

    Ok(summary.status)
}
