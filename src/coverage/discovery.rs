use super::client::PageFetcher;
use super::endpoints::CoverageUrl;
use super::models::MatchRecord;
use super::parser::RoundPageParser;
use crate::error::{FetchError, PageStructureError, UrlValidationError};
use tracing::{info, warn};

/// Why discovery stopped, and at which round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The round page loaded but listed no matches.
    EmptyRound { round: u32 },
    /// The round page had match rows, but none of them could be read.
    UnreadableRows { round: u32, skipped_rows: usize },
    /// The round page does not exist.
    NotFound { round: u32 },
    FetchFailed { round: u32, error: FetchError },
    PageStructure { round: u32, error: PageStructureError },
    /// Round numbers ran out after `round`, the last one processed.
    RoundLimit { round: u32 },
}

impl StopReason {
    pub fn round(&self) -> u32 {
        match self {
            StopReason::EmptyRound { round }
            | StopReason::UnreadableRows { round, .. }
            | StopReason::NotFound { round }
            | StopReason::FetchFailed { round, .. }
            | StopReason::PageStructure { round, .. }
            | StopReason::RoundLimit { round } => *round,
        }
    }

    /// Rows dropped on the page that stopped discovery.
    pub fn skipped_rows(&self) -> usize {
        match self {
            StopReason::UnreadableRows { skipped_rows, .. } => *skipped_rows,
            _ => 0,
        }
    }

    /// True when the event simply ran out of rounds.
    pub fn is_exhausted(&self) -> bool {
        matches!(
            self,
            StopReason::EmptyRound { .. } | StopReason::NotFound { .. }
        )
    }

    pub fn describe(&self) -> String {
        match self {
            StopReason::EmptyRound { round } => format!("round {} has no matches", round),
            StopReason::UnreadableRows {
                round,
                skipped_rows,
            } => format!("round {} has {} rows and none could be read", round, skipped_rows),
            StopReason::NotFound { round } => format!("round {} not published", round),
            StopReason::FetchFailed { round, error } => {
                format!("round {} could not be fetched: {}", round, error)
            }
            StopReason::PageStructure { round, error } => {
                format!("round {} page unreadable: {}", round, error)
            }
            StopReason::RoundLimit { round } => format!("no round number after {}", round),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSummary {
    pub round: u32,
    pub matches: usize,
    pub skipped_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOutcome {
    pub records: Vec<MatchRecord>,
    pub rounds: Vec<RoundSummary>,
    pub stop: StopReason,
}

impl DiscoveryOutcome {
    pub fn rounds_processed(&self) -> usize {
        self.rounds.len()
    }

    pub fn skipped_rows(&self) -> usize {
        self.rounds.iter().map(|r| r.skipped_rows).sum::<usize>() + self.stop.skipped_rows()
    }

    pub fn is_complete(&self) -> bool {
        self.stop.is_exhausted()
    }
}

/// Progress notifications emitted while walking the rounds.
#[derive(Debug, Clone, Copy)]
pub enum DiscoveryProgress<'a> {
    Fetching { round: u32, url: &'a str },
    Parsed { round: u32, matches: usize },
}

pub struct RoundDiscoverer<F> {
    fetcher: F,
    parser: RoundPageParser,
}

impl<F: PageFetcher> RoundDiscoverer<F> {
    pub fn new(fetcher: F) -> Self {
        RoundDiscoverer {
            fetcher,
            parser: RoundPageParser::new(),
        }
    }

    /// Validates `raw` before touching the network, then discovers every round.
    pub fn discover_url(&self, raw: &str) -> Result<DiscoveryOutcome, UrlValidationError> {
        let base = CoverageUrl::parse(raw)?;
        Ok(self.discover(&base))
    }

    pub fn discover(&self, base: &CoverageUrl) -> DiscoveryOutcome {
        self.discover_with(base, |_| {})
    }

    /// Fetches rounds 1, 2, ... until one is missing, empty, or unreadable.
    /// Everything gathered before that round is returned.
    pub fn discover_with<P>(&self, base: &CoverageUrl, mut progress: P) -> DiscoveryOutcome
    where
        P: FnMut(DiscoveryProgress<'_>),
    {
        let mut records = Vec::new();
        let mut rounds = Vec::new();
        let mut round: u32 = 1;

        let stop = loop {
            let url = base.round_url(round);
            progress(DiscoveryProgress::Fetching { round, url: &url });

            let html = match self.fetcher.fetch(&url) {
                Ok(html) => html,
                Err(error) if error.is_not_found() => break StopReason::NotFound { round },
                Err(error) => break StopReason::FetchFailed { round, error },
            };

            let page = match self.parser.parse(round, &html) {
                Ok(page) => page,
                Err(error) => break StopReason::PageStructure { round, error },
            };

            if page.is_empty() {
                if page.skipped_rows > 0 {
                    break StopReason::UnreadableRows {
                        round,
                        skipped_rows: page.skipped_rows,
                    };
                }
                break StopReason::EmptyRound { round };
            }

            progress(DiscoveryProgress::Parsed {
                round,
                matches: page.matches.len(),
            });
            rounds.push(RoundSummary {
                round,
                matches: page.matches.len(),
                skipped_rows: page.skipped_rows,
            });
            records.extend(page.matches);

            round = match round.checked_add(1) {
                Some(next) => next,
                None => break StopReason::RoundLimit { round },
            };
        };

        if stop.is_exhausted() {
            info!(rounds = rounds.len(), reason = %stop.describe(), "discovery finished");
        } else {
            warn!(rounds = rounds.len(), reason = %stop.describe(), "discovery stopped early");
        }

        DiscoveryOutcome {
            records,
            rounds,
            stop,
        }
    }
}
