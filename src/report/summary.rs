use crate::coverage::discovery::DiscoveryOutcome;
use crate::coverage::endpoints::CoverageUrl;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every published round was read.
    Complete,
    /// Discovery was cut short by a fetch or page error, or by a page whose rows
    /// could not be read; output covers the rounds before it.
    Partial,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub base_url: String,
    pub event_slug: String,
    pub status: RunStatus,
    pub rounds_processed: usize,
    pub last_round: Option<u32>,
    pub matches: usize,
    pub skipped_rows: usize,
    pub stopped_at_round: u32,
    pub stop_reason: String,
    pub generated_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn new(url: &CoverageUrl, outcome: &DiscoveryOutcome) -> Self {
        let status = if outcome.is_complete() {
            RunStatus::Complete
        } else {
            RunStatus::Partial
        };

        RunSummary {
            base_url: url.base().to_string(),
            event_slug: url.event_slug().to_string(),
            status,
            rounds_processed: outcome.rounds_processed(),
            last_round: outcome.rounds.last().map(|r| r.round),
            matches: outcome.records.len(),
            skipped_rows: outcome.skipped_rows(),
            stopped_at_round: outcome.stop.round(),
            stop_reason: outcome.stop.describe(),
            generated_at: Utc::now(),
        }
    }
}
