use super::summary::RunSummary;
use super::tables::{ReportTables, TableRow};
use crate::error::ReportError;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const MATCH_RESULTS_FILE: &str = "match_results.csv";
pub const PLAYER_STATS_FILE: &str = "player_stats.csv";
pub const HERO_STATS_FILE: &str = "hero_stats.csv";
pub const HERO_MATCHUPS_FILE: &str = "hero_matchups.csv";
pub const PLAYER_DETAILS_FILE: &str = "player_details.csv";
pub const HERO_RANKINGS_FILE: &str = "hero_rankings.csv";
pub const POLARIZED_MATCHUPS_FILE: &str = "polarized_matchups.csv";
pub const RUN_SUMMARY_FILE: &str = "run_summary.json";
pub const PLAYER_DETAILS_DIR: &str = "player_details";
pub const HERO_MATCHUPS_DIR: &str = "hero_matchups";

/// Sink for a finished run.
pub trait ReportWriter {
    /// Persists every table; returns the paths written.
    fn write(&self, tables: &ReportTables, summary: &RunSummary)
        -> Result<Vec<PathBuf>, ReportError>;
}

/// Writes the tables as CSV files under one directory.
pub struct CsvReportWriter {
    root: PathBuf,
}

impl CsvReportWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        CsvReportWriter { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn write_table<R: TableRow>(&self, path: PathBuf, rows: &[R]) -> Result<PathBuf, ReportError> {
        let csv_err = |source| ReportError::Csv {
            path: path.clone(),
            source,
        };

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .map_err(csv_err)?;
        wtr.write_record(R::HEADERS).map_err(csv_err)?;
        for row in rows {
            wtr.serialize(row).map_err(csv_err)?;
        }
        wtr.flush().map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), rows = rows.len(), "wrote table");
        Ok(path)
    }

    fn create_dir(&self, dir: &Path) -> Result<(), ReportError> {
        fs::create_dir_all(dir).map_err(|source| ReportError::Io {
            path: dir.to_path_buf(),
            source,
        })
    }

    /// Empties a per-entity directory so files from an earlier event don't linger.
    fn reset_dir(&self, dir: &Path) -> Result<(), ReportError> {
        if dir.exists() {
            fs::remove_dir_all(dir).map_err(|source| ReportError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            debug!(path = %dir.display(), "cleared previous output");
        }
        self.create_dir(dir)
    }
}

impl ReportWriter for CsvReportWriter {
    fn write(
        &self,
        tables: &ReportTables,
        summary: &RunSummary,
    ) -> Result<Vec<PathBuf>, ReportError> {
        let player_dir = self.root.join(PLAYER_DETAILS_DIR);
        let hero_dir = self.root.join(HERO_MATCHUPS_DIR);
        self.create_dir(&self.root)?;
        self.reset_dir(&player_dir)?;
        self.reset_dir(&hero_dir)?;

        let mut written = vec![
            self.write_table(self.root.join(MATCH_RESULTS_FILE), &tables.matches)?,
            self.write_table(self.root.join(PLAYER_STATS_FILE), &tables.players)?,
            self.write_table(self.root.join(HERO_STATS_FILE), &tables.heroes)?,
            self.write_table(
                self.root.join(PLAYER_DETAILS_FILE),
                &tables.combined_player_details(),
            )?,
            self.write_table(
                self.root.join(HERO_MATCHUPS_FILE),
                &tables.combined_hero_matchups(),
            )?,
            self.write_table(self.root.join(HERO_RANKINGS_FILE), &tables.hero_rankings)?,
            self.write_table(self.root.join(POLARIZED_MATCHUPS_FILE), &tables.polarized)?,
        ];

        let player_stems = unique_stems(tables.player_details.iter().map(|(n, _)| n.as_str()));
        for ((_, rows), stem) in tables.player_details.iter().zip(player_stems) {
            let path = player_dir.join(format!("{}_details.csv", stem));
            written.push(self.write_table(path, rows)?);
        }

        let hero_stems = unique_stems(tables.hero_matchups.iter().map(|(h, _)| h.as_str()));
        for ((_, rows), stem) in tables.hero_matchups.iter().zip(hero_stems) {
            let path = hero_dir.join(format!("{}_matchups.csv", stem));
            written.push(self.write_table(path, rows)?);
        }

        let summary_path = self.root.join(RUN_SUMMARY_FILE);
        let json = serde_json::to_string_pretty(summary)?;
        fs::write(&summary_path, json).map_err(|source| ReportError::Io {
            path: summary_path.clone(),
            source,
        })?;
        written.push(summary_path);

        Ok(written)
    }
}

/// File-name-safe form of a display name: every non-alphanumeric char becomes `_`.
pub fn safe_name(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    if safe.is_empty() {
        "_".to_string()
    } else {
        safe
    }
}

/// Safe names for each input, with `_2`, `_3`, ... added where two collide.
pub fn unique_stems<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut used = HashSet::new();
    names
        .map(|name| {
            let base = safe_name(name);
            let mut candidate = base.clone();
            let mut n = 1;
            while used.contains(&candidate) {
                n += 1;
                candidate = format!("{}_{}", base, n);
            }
            used.insert(candidate.clone());
            candidate
        })
        .collect()
}
