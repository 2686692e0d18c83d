use crate::analysis::aggregator::EventStats;
use crate::analysis::meta::{HeroRanking, PolarizedMatchup};
use crate::report::summary::{RunStatus, RunSummary};
use colored::*;
use std::cmp::Ordering;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct PlayerRow {
    rank: String,
    player: String,
    record: String,
    win_rate: String,
    heroes: String,
}

#[derive(Tabled)]
struct HeroRow {
    rank: String,
    hero: String,
    matches: String,
    record: String,
    win_rate: String,
}

#[derive(Tabled)]
struct MatchupRow {
    hero: String,
    #[tabled(rename = "vs")]
    opponent: String,
    games: String,
    win_rate: String,
}

fn record_label(wins: usize, losses: usize, draws: usize) -> String {
    format!("{}-{}-{}", wins, losses, draws)
}

pub fn display_player_standings(stats: &EventStats, top_n: usize) {
    println!("\n{}", "🏆 PLAYER STANDINGS".bold().cyan());
    println!("{}\n", "=".repeat(70).cyan());

    if stats.players.is_empty() {
        println!("{}", "No matches recorded".yellow());
        return;
    }

    let mut players: Vec<_> = stats.players.values().collect();
    players.sort_by(|a, b| {
        b.record
            .wins
            .cmp(&a.record.wins)
            .then_with(|| {
                b.win_rate()
                    .partial_cmp(&a.win_rate())
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.name.cmp(&b.name))
    });

    let rows: Vec<PlayerRow> = players
        .iter()
        .take(top_n)
        .enumerate()
        .map(|(idx, p)| PlayerRow {
            rank: format!("#{}", idx + 1),
            player: p.name.clone(),
            record: record_label(p.record.wins, p.record.losses, p.record.draws),
            win_rate: format!("{:.1}%", p.win_rate() * 100.0),
            heroes: p.heroes_label(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_hero_rankings(rankings: &[HeroRanking], top_n: usize) {
    println!("\n{}", "⚔️ HERO PERFORMANCE".bold().cyan());
    println!("{}\n", "=".repeat(70).cyan());

    if rankings.is_empty() {
        println!("{}", "No heroes with enough matches".yellow());
        return;
    }

    let rows: Vec<HeroRow> = rankings
        .iter()
        .take(top_n)
        .enumerate()
        .map(|(idx, h)| HeroRow {
            rank: format!("#{}", idx + 1),
            hero: h.hero.clone(),
            matches: h.record.matches().to_string(),
            record: record_label(h.record.wins, h.record.losses, h.record.draws),
            win_rate: format!("{:.1}%", h.win_rate * 100.0),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    if let Some(worst) = rankings.last() {
        if rankings.len() > top_n {
            println!(
                "  {} Lowest: {} at {:.1}% over {} matches",
                "▼".red(),
                worst.hero,
                worst.win_rate * 100.0,
                worst.record.matches()
            );
        }
    }
    println!();
}

pub fn display_polarized_matchups(matchups: &[PolarizedMatchup], top_n: usize) {
    if matchups.is_empty() {
        return;
    }

    println!("\n{}", "🎯 MOST POLARIZED MATCHUPS".bold().cyan());
    println!("{}\n", "=".repeat(70).cyan());

    let rows: Vec<MatchupRow> = matchups
        .iter()
        .take(top_n)
        .map(|m| MatchupRow {
            hero: m.hero.clone(),
            opponent: m.opponent_hero.clone(),
            games: m.record.matches().to_string(),
            win_rate: if m.win_rate >= 50.0 {
                format!("{:.1}%", m.win_rate).green().to_string()
            } else {
                format!("{:.1}%", m.win_rate).red().to_string()
            },
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_run_summary(summary: &RunSummary, output_dir: &str) {
    let rounds = format!(
        "{} round(s), {} match(es)",
        summary.rounds_processed, summary.matches
    );

    match summary.status {
        RunStatus::Complete => {
            display_success(&format!("Processed {} ({})", rounds, summary.stop_reason))
        }
        RunStatus::Partial => display_warning(&format!(
            "Partial run: processed {} before {}",
            rounds, summary.stop_reason
        )),
    }

    if summary.skipped_rows > 0 {
        display_warning(&format!(
            "Skipped {} unreadable match row(s)",
            summary.skipped_rows
        ));
    }

    display_info(&format!("Tables written to {}", output_dir));
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_warning(message: &str) {
    eprintln!("{} {}", "⚠️".yellow(), message);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}
