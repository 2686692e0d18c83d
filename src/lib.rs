//! Scrapes published round results for a Flesh and Blood coverage event and
//! aggregates them into player and hero statistics.

pub mod analysis;
pub mod config;
pub mod coverage;
pub mod display;
pub mod error;
pub mod report;
