pub mod aggregator;
pub mod hero_stats;
pub mod meta;
pub mod player_stats;
