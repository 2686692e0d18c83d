pub mod client;
pub mod discovery;
pub mod endpoints;
pub mod models;
pub mod parser;
