//! Normalization of scraped historical sports-betting tables.
//!
//! Raw rows come from archived odds pages (one unit per season, or per scrape
//! date for the college second-half pages). [`engine::NormalizationEngine`]
//! pairs them into games, cleans sentinel tokens, resolves spread versus total
//! and emits flat [`record::GameRecord`]s or [`record::TeamRecord`]s.

pub mod config;
pub mod engine;
pub mod error;
pub mod free_text;
pub mod logging;
pub mod odds_token;
pub mod pairing;
pub mod record;
pub mod sanitize;
pub mod schema;
pub mod season;
pub mod spread;
pub mod translate;
