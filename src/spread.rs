//! Spread/total disambiguation for the two-row archives.
//!
//! Football, basketball and college basketball print one number per team in
//! each odds column: the favorite's row carries the point spread and the other
//! row carries the game total. Nothing in the column says which is which, so
//! the smaller magnitude is taken as the spread and the moneylines decide whose
//! side of it each team is on.

use serde::Serialize;

/// Which odds column a resolution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Open,
    Close,
    SecondHalf,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedLine {
    pub home_spread: f64,
    pub away_spread: f64,
    pub total: f64,
    /// Both candidates had the same magnitude; column order broke the tie.
    pub ambiguous: bool,
}

/// Home is the favorite when its moneyline is algebraically smaller.
pub fn home_is_favorite(home_ml: i64, away_ml: i64) -> bool {
    home_ml < away_ml
}

/// Resolve one odds column. `away_value`/`home_value` are the sanitized cells
/// of the away and home rows.
pub fn resolve_line(away_value: f64, home_value: f64, home_ml: i64, away_ml: i64) -> ResolvedLine {
    let (spread, total, ambiguous) = if away_value.abs() < home_value.abs() {
        (away_value, home_value, false)
    } else if home_value.abs() < away_value.abs() {
        (home_value, away_value, false)
    } else {
        (away_value, home_value, true)
    };

    let magnitude = spread.abs();
    let home_spread = if home_is_favorite(home_ml, away_ml) {
        -magnitude
    } else {
        magnitude
    };
    // `+ 0.0` folds -0.0 into 0.0 for pick'em lines.
    ResolvedLine {
        home_spread: home_spread + 0.0,
        away_spread: -home_spread + 0.0,
        total,
        ambiguous,
    }
}
