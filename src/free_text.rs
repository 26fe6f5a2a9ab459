//! Best-effort split of a one-cell game description into two (team, score)
//! sides, e.g. `"Duke 75 - North Carolina 70"`.
//!
//! Rendered odds pages sometimes collapse both participants and their scores
//! into a single string. The format is not well defined, so this is a
//! heuristic: it prefers an explicit separator, then a score-shaped token
//! boundary, then a plain midpoint split. When nothing usable comes out it
//! returns the `Team1`/`Team2` placeholders with `parsed == false`; callers must
//! treat those as "unparsed", never as real team names.

use serde::Serialize;

pub const SENTINEL_AWAY: &str = "Team1";
pub const SENTINEL_HOME: &str = "Team2";

const SEPARATORS: [&str; 2] = [" - ", " @ "];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedMatchup {
    pub away: String,
    pub away_score: i64,
    pub home: String,
    pub home_score: i64,
    pub parsed: bool,
}

impl ParsedMatchup {
    pub fn sentinel() -> Self {
        Self {
            away: SENTINEL_AWAY.to_string(),
            away_score: 0,
            home: SENTINEL_HOME.to_string(),
            home_score: 0,
            parsed: false,
        }
    }
}

/// First side is the away team, second the home team.
pub fn parse_matchup(text: &str) -> ParsedMatchup {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let Some((first, second)) = split_sides(&text) else {
        return ParsedMatchup::sentinel();
    };
    let (away, away_score) = split_score(&first);
    let (home, home_score) = split_score(&second);
    if !has_letters(&away) || !has_letters(&home) {
        return ParsedMatchup::sentinel();
    }
    ParsedMatchup {
        away,
        away_score,
        home,
        home_score,
        parsed: true,
    }
}

fn split_sides(text: &str) -> Option<(String, String)> {
    let separator = SEPARATORS
        .iter()
        .filter_map(|sep| text.find(sep).map(|at| (at, sep.len())))
        .min_by_key(|(at, _)| *at);
    if let Some((at, len)) = separator {
        return Some((text[..at].to_string(), text[at + len..].to_string()));
    }

    let tokens: Vec<&str> = text.split(' ').filter(|t| !t.is_empty()).collect();
    if tokens.len() < 2 {
        return None;
    }
    let cut = score_boundary(&tokens).unwrap_or(tokens.len() / 2);
    Some((tokens[..cut].join(" "), tokens[cut..].join(" ")))
}

/// Index just past the first score token whose token two positions later is
/// also a score, i.e. `<score> <one-word name> <score>`.
fn score_boundary(tokens: &[&str]) -> Option<usize> {
    (0..tokens.len())
        .find(|&i| is_score(tokens[i]) && tokens.get(i + 2).is_some_and(|t| is_score(t)))
        .map(|i| i + 1)
}

fn split_score(side: &str) -> (String, i64) {
    let side = side.trim();
    if let Some((name, last)) = side.rsplit_once(' ') {
        if let Ok(score) = last.parse::<i64>() {
            return (name.trim().to_string(), score);
        }
    } else if let Ok(score) = side.parse::<i64>() {
        return (String::new(), score);
    }
    (side.to_string(), 0)
}

fn has_letters(name: &str) -> bool {
    name.chars().any(char::is_alphabetic)
}

fn is_score(token: &str) -> bool {
    token.parse::<u32>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sides(m: &ParsedMatchup) -> (&str, i64, &str, i64) {
        (m.away.as_str(), m.away_score, m.home.as_str(), m.home_score)
    }

    #[test]
    fn explicit_separator() {
        let m = parse_matchup("Duke 75 - North Carolina 70");
        assert!(m.parsed);
        assert_eq!(sides(&m), ("Duke", 75, "North Carolina", 70));

        let at = parse_matchup("Saint Mary's 61 @ Gonzaga 77");
        assert_eq!(sides(&at), ("Saint Mary's", 61, "Gonzaga", 77));
    }

    #[test]
    fn earliest_separator_wins() {
        let m = parse_matchup("Texas A&M - CC 55 @ Houston 70");
        assert_eq!(m.away, "Texas A&M");
        assert_eq!(m.home, "CC 55 @ Houston");
        assert_eq!(m.home_score, 70);
    }

    #[test]
    fn score_boundary_without_separator() {
        let m = parse_matchup("Kansas 80 Iowa State 71");
        assert_eq!(sides(&m), ("Kansas", 80, "Iowa State", 71));

        let m = parse_matchup("  Penn   State 64 UCLA 70 ");
        assert_eq!(sides(&m), ("Penn State", 64, "UCLA", 70));
    }

    #[test]
    fn multi_word_second_name_falls_back_to_midpoint() {
        let m = parse_matchup("Kansas 80 Iowa State Cyclones 71");
        assert!(m.parsed);
        assert_eq!(sides(&m), ("Kansas 80 Iowa", 0, "State Cyclones", 71));
    }

    #[test]
    fn midpoint_fallback_without_scores() {
        let m = parse_matchup("Purdue Indiana");
        assert!(m.parsed);
        assert_eq!(sides(&m), ("Purdue", 0, "Indiana", 0));
    }

    #[test]
    fn sentinel_when_nothing_splits() {
        assert_eq!(parse_matchup(""), ParsedMatchup::sentinel());
        assert_eq!(parse_matchup("Villanova"), ParsedMatchup::sentinel());
        assert_eq!(parse_matchup(" - Marquette 70"), ParsedMatchup::sentinel());
        assert_eq!(parse_matchup("75 - 70"), ParsedMatchup::sentinel());
        assert!(!parse_matchup("Villanova").parsed);
        assert_eq!(parse_matchup("").away, SENTINEL_AWAY);
    }
}
