use serde::Serialize;

use crate::odds_token::{Direction, OddsToken};
use crate::schema::Sport;
use crate::spread::{LineKind, ResolvedLine};

/// One flat cell of an output record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Null,
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

pub type Fields = Vec<(String, FieldValue)>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentScore {
    pub label: &'static str,
    pub home: i64,
    pub away: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpreadLine {
    pub home: f64,
    pub away: f64,
    pub home_odds: f64,
    pub away_odds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum GameLines {
    SplitSpreadTotal {
        moneyline_label: &'static str,
        home_ml: i64,
        away_ml: i64,
        open: ResolvedLine,
        close: ResolvedLine,
        second_half: ResolvedLine,
    },
    MoneylineTotals {
        home_open_ml: i64,
        away_open_ml: i64,
        home_close_ml: i64,
        away_close_ml: i64,
        spread: Option<SpreadLine>,
        open_total: f64,
        open_total_odds: f64,
        close_total: f64,
        close_total_odds: f64,
    },
}

/// One game, home/away oriented.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRecord {
    pub sport: Sport,
    pub season: i32,
    /// `YYYYMMDD`.
    pub date: u32,
    pub home_team: String,
    pub away_team: String,
    pub segments: Vec<SegmentScore>,
    pub home_final: i64,
    pub away_final: i64,
    pub lines: GameLines,
    /// Columns whose spread/total split fell back to column order.
    pub ambiguous_lines: Vec<LineKind>,
}

impl GameRecord {
    /// Flattened view; keys match [`crate::schema::SportSchema::output_fields`].
    pub fn to_fields(&self) -> Fields {
        let mut out: Fields = vec![
            ("season".into(), i64::from(self.season).into()),
            ("date".into(), i64::from(self.date).into()),
            ("home_team".into(), self.home_team.as_str().into()),
            ("away_team".into(), self.away_team.as_str().into()),
        ];
        for seg in &self.segments {
            out.push((format!("home_{}", seg.label), seg.home.into()));
            out.push((format!("away_{}", seg.label), seg.away.into()));
        }
        out.push(("home_final".into(), self.home_final.into()));
        out.push(("away_final".into(), self.away_final.into()));

        match &self.lines {
            GameLines::SplitSpreadTotal {
                moneyline_label,
                home_ml,
                away_ml,
                open,
                close,
                second_half,
            } => {
                out.push((format!("home_{moneyline_label}"), (*home_ml).into()));
                out.push((format!("away_{moneyline_label}"), (*away_ml).into()));
                out.push(("home_open_spread".into(), open.home_spread.into()));
                out.push(("away_open_spread".into(), open.away_spread.into()));
                out.push(("home_close_spread".into(), close.home_spread.into()));
                out.push(("away_close_spread".into(), close.away_spread.into()));
                out.push(("home_2H_spread".into(), second_half.home_spread.into()));
                out.push(("away_2H_spread".into(), second_half.away_spread.into()));
                out.push(("2H_total".into(), second_half.total.into()));
                out.push(("open_over_under".into(), open.total.into()));
                out.push(("close_over_under".into(), close.total.into()));
            }
            GameLines::MoneylineTotals {
                home_open_ml,
                away_open_ml,
                home_close_ml,
                away_close_ml,
                spread,
                open_total,
                open_total_odds,
                close_total,
                close_total_odds,
            } => {
                out.push(("home_open_ml".into(), (*home_open_ml).into()));
                out.push(("away_open_ml".into(), (*away_open_ml).into()));
                out.push(("home_close_ml".into(), (*home_close_ml).into()));
                out.push(("away_close_ml".into(), (*away_close_ml).into()));
                if let Some(line) = spread {
                    out.push(("home_close_spread".into(), line.home.into()));
                    out.push(("away_close_spread".into(), line.away.into()));
                    out.push(("home_close_spread_odds".into(), line.home_odds.into()));
                    out.push(("away_close_spread_odds".into(), line.away_odds.into()));
                }
                out.push(("open_over_under".into(), (*open_total).into()));
                out.push(("open_over_under_odds".into(), (*open_total_odds).into()));
                out.push(("close_over_under".into(), (*close_total).into()));
                out.push(("close_over_under_odds".into(), (*close_total_odds).into()));
            }
        }
        out
    }

    pub fn field(&self, name: &str) -> Option<FieldValue> {
        field_of(self.to_fields(), name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Away,
    Home,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Away => "away",
            Side::Home => "home",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookOdds {
    pub book: &'static str,
    pub odds: OddsToken,
}

/// One team's view of a game, used where the output is team-centric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRecord {
    pub scrape_date: u32,
    pub season: i32,
    pub game_index: usize,
    pub team_type: Side,
    pub team_name: String,
    pub team_score: i64,
    pub opponent_name: String,
    pub opponent_score: i64,
    /// Names are the `Team1`/`Team2` placeholders.
    pub unparsed: bool,
    pub opener: OddsToken,
    pub books: Vec<BookOdds>,
}

impl TeamRecord {
    pub fn to_fields(&self) -> Fields {
        let mut out: Fields = vec![
            ("scrape_date".into(), i64::from(self.scrape_date).into()),
            ("season".into(), i64::from(self.season).into()),
            ("game_index".into(), (self.game_index as i64).into()),
            ("team_type".into(), self.team_type.as_str().into()),
            ("team_name".into(), self.team_name.as_str().into()),
            ("team_score".into(), self.team_score.into()),
            ("opponent_name".into(), self.opponent_name.as_str().into()),
            ("opponent_score".into(), self.opponent_score.into()),
            ("unparsed".into(), FieldValue::Bool(self.unparsed)),
        ];
        push_token(&mut out, "opener", &self.opener);
        for book in &self.books {
            push_token(&mut out, book.book, &book.odds);
        }
        out
    }

    pub fn field(&self, name: &str) -> Option<FieldValue> {
        field_of(self.to_fields(), name)
    }
}

fn push_token(out: &mut Fields, prefix: &str, token: &OddsToken) {
    let direction = match token.direction {
        Direction::None => FieldValue::Null,
        d => d.as_str().into(),
    };
    out.push((format!("{prefix}_direction"), direction));
    out.push((format!("{prefix}_line"), token.line.into()));
    out.push((format!("{prefix}_price"), token.price.map(i64::from).into()));
}

fn field_of(fields: Fields, name: &str) -> Option<FieldValue> {
    fields.into_iter().find(|(k, _)| k == name).map(|(_, v)| v)
}
