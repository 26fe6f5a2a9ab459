//! Per-sport table layouts.
//!
//! Every sport is a plain [`SportSchema`] value: which raw column holds which
//! field (optionally changing from a given season on), how rows pair into
//! games, which months belong to the season's first calendar year, and the
//! flat field list its records expose. Sports that share a layout share
//! nothing else; basketball simply builds the same column map as football.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::pairing::{PairingRule, Parity};
use crate::season::{self, DateWindow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sport {
    #[serde(rename = "nfl")]
    Nfl,
    #[serde(rename = "nba")]
    Nba,
    #[serde(rename = "nhl")]
    Nhl,
    #[serde(rename = "mlb")]
    Mlb,
    #[serde(rename = "ncaa")]
    Ncaa,
    #[serde(rename = "ncaa2ndhalf")]
    Ncaa2ndHalf,
}

impl Sport {
    pub const ALL: [Sport; 6] = [
        Sport::Nfl,
        Sport::Nba,
        Sport::Nhl,
        Sport::Mlb,
        Sport::Ncaa,
        Sport::Ncaa2ndHalf,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Sport::Nfl => "nfl",
            Sport::Nba => "nba",
            Sport::Nhl => "nhl",
            Sport::Mlb => "mlb",
            Sport::Ncaa => "ncaa",
            Sport::Ncaa2ndHalf => "ncaa2ndhalf",
        }
    }

    pub fn schema(self) -> SportSchema {
        match self {
            Sport::Nfl => SportSchema::football(Sport::Nfl),
            Sport::Nba => SportSchema::football(Sport::Nba),
            Sport::Nhl => SportSchema::hockey(),
            Sport::Mlb => SportSchema::baseball(),
            Sport::Ncaa => SportSchema::college_basketball(),
            Sport::Ncaa2ndHalf => SportSchema::college_second_half(),
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Sport {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Sport::ALL
            .into_iter()
            .find(|sport| sport.key() == needle)
            .ok_or_else(|| {
                anyhow!("unsupported sport {s:?}, expected nfl, nba, nhl, mlb, ncaa or ncaa2ndhalf")
            })
    }
}

/// Semantic meaning of a raw column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    Role,
    Name,
    /// Quarter, period, half or inning score; zero-based.
    Segment(usize),
    Final,
    /// Spread-or-total columns resolved pairwise.
    Open,
    Close,
    SecondHalf,
    Moneyline,
    OpenMoneyline,
    CloseMoneyline,
    /// Puck line / run line as printed on each row.
    CloseSpread,
    CloseSpreadOdds,
    OpenTotal,
    OpenTotalOdds,
    CloseTotal,
    CloseTotalOdds,
    /// Free-text "Team 75 - Team 70" cell.
    Matchup,
    OpenerAway,
    OpenerHome,
    BookAway(usize),
    BookHome(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    entries: Vec<(Field, usize)>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: Field, column: usize) -> Self {
        self.entries.retain(|(f, _)| *f != field);
        self.entries.push((field, column));
        self
    }

    pub fn get(&self, field: Field) -> Option<usize> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, c)| *c)
    }

    /// Cells a row needs for every mapped field to be addressable.
    pub fn width(&self) -> usize {
        self.entries.iter().map(|(_, c)| c + 1).max().unwrap_or(0)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.entries.iter().map(|(f, _)| *f)
    }
}

/// How a sport's odds columns turn into record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineLayout {
    /// Open/close/second-half columns hold the spread on one row and the total
    /// on the other; a single moneyline column picks the favorite.
    SplitSpreadTotal { moneyline_label: &'static str },
    /// Opening and closing moneylines per row, an optional signed spread line
    /// with its price, and totals read from the home row.
    MoneylineTotals,
    /// One free-text matchup per row plus inline odds tokens.
    FreeText,
}

pub const SPORTSBOOKS: [&str; 6] = [
    "betmgm",
    "fanduel",
    "caesars",
    "bet365",
    "draftkings",
    "betrivers",
];

#[derive(Debug, Clone, PartialEq)]
pub struct SportSchema {
    pub sport: Sport,
    /// `None` for layouts that carry a whole game per row.
    pub pairing: Option<PairingRule>,
    pub layout: LineLayout,
    pub segment_labels: &'static [&'static str],
    columns: ColumnMap,
    /// Replacement map and the first season it applies to.
    shifted: Option<(i32, ColumnMap)>,
    window: DateWindow,
    window_overrides: Vec<(i32, DateWindow)>,
}

const QUARTERS: &[&str] = &["1stQtr", "2ndQtr", "3rdQtr", "4thQtr"];
const PERIODS: &[&str] = &["1stPeriod", "2ndPeriod", "3rdPeriod"];
const HALVES: &[&str] = &["1st", "2nd"];
const INNINGS: &[&str] = &[
    "1stInn", "2ndInn", "3rdInn", "4thInn", "5thInn", "6thInn", "7thInn", "8thInn", "9thInn",
];

/// Hockey and baseball archives gained a spread line column in 2014.
const SPREAD_LINE_FROM: i32 = 2014;

impl SportSchema {
    fn football(sport: Sport) -> Self {
        let columns = segments(ColumnMap::new(), 4, QUARTERS.len())
            .with(Field::Date, 0)
            .with(Field::Name, 3)
            .with(Field::Final, 8)
            .with(Field::Open, 9)
            .with(Field::Close, 10)
            .with(Field::Moneyline, 11)
            .with(Field::SecondHalf, 12);
        Self {
            sport,
            pairing: Some(PairingRule::AdjacentPairParity { away: Parity::Odd }),
            layout: LineLayout::SplitSpreadTotal {
                moneyline_label: "close_ml",
            },
            segment_labels: QUARTERS,
            columns,
            shifted: None,
            window: DateWindow::DEFAULT,
            window_overrides: Vec::new(),
        }
    }

    fn college_basketball() -> Self {
        let columns = segments(ColumnMap::new(), 4, HALVES.len())
            .with(Field::Date, 0)
            .with(Field::Role, 2)
            .with(Field::Name, 3)
            .with(Field::Final, 6)
            .with(Field::Open, 7)
            .with(Field::Close, 8)
            .with(Field::Moneyline, 9)
            .with(Field::SecondHalf, 10);
        Self {
            sport: Sport::Ncaa,
            pairing: Some(PairingRule::RoleTagMatch { column: 2 }),
            layout: LineLayout::SplitSpreadTotal {
                moneyline_label: "ml",
            },
            segment_labels: HALVES,
            columns,
            shifted: None,
            window: DateWindow::DEFAULT,
            window_overrides: Vec::new(),
        }
    }

    fn hockey() -> Self {
        let base = segments(ColumnMap::new(), 4, PERIODS.len())
            .with(Field::Date, 0)
            .with(Field::Name, 3)
            .with(Field::Final, 7)
            .with(Field::OpenMoneyline, 8)
            .with(Field::CloseMoneyline, 9);
        Self {
            sport: Sport::Nhl,
            pairing: Some(PairingRule::AdjacentPairParity { away: Parity::Odd }),
            layout: LineLayout::MoneylineTotals,
            segment_labels: PERIODS,
            columns: totals_from(base.clone(), 10),
            shifted: Some((SPREAD_LINE_FROM, spread_line_from(base, 10))),
            window: DateWindow::DEFAULT,
            window_overrides: vec![(2020, DateWindow::SHORTENED)],
        }
    }

    fn baseball() -> Self {
        let base = segments(ColumnMap::new(), 5, INNINGS.len())
            .with(Field::Date, 0)
            .with(Field::Name, 3)
            .with(Field::Final, 14)
            .with(Field::OpenMoneyline, 15)
            .with(Field::CloseMoneyline, 16);
        Self {
            sport: Sport::Mlb,
            pairing: Some(PairingRule::AdjacentPairParity { away: Parity::Odd }),
            layout: LineLayout::MoneylineTotals,
            segment_labels: INNINGS,
            columns: totals_from(base.clone(), 17),
            shifted: Some((SPREAD_LINE_FROM, spread_line_from(base, 17))),
            window: DateWindow::BASEBALL,
            window_overrides: Vec::new(),
        }
    }

    fn college_second_half() -> Self {
        let mut columns = ColumnMap::new()
            .with(Field::Matchup, 0)
            .with(Field::OpenerAway, 1)
            .with(Field::OpenerHome, 2);
        for book in 0..SPORTSBOOKS.len() {
            columns = columns
                .with(Field::BookAway(book), 3 + book * 2)
                .with(Field::BookHome(book), 4 + book * 2);
        }
        Self {
            sport: Sport::Ncaa2ndHalf,
            pairing: None,
            layout: LineLayout::FreeText,
            segment_labels: &[],
            columns,
            shifted: None,
            window: DateWindow::DEFAULT,
            window_overrides: Vec::new(),
        }
    }

    /// Replace the column layout for every season, e.g. for an archive that
    /// inserted or dropped a column.
    pub fn with_columns(mut self, columns: ColumnMap) -> Self {
        if let (Some(PairingRule::RoleTagMatch { column }), Some(role)) =
            (self.pairing.as_mut(), columns.get(Field::Role))
        {
            *column = role;
        }
        self.columns = columns;
        self.shifted = None;
        self
    }

    /// Column map in effect for `season`.
    pub fn columns(&self, season: i32) -> &ColumnMap {
        match &self.shifted {
            Some((from, map)) if season >= *from => map,
            _ => &self.columns,
        }
    }

    pub fn date_window(&self, season: i32) -> DateWindow {
        self.window_overrides
            .iter()
            .find(|(year, _)| *year == season)
            .map(|(_, w)| *w)
            .unwrap_or(self.window)
    }

    /// Season a calendar date belongs to. Per-season window overrides only
    /// describe how archive date cells roll over, so the sport's base window
    /// decides here.
    pub fn season_for_date(&self, date: NaiveDate) -> i32 {
        season::season_for_date(date, self.window)
    }

    /// Flat field names, in order, of the records this sport produces.
    pub fn output_fields(&self, season: i32) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        if self.layout == LineLayout::FreeText {
            out.extend(
                [
                    "scrape_date",
                    "season",
                    "game_index",
                    "team_type",
                    "team_name",
                    "team_score",
                    "opponent_name",
                    "opponent_score",
                    "unparsed",
                    "opener_direction",
                    "opener_line",
                    "opener_price",
                ]
                .map(String::from),
            );
            for book in SPORTSBOOKS {
                out.push(format!("{book}_direction"));
                out.push(format!("{book}_line"));
                out.push(format!("{book}_price"));
            }
            return out;
        }

        out.extend(["season", "date", "home_team", "away_team"].map(String::from));
        for label in self.segment_labels {
            out.push(format!("home_{label}"));
            out.push(format!("away_{label}"));
        }
        out.extend(["home_final", "away_final"].map(String::from));

        match self.layout {
            LineLayout::SplitSpreadTotal { moneyline_label } => {
                out.push(format!("home_{moneyline_label}"));
                out.push(format!("away_{moneyline_label}"));
                out.extend(
                    [
                        "home_open_spread",
                        "away_open_spread",
                        "home_close_spread",
                        "away_close_spread",
                        "home_2H_spread",
                        "away_2H_spread",
                        "2H_total",
                        "open_over_under",
                        "close_over_under",
                    ]
                    .map(String::from),
                );
            }
            LineLayout::MoneylineTotals => {
                out.extend(
                    ["home_open_ml", "away_open_ml", "home_close_ml", "away_close_ml"]
                        .map(String::from),
                );
                if self.columns(season).get(Field::CloseSpread).is_some() {
                    out.extend(
                        [
                            "home_close_spread",
                            "away_close_spread",
                            "home_close_spread_odds",
                            "away_close_spread_odds",
                        ]
                        .map(String::from),
                    );
                }
                out.extend(
                    [
                        "open_over_under",
                        "open_over_under_odds",
                        "close_over_under",
                        "close_over_under_odds",
                    ]
                    .map(String::from),
                );
            }
            LineLayout::FreeText => {}
        }
        out
    }
}

fn segments(map: ColumnMap, first_column: usize, count: usize) -> ColumnMap {
    (0..count).fold(map, |map, i| map.with(Field::Segment(i), first_column + i))
}

fn totals_from(map: ColumnMap, column: usize) -> ColumnMap {
    map.with(Field::OpenTotal, column)
        .with(Field::OpenTotalOdds, column + 1)
        .with(Field::CloseTotal, column + 2)
        .with(Field::CloseTotalOdds, column + 3)
}

fn spread_line_from(map: ColumnMap, column: usize) -> ColumnMap {
    totals_from(
        map.with(Field::CloseSpread, column)
            .with(Field::CloseSpreadOdds, column + 1),
        column + 2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn football_and_basketball_share_a_layout() {
        let nfl = Sport::Nfl.schema();
        let nba = Sport::Nba.schema();
        assert_eq!(nfl.columns(2021), nba.columns(2021));
        assert_eq!(nfl.pairing, nba.pairing);
        assert_eq!(nba.sport, Sport::Nba);
        assert_eq!(nfl.columns(2021).get(Field::SecondHalf), Some(12));
        assert_eq!(nfl.columns(2021).width(), 13);
    }

    #[test]
    fn hockey_columns_shift_in_2014() {
        let nhl = Sport::Nhl.schema();
        let old = nhl.columns(2013);
        assert_eq!(old.get(Field::CloseSpread), None);
        assert_eq!(old.get(Field::OpenTotal), Some(10));
        assert_eq!(old.get(Field::CloseTotalOdds), Some(13));
        let new = nhl.columns(2014);
        assert_eq!(new.get(Field::CloseSpread), Some(10));
        assert_eq!(new.get(Field::CloseSpreadOdds), Some(11));
        assert_eq!(new.get(Field::OpenTotal), Some(12));
        assert_eq!(new.get(Field::CloseTotalOdds), Some(15));
    }

    #[test]
    fn baseball_columns_and_window() {
        let mlb = Sport::Mlb.schema();
        assert_eq!(mlb.columns(2019).get(Field::Segment(0)), Some(5));
        assert_eq!(mlb.columns(2019).get(Field::Segment(8)), Some(13));
        assert_eq!(mlb.columns(2019).get(Field::CloseTotalOdds), Some(22));
        assert_eq!(mlb.columns(2010).get(Field::OpenTotal), Some(17));
        assert_eq!(mlb.date_window(2019), DateWindow::BASEBALL);
        assert_eq!(
            mlb.pairing,
            Some(PairingRule::AdjacentPairParity { away: Parity::Odd })
        );
    }

    #[test]
    fn shortened_hockey_season_uses_its_own_window() {
        let nhl = Sport::Nhl.schema();
        assert_eq!(nhl.date_window(2020), DateWindow::SHORTENED);
        assert_eq!(nhl.date_window(2021), DateWindow::DEFAULT);
    }

    #[test]
    fn date_units_resolve_with_the_base_window() {
        let nhl = Sport::Nhl.schema();
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(nhl.season_for_date(date(2020, 11, 5)), 2020);
        assert_eq!(nhl.season_for_date(date(2021, 2, 10)), 2020);
        assert_eq!(nhl.season_for_date(date(2021, 10, 12)), 2021);

        let mlb = Sport::Mlb.schema();
        assert_eq!(mlb.season_for_date(date(2021, 6, 1)), 2021);
        assert_eq!(mlb.season_for_date(date(2022, 1, 15)), 2021);
    }

    #[test]
    fn output_fields_follow_segments_and_layout() {
        let nfl = Sport::Nfl.schema().output_fields(2021);
        assert_eq!(nfl.len(), 4 + 8 + 2 + 2 + 9);
        assert_eq!(nfl[4], "home_1stQtr");
        assert!(nfl.contains(&"home_close_ml".to_string()));

        let ncaa = Sport::Ncaa.schema().output_fields(2021);
        assert!(ncaa.contains(&"home_ml".to_string()));
        assert!(ncaa.contains(&"away_2nd".to_string()));

        let nhl = Sport::Nhl.schema();
        assert!(!nhl.output_fields(2012).contains(&"home_close_spread".to_string()));
        assert!(nhl.output_fields(2015).contains(&"home_close_spread".to_string()));

        let free = Sport::Ncaa2ndHalf.schema().output_fields(2023);
        assert_eq!(free.len(), 12 + SPORTSBOOKS.len() * 3);
    }

    #[test]
    fn sports_parse_from_keys() {
        assert_eq!("NFL".parse::<Sport>().unwrap(), Sport::Nfl);
        assert_eq!("ncaa2ndhalf".parse::<Sport>().unwrap(), Sport::Ncaa2ndHalf);
        assert!("cricket".parse::<Sport>().is_err());
    }
}
