use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{EngineError, UnitKey};
use crate::free_text::{parse_matchup, ParsedMatchup};
use crate::odds_token::{parse_odds_token, OddsToken};
use crate::pairing::{pair_rows, PairedGame, PairingRule, Parity, RawRow};
use crate::record::{BookOdds, GameLines, GameRecord, SegmentScore, Side, SpreadLine, TeamRecord};
use crate::schema::{ColumnMap, Field, LineLayout, SportSchema, SPORTSBOOKS};
use crate::season::{date_key, normalize_date};
use crate::spread::{resolve_line, LineKind, ResolvedLine};

/// What the fetcher produced for one unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    /// Raw table rows, header first.
    Rows(Vec<RawRow>),
    /// Page missing, blocked or otherwise not retrievable.
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub key: UnitKey,
    pub fetched: Fetched,
}

impl Unit {
    pub fn season(year: i32, rows: Vec<RawRow>) -> Self {
        Self {
            key: UnitKey::Season(year),
            fetched: Fetched::Rows(rows),
        }
    }

    pub fn date(date: chrono::NaiveDate, rows: Vec<RawRow>) -> Self {
        Self {
            key: UnitKey::Date(date),
            fetched: Fetched::Rows(rows),
        }
    }

    pub fn unavailable(key: UnitKey, reason: impl Into<String>) -> Self {
        Self {
            key,
            fetched: Fetched::Unavailable(reason.into()),
        }
    }
}

/// Normalized content of one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnitOutput {
    pub records: Vec<GameRecord>,
    pub team_records: Vec<TeamRecord>,
    pub dropped_rows: usize,
    pub ambiguous_lines: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedUnit {
    pub unit: UnitKey,
    pub reason: String,
    pub structural: bool,
    #[serde(skip)]
    pub error: EngineError,
}

impl From<EngineError> for SkippedUnit {
    fn from(error: EngineError) -> Self {
        Self {
            unit: error.unit(),
            reason: error.to_string(),
            structural: error.is_structural(),
            error,
        }
    }
}

/// Outcome of a multi-unit run: everything that normalized, in input order,
/// plus the units that were skipped and why.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub records: Vec<GameRecord>,
    pub team_records: Vec<TeamRecord>,
    pub skipped: Vec<SkippedUnit>,
    pub units_ok: usize,
    pub dropped_rows: usize,
    pub ambiguous_lines: usize,
}

impl RunReport {
    fn absorb(&mut self, result: Result<UnitOutput, EngineError>) {
        match result {
            Ok(out) => {
                self.units_ok += 1;
                self.dropped_rows += out.dropped_rows;
                self.ambiguous_lines += out.ambiguous_lines;
                self.records.extend(out.records);
                self.team_records.extend(out.team_records);
            }
            Err(err) => {
                if err.is_structural() {
                    warn!(unit = %err.unit(), "skipping unit, layout mismatch: {err}");
                } else {
                    warn!(unit = %err.unit(), "skipping unit: {err}");
                }
                self.skipped.push(err.into());
            }
        }
    }

    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Cell access for one raw row under a column map.
struct Cells<'a> {
    unit: UnitKey,
    row_index: usize,
    row: &'a [String],
    columns: &'a ColumnMap,
}

impl<'a> Cells<'a> {
    fn new(unit: UnitKey, row_index: usize, row: &'a [String], columns: &'a ColumnMap) -> Self {
        Self {
            unit,
            row_index,
            row,
            columns,
        }
    }

    /// Mapped cell, trimmed. Unmapped fields and short rows are errors.
    fn text(&self, field: Field) -> Result<&'a str, EngineError> {
        let column = self.columns.get(field).ok_or_else(|| EngineError::Unmapped {
            unit: self.unit,
            field: format!("{field:?}"),
        })?;
        self.row
            .get(column)
            .map(|s| s.trim())
            .ok_or(EngineError::Structural {
                unit: self.unit,
                row: self.row_index,
                column,
                width: self.row.len(),
            })
    }

    /// Empty when the field is unmapped or the row stops short.
    fn optional(&self, field: Field) -> &'a str {
        self.columns
            .get(field)
            .and_then(|column| self.row.get(column))
            .map_or("", |s| s.trim())
    }

    fn is_blank(&self) -> bool {
        self.row.iter().all(|c| c.trim().is_empty())
    }
}

pub struct NormalizationEngine {
    config: EngineConfig,
}

impl NormalizationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn normalize_unit(&self, schema: &SportSchema, unit: &Unit) -> Result<UnitOutput, EngineError> {
        match &unit.fetched {
            Fetched::Unavailable(reason) => Err(EngineError::Unavailable {
                unit: unit.key,
                reason: reason.clone(),
            }),
            Fetched::Rows(rows) => self.normalize_rows(schema, unit.key, rows),
        }
    }

    /// Normalize one unit's raw table. Row 0 is the header.
    pub fn normalize_rows(
        &self,
        schema: &SportSchema,
        key: UnitKey,
        rows: &[RawRow],
    ) -> Result<UnitOutput, EngineError> {
        if rows.len() <= 1 {
            return Err(EngineError::MissingData { unit: key });
        }
        let out = match schema.layout {
            LineLayout::FreeText => self.team_rows(schema, key, rows)?,
            LineLayout::SplitSpreadTotal { moneyline_label } => {
                self.game_rows(schema, key, rows, Some(moneyline_label))?
            }
            LineLayout::MoneylineTotals => self.game_rows(schema, key, rows, None)?,
        };
        if out.ambiguous_lines > 0 {
            warn!(
                unit = %key,
                count = out.ambiguous_lines,
                "equal spread/total magnitudes, kept column order"
            );
        }
        debug!(
            unit = %key,
            sport = %schema.sport,
            games = out.records.len(),
            teams = out.team_records.len(),
            dropped = out.dropped_rows,
            "normalized unit"
        );
        Ok(out)
    }

    /// Normalize every unit in order. A failing unit is recorded and skipped.
    pub fn run<I>(&self, schema: &SportSchema, units: I) -> RunReport
    where
        I: IntoIterator<Item = Unit>,
    {
        let mut report = RunReport::default();
        for unit in units {
            report.absorb(self.normalize_unit(schema, &unit));
        }
        log_summary(schema, &report);
        report
    }

    /// Same result as [`NormalizationEngine::run`], with units normalized on
    /// the rayon pool. Output order follows input order.
    pub fn run_parallel(&self, schema: &SportSchema, units: &[Unit]) -> RunReport {
        let results: Vec<Result<UnitOutput, EngineError>> = units
            .par_iter()
            .map(|unit| self.normalize_unit(schema, unit))
            .collect();
        let mut report = RunReport::default();
        for result in results {
            report.absorb(result);
        }
        log_summary(schema, &report);
        report
    }

    fn game_rows(
        &self,
        schema: &SportSchema,
        key: UnitKey,
        rows: &[RawRow],
        moneyline_label: Option<&'static str>,
    ) -> Result<UnitOutput, EngineError> {
        let season = match key {
            UnitKey::Season(year) => year,
            UnitKey::Date(date) => schema.season_for_date(date),
        };
        let columns = schema.columns(season);
        let rule = schema
            .pairing
            .unwrap_or(PairingRule::AdjacentPairParity { away: Parity::Odd });
        let paired = pair_rows(rows, rule);

        let mut out = UnitOutput {
            dropped_rows: paired.dropped_rows,
            ..UnitOutput::default()
        };
        for game in &paired.games {
            let record = self.game_record(schema, key, season, columns, game, moneyline_label)?;
            out.ambiguous_lines += record.ambiguous_lines.len();
            out.records.push(record);
        }
        Ok(out)
    }

    fn game_record(
        &self,
        schema: &SportSchema,
        key: UnitKey,
        season: i32,
        columns: &ColumnMap,
        game: &PairedGame<'_>,
        moneyline_label: Option<&'static str>,
    ) -> Result<GameRecord, EngineError> {
        let away = Cells::new(key, game.away_index, game.away, columns);
        let home = Cells::new(key, game.home_index, game.home, columns);
        let blacklist = &self.config.blacklist;
        let translator = &self.config.translator;

        let raw_date = away.text(Field::Date)?;
        let date = normalize_date(raw_date, season, schema.date_window(season)).ok_or_else(|| {
            EngineError::InvalidDate {
                unit: key,
                row: game.away_index,
                raw: raw_date.to_string(),
            }
        })?;

        let mut segments = Vec::with_capacity(schema.segment_labels.len());
        for (i, label) in schema.segment_labels.iter().copied().enumerate() {
            segments.push(SegmentScore {
                label,
                home: blacklist.sanitize_int(home.text(Field::Segment(i))?),
                away: blacklist.sanitize_int(away.text(Field::Segment(i))?),
            });
        }

        let mut ambiguous_lines = Vec::new();
        let lines = match moneyline_label {
            Some(moneyline_label) => {
                let home_ml = blacklist.sanitize_int(home.text(Field::Moneyline)?);
                let away_ml = blacklist.sanitize_int(away.text(Field::Moneyline)?);
                let mut resolve = |field: Field, kind: LineKind| -> Result<ResolvedLine, EngineError> {
                    let line = resolve_line(
                        blacklist.sanitize(away.text(field)?),
                        blacklist.sanitize(home.text(field)?),
                        home_ml,
                        away_ml,
                    );
                    if line.ambiguous {
                        ambiguous_lines.push(kind);
                    }
                    Ok(line)
                };
                let open = resolve(Field::Open, LineKind::Open)?;
                let close = resolve(Field::Close, LineKind::Close)?;
                let second_half = resolve(Field::SecondHalf, LineKind::SecondHalf)?;
                GameLines::SplitSpreadTotal {
                    moneyline_label,
                    home_ml,
                    away_ml,
                    open,
                    close,
                    second_half,
                }
            }
            None => {
                let spread = match columns.get(Field::CloseSpread) {
                    Some(_) => Some(SpreadLine {
                        home: blacklist.sanitize(home.text(Field::CloseSpread)?),
                        away: blacklist.sanitize(away.text(Field::CloseSpread)?),
                        home_odds: blacklist.sanitize(home.text(Field::CloseSpreadOdds)?),
                        away_odds: blacklist.sanitize(away.text(Field::CloseSpreadOdds)?),
                    }),
                    None => None,
                };
                GameLines::MoneylineTotals {
                    home_open_ml: blacklist.sanitize_int(home.text(Field::OpenMoneyline)?),
                    away_open_ml: blacklist.sanitize_int(away.text(Field::OpenMoneyline)?),
                    home_close_ml: blacklist.sanitize_int(home.text(Field::CloseMoneyline)?),
                    away_close_ml: blacklist.sanitize_int(away.text(Field::CloseMoneyline)?),
                    spread,
                    open_total: blacklist.sanitize(home.text(Field::OpenTotal)?),
                    open_total_odds: blacklist.sanitize(home.text(Field::OpenTotalOdds)?),
                    close_total: blacklist.sanitize(home.text(Field::CloseTotal)?),
                    close_total_odds: blacklist.sanitize(home.text(Field::CloseTotalOdds)?),
                }
            }
        };

        Ok(GameRecord {
            sport: schema.sport,
            season,
            date,
            home_team: translator.translate(schema.sport, home.text(Field::Name)?),
            away_team: translator.translate(schema.sport, away.text(Field::Name)?),
            segments,
            home_final: blacklist.sanitize_int(home.text(Field::Final)?),
            away_final: blacklist.sanitize_int(away.text(Field::Final)?),
            lines,
            ambiguous_lines,
        })
    }

    fn team_rows(
        &self,
        schema: &SportSchema,
        key: UnitKey,
        rows: &[RawRow],
    ) -> Result<UnitOutput, EngineError> {
        let UnitKey::Date(date) = key else {
            return Err(EngineError::UnitMismatch {
                unit: key,
                sport: schema.sport,
                expected: "date",
            });
        };
        let season = schema.season_for_date(date);
        let scrape_date = date_key(date);
        let columns = schema.columns(season);

        let mut out = UnitOutput::default();
        let mut game_index = 0;
        for (row_index, row) in rows.iter().enumerate().skip(1) {
            let cells = Cells::new(key, row_index, row, columns);
            if cells.is_blank() {
                out.dropped_rows += 1;
                continue;
            }
            let matchup = parse_matchup(cells.text(Field::Matchup)?);
            if !matchup.parsed {
                debug!(unit = %key, row = row_index, "matchup not parsed, using placeholders");
            }
            let (away_name, home_name) = self.team_names(schema, &matchup);
            let books = |field: fn(usize) -> Field| -> Vec<BookOdds> {
                SPORTSBOOKS
                    .into_iter()
                    .enumerate()
                    .map(|(i, book)| BookOdds {
                        book,
                        odds: self.odds_token(cells.optional(field(i))),
                    })
                    .collect()
            };

            out.team_records.push(TeamRecord {
                scrape_date,
                season,
                game_index,
                team_type: Side::Away,
                team_name: away_name.clone(),
                team_score: matchup.away_score,
                opponent_name: home_name.clone(),
                opponent_score: matchup.home_score,
                unparsed: !matchup.parsed,
                opener: self.odds_token(cells.optional(Field::OpenerAway)),
                books: books(Field::BookAway),
            });
            out.team_records.push(TeamRecord {
                scrape_date,
                season,
                game_index,
                team_type: Side::Home,
                team_name: home_name,
                team_score: matchup.home_score,
                opponent_name: away_name,
                opponent_score: matchup.away_score,
                unparsed: !matchup.parsed,
                opener: self.odds_token(cells.optional(Field::OpenerHome)),
                books: books(Field::BookHome),
            });
            game_index += 1;
        }
        Ok(out)
    }

    /// Placeholders are never run through the translation table.
    fn team_names(&self, schema: &SportSchema, matchup: &ParsedMatchup) -> (String, String) {
        if !matchup.parsed {
            return (matchup.away.clone(), matchup.home.clone());
        }
        let translator = &self.config.translator;
        (
            translator.translate(schema.sport, &matchup.away),
            translator.translate(schema.sport, &matchup.home),
        )
    }

    fn odds_token(&self, raw: &str) -> OddsToken {
        if self.config.blacklist.contains(raw) {
            return OddsToken::default();
        }
        parse_odds_token(raw)
    }
}

fn log_summary(schema: &SportSchema, report: &RunReport) {
    info!(
        sport = %schema.sport,
        units_ok = report.units_ok,
        skipped = report.skipped.len(),
        games = report.records.len(),
        teams = report.team_records.len(),
        dropped_rows = report.dropped_rows,
        "run complete"
    );
}
