use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use sbr_odds::config::EngineConfig;
use sbr_odds::engine::{Fetched, NormalizationEngine, Unit};
use sbr_odds::error::{EngineError, UnitKey};
use sbr_odds::odds_token::Direction;
use sbr_odds::record::{FieldValue, Side};
use sbr_odds::schema::Sport;
use sbr_odds::season::parse_unit_date;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn load_units(name: &str) -> (Sport, Vec<Unit>) {
    let raw: Value = serde_json::from_str(&read_fixture(name)).expect("fixture should be json");
    let sport: Sport = serde_json::from_value(raw["sport"].clone()).expect("known sport");
    let units = raw["units"]
        .as_array()
        .expect("units array")
        .iter()
        .map(|unit| {
            let key = match (unit["season"].as_i64(), unit["date"].as_str()) {
                (Some(season), _) => UnitKey::Season(season as i32),
                (None, Some(date)) => UnitKey::Date(parse_unit_date(date).expect("valid date")),
                _ => panic!("unit without key"),
            };
            if let Some(reason) = unit["unavailable"].as_str() {
                return Unit::unavailable(key, reason);
            }
            let rows = unit["rows"]
                .as_array()
                .expect("rows array")
                .iter()
                .map(|row| {
                    row.as_array()
                        .expect("row array")
                        .iter()
                        .map(|cell| cell.as_str().unwrap_or_default().to_string())
                        .collect()
                })
                .collect();
            Unit {
                key,
                fetched: Fetched::Rows(rows),
            }
        })
        .collect();
    (sport, units)
}

#[test]
fn parses_nfl_season_fixture() {
    let (sport, units) = load_units("nfl_units.json");
    assert_eq!(sport, Sport::Nfl);
    let engine = NormalizationEngine::new(EngineConfig::default());
    let report = engine.run(&sport.schema(), units);

    assert_eq!(report.records.len(), 3);
    assert_eq!(report.units_ok, 1);
    assert_eq!(report.dropped_rows, 1);
    assert_eq!(report.ambiguous_lines, 0);

    let first = &report.records[0];
    assert_eq!(first.date, 20210909);
    assert_eq!(first.home_team, "TampaBay");
    assert_eq!(first.away_team, "Dallas");
    assert_eq!(first.home_final, 31);
    assert_eq!(first.away_final, 29);
    assert_eq!(first.field("home_close_ml"), Some(FieldValue::Int(-300)));
    assert_eq!(first.field("away_close_ml"), Some(FieldValue::Int(240)));
    assert_eq!(first.field("home_open_spread"), Some(FieldValue::Float(-7.0)));
    assert_eq!(first.field("away_open_spread"), Some(FieldValue::Float(7.0)));
    assert_eq!(first.field("open_over_under"), Some(FieldValue::Float(52.0)));
    assert_eq!(first.field("home_close_spread"), Some(FieldValue::Float(-8.5)));
    assert_eq!(first.field("close_over_under"), Some(FieldValue::Float(51.5)));
    assert_eq!(first.field("home_2H_spread"), Some(FieldValue::Float(-3.5)));
    assert_eq!(first.field("2H_total"), Some(FieldValue::Float(24.0)));
    assert_eq!(first.field("home_2ndQtr"), Some(FieldValue::Int(14)));

    let pickem = &report.records[1];
    assert_eq!(pickem.field("home_open_spread"), Some(FieldValue::Float(0.0)));
    assert_eq!(pickem.field("away_open_spread"), Some(FieldValue::Float(0.0)));
    assert_eq!(pickem.field("open_over_under"), Some(FieldValue::Float(45.0)));
    assert_eq!(pickem.field("close_over_under"), Some(FieldValue::Float(46.0)));

    let january = &report.records[2];
    assert_eq!(january.date, 20220109);
    assert_eq!(january.season, 2021);
    assert_eq!(january.field("home_open_spread"), Some(FieldValue::Float(3.0)));
    assert_eq!(january.field("away_open_spread"), Some(FieldValue::Float(-3.0)));
    assert_eq!(january.field("close_over_under"), Some(FieldValue::Float(44.5)));
}

#[test]
fn nfl_fixture_reports_skipped_units() {
    let (sport, units) = load_units("nfl_units.json");
    let engine = NormalizationEngine::new(EngineConfig::default());
    let report = engine.run(&sport.schema(), units);

    assert_eq!(report.skipped.len(), 2);
    assert_eq!(report.skipped[0].unit, UnitKey::Season(2008));
    assert!(matches!(
        report.skipped[0].error,
        EngineError::Unavailable { .. }
    ));
    assert!(report.skipped[0].reason.contains("404"));
    assert_eq!(
        report.skipped[1].error,
        EngineError::MissingData {
            unit: UnitKey::Season(2020)
        }
    );
    assert!(!report.skipped[1].structural);
}

#[test]
fn field_names_match_schema_order() {
    let (sport, units) = load_units("nfl_units.json");
    let schema = sport.schema();
    let engine = NormalizationEngine::new(EngineConfig::default());
    let report = engine.run(&schema, units);
    let names = report.records[0]
        .to_fields()
        .into_iter()
        .map(|(k, _)| k)
        .collect::<Vec<_>>();
    assert_eq!(names, schema.output_fields(2021));
}

#[test]
fn parses_second_half_free_text_fixture() {
    let (sport, units) = load_units("ncaa2ndhalf_units.json");
    assert_eq!(sport, Sport::Ncaa2ndHalf);
    let schema = sport.schema();
    let engine = NormalizationEngine::new(EngineConfig::default());
    let report = engine.run(&schema, units);

    assert!(report.is_clean());
    assert!(report.records.is_empty());
    assert_eq!(report.team_records.len(), 4);
    assert_eq!(report.dropped_rows, 1);

    let away = &report.team_records[0];
    assert_eq!(away.team_type, Side::Away);
    assert_eq!(away.scrape_date, 20240205);
    assert_eq!(away.season, 2023);
    assert_eq!(away.game_index, 0);
    assert_eq!(away.team_name, "Duke");
    assert_eq!(away.team_score, 75);
    assert_eq!(away.opponent_name, "North Carolina");
    assert_eq!(away.opponent_score, 70);
    assert!(!away.unparsed);
    assert_eq!(away.opener.direction, Direction::Over);
    assert_eq!(away.opener.line, Some(145.5));
    assert_eq!(away.opener.price, Some(-110));
    assert_eq!(away.books[0].book, "betmgm");
    assert_eq!(away.books[0].odds.line, Some(146.0));
    assert!(away.books[1].odds.is_empty());

    let home = &report.team_records[1];
    assert_eq!(home.team_type, Side::Home);
    assert_eq!(home.team_name, "North Carolina");
    assert_eq!(home.opponent_name, "Duke");
    assert_eq!(home.opener.line, Some(-3.5));
    assert_eq!(home.books[0].odds.line, Some(-3.0));
    assert_eq!(home.books[0].odds.price, Some(-115));

    let unparsed = &report.team_records[2];
    assert!(unparsed.unparsed);
    assert_eq!(unparsed.team_name, "Team1");
    assert_eq!(unparsed.opponent_name, "Team2");
    assert_eq!(unparsed.game_index, 1);
    assert_eq!(unparsed.opener.price, Some(-110));
    assert_eq!(report.team_records[3].opener.price, Some(100));
    assert_eq!(report.team_records[3].team_name, "Team2");

    let names = away
        .to_fields()
        .into_iter()
        .map(|(k, _)| k)
        .collect::<Vec<_>>();
    assert_eq!(names, schema.output_fields(2023));
}
