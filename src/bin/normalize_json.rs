use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::{Map, Value};

use sbr_odds::config::EngineConfig;
use sbr_odds::engine::{Fetched, NormalizationEngine, Unit};
use sbr_odds::error::UnitKey;
use sbr_odds::logging;
use sbr_odds::record::Fields;
use sbr_odds::schema::Sport;
use sbr_odds::season::parse_unit_date;

/// `{"sport": "nfl", "units": [{"season": 2021, "rows": [[...], ...]}]}`.
/// A unit carries either `season` or `date`, and either `rows` or
/// `unavailable` (the reason the page could not be fetched).
#[derive(Debug, Deserialize)]
struct Input {
    sport: Sport,
    units: Vec<InputUnit>,
}

#[derive(Debug, Deserialize)]
struct InputUnit {
    season: Option<i32>,
    date: Option<String>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
    unavailable: Option<String>,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    logging::init();

    let path = parse_input_arg()
        .ok_or_else(|| anyhow!("usage: normalize_json <units.json> [--parallel]"))?;
    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let input: Input =
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;

    let units = input
        .units
        .into_iter()
        .enumerate()
        .map(|(idx, unit)| to_unit(unit).with_context(|| format!("unit {idx}")))
        .collect::<Result<Vec<_>>>()?;

    let engine = NormalizationEngine::new(EngineConfig::from_env()?);
    let schema = input.sport.schema();
    let report = if has_flag("--parallel") {
        engine.run_parallel(&schema, &units)
    } else {
        engine.run(&schema, units)
    };

    for record in &report.records {
        println!("{}", Value::Object(to_object(record.to_fields())));
    }
    for record in &report.team_records {
        println!("{}", Value::Object(to_object(record.to_fields())));
    }
    for skipped in &report.skipped {
        eprintln!("skipped {}: {}", skipped.unit, skipped.reason);
    }
    eprintln!(
        "units ok={} skipped={} games={} teams={} dropped_rows={} ambiguous_lines={}",
        report.units_ok,
        report.skipped.len(),
        report.records.len(),
        report.team_records.len(),
        report.dropped_rows,
        report.ambiguous_lines
    );

    Ok(())
}

fn to_unit(unit: InputUnit) -> Result<Unit> {
    let key = match (unit.season, unit.date.as_deref()) {
        (Some(season), None) => UnitKey::Season(season),
        (None, Some(raw)) => {
            UnitKey::Date(parse_unit_date(raw).ok_or_else(|| anyhow!("invalid date {raw:?}"))?)
        }
        _ => return Err(anyhow!("unit needs exactly one of season or date")),
    };
    if let Some(reason) = unit.unavailable {
        return Ok(Unit::unavailable(key, reason));
    }
    let rows = unit
        .rows
        .into_iter()
        .map(|row| row.into_iter().map(cell_text).collect())
        .collect();
    Ok(Unit {
        key,
        fetched: Fetched::Rows(rows),
    })
}

/// Cells may arrive as strings or as bare numbers.
fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn to_object(fields: Fields) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(key, value)| {
            let value = serde_json::to_value(value).unwrap_or(Value::Null);
            (key, value)
        })
        .collect()
}

fn parse_input_arg() -> Option<PathBuf> {
    std::env::args()
        .skip(1)
        .find(|arg| !arg.starts_with("--"))
        .map(PathBuf::from)
}

fn has_flag(flag: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == flag)
}
