use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::schema::Sport;

/// Scraped team name → canonical name, per sport. A miss returns the raw name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamNameTranslator {
    table: HashMap<String, HashMap<String, String>>,
}

impl TeamNameTranslator {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table shaped `{"nfl": {"KCChiefs": "Kansas City Chiefs"}, ...}`.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(Self::empty());
        }
        serde_json::from_str(trimmed).context("invalid translation table json")
    }

    /// A missing file is an error here; whether to fall back to
    /// [`TeamNameTranslator::empty`] is the caller's decision.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read translation table {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("parse {}", path.display()))
    }

    pub fn with_entry(mut self, sport: Sport, raw: &str, canonical: &str) -> Self {
        self.table
            .entry(sport.key().to_string())
            .or_default()
            .insert(raw.to_string(), canonical.to_string());
        self
    }

    pub fn translate(&self, sport: Sport, raw: &str) -> String {
        let trimmed = raw.trim();
        self.table
            .get(sport.key())
            .and_then(|names| names.get(trimmed))
            .cloned()
            .unwrap_or_else(|| trimmed.to_string())
    }

    pub fn len(&self) -> usize {
        self.table.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
