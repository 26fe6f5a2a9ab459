use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::sanitize::Blacklist;
use crate::translate::TeamNameTranslator;

/// Everything the engine needs besides the raw rows. Passed in explicitly;
/// the engine never reads files or the environment on its own.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub blacklist: Blacklist,
    pub translator: TeamNameTranslator,
}

impl EngineConfig {
    pub fn new(blacklist: Blacklist, translator: TeamNameTranslator) -> Self {
        Self {
            blacklist,
            translator,
        }
    }

    /// `ODDS_TRANSLATIONS` points at a translation table (json). When it is
    /// unset the table is empty. A configured but unreadable table is an error
    /// unless `ODDS_TRANSLATIONS_OPTIONAL` is truthy, in which case it is
    /// logged and replaced by an empty table. `ODDS_EXTRA_BLACKLIST` adds
    /// comma-separated sentinel tokens.
    pub fn from_env() -> Result<Self> {
        let extra = env::var("ODDS_EXTRA_BLACKLIST").unwrap_or_default();
        let blacklist = Blacklist::default().with_extra(
            extra
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );

        let translator = match env::var("ODDS_TRANSLATIONS")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
        {
            None => TeamNameTranslator::empty(),
            Some(path) => {
                let path = PathBuf::from(path);
                match TeamNameTranslator::from_path(&path) {
                    Ok(tr) => {
                        info!(entries = tr.len(), path = %path.display(), "loaded team translations");
                        tr
                    }
                    Err(err) if env_bool("ODDS_TRANSLATIONS_OPTIONAL", false) => {
                        warn!("using raw team names: {err:#}");
                        TeamNameTranslator::empty()
                    }
                    Err(err) => return Err(err).context("ODDS_TRANSLATIONS"),
                }
            }
        };

        Ok(Self {
            blacklist,
            translator,
        })
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| {
            let t = v.trim().to_ascii_lowercase();
            !(t.is_empty() || t == "0" || t == "false" || t == "off" || t == "no")
        })
        .unwrap_or(default)
}
