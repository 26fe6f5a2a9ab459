use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Tokens the archives use for "no line". They must read as zero, not fail.
const DEFAULT_BLACKLIST: &[&str] = &[
    "pk", "PK", "NL", "nl", "a100", "a105", "a110", ".5+03", ".5ev", "-",
];

static DEFAULT_SET: Lazy<HashSet<String>> =
    Lazy::new(|| DEFAULT_BLACKLIST.iter().map(|s| s.to_string()).collect());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blacklist {
    tokens: HashSet<String>,
}

impl Default for Blacklist {
    fn default() -> Self {
        Self {
            tokens: DEFAULT_SET.clone(),
        }
    }
}

impl Blacklist {
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tokens.extend(
            extra
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.trim().is_empty()),
        );
        self
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token.trim())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Numeric value of a raw cell, or `0.0` for blacklisted, blank or
    /// malformed tokens. Never fails.
    pub fn sanitize(&self, token: &str) -> f64 {
        self.parse(token).unwrap_or(0.0)
    }

    /// Integer view for scores and moneylines; fractional parts truncate.
    pub fn sanitize_int(&self, token: &str) -> i64 {
        self.sanitize(token).trunc() as i64
    }

    /// Like [`Blacklist::sanitize`] but keeps "no value" distinguishable.
    pub fn parse(&self, token: &str) -> Option<f64> {
        let t = token.trim();
        if t.is_empty() || self.contains(t) {
            return None;
        }
        let t = t.strip_prefix('+').unwrap_or(t);
        let value = t.parse::<f64>().ok()?;
        value.is_finite().then_some(value)
    }
}

/// Sanitize against the fixed default blacklist.
pub fn sanitize(token: &str) -> f64 {
    DEFAULT_SANITIZER.sanitize(token)
}

static DEFAULT_SANITIZER: Lazy<Blacklist> = Lazy::new(Blacklist::default);
