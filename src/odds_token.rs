use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Over,
    Under,
    #[default]
    None,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Over => "over",
            Direction::Under => "under",
            Direction::None => "",
        }
    }
}

/// Inline odds cell such as `"O 75.5 -110"`, `"-3.5 -110"` or `"-110"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OddsToken {
    pub direction: Direction,
    pub line: Option<f64>,
    pub price: Option<i32>,
}

impl OddsToken {
    pub fn is_empty(&self) -> bool {
        self.direction == Direction::None && self.line.is_none() && self.price.is_none()
    }
}

/// Parse an inline odds token. Anything that does not fit one of the three
/// shapes yields an empty token.
pub fn parse_odds_token(token: &str) -> OddsToken {
    let parts: Vec<&str> = token.split_whitespace().collect();
    let parsed = match parts.as_slice() {
        [dir, line, price] => parse_direction(dir).and_then(|direction| {
            Some(OddsToken {
                direction,
                line: Some(parse_line(line)?),
                price: Some(parse_price(price)?),
            })
        }),
        [line, price] => {
            parse_line(line)
                .zip(parse_price(price))
                .map(|(line, price)| OddsToken {
                    direction: Direction::None,
                    line: Some(line),
                    price: Some(price),
                })
        }
        [price] => parse_price(price).map(|price| OddsToken {
            price: Some(price),
            ..OddsToken::default()
        }),
        _ => None,
    };
    parsed.unwrap_or_default()
}

fn parse_direction(raw: &str) -> Option<Direction> {
    match raw {
        "O" | "o" => Some(Direction::Over),
        "U" | "u" => Some(Direction::Under),
        _ => None,
    }
}

fn parse_line(raw: &str) -> Option<f64> {
    if raw.eq_ignore_ascii_case("pk") {
        return Some(0.0);
    }
    // Books print half points with a fraction glyph on the rendered pages.
    let (whole, half) = match raw.strip_suffix('½') {
        Some(rest) => (rest, 0.5),
        None => (raw, 0.0),
    };
    let whole = whole.strip_prefix('+').unwrap_or(whole);
    let value = match whole {
        "" | "+" if half > 0.0 => 0.0,
        "-" if half > 0.0 => -0.0,
        w => w.parse::<f64>().ok().filter(|v| v.is_finite())?,
    };
    Some(if value.is_sign_negative() {
        value - half
    } else {
        value + half
    })
}

fn parse_price(raw: &str) -> Option<i32> {
    if raw.eq_ignore_ascii_case("ev") || raw.eq_ignore_ascii_case("even") {
        return Some(100);
    }
    let raw = raw.strip_prefix('+').unwrap_or(raw);
    raw.parse::<i32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directional_total() {
        let token = parse_odds_token("O 75.5 -110");
        assert_eq!(token.direction, Direction::Over);
        assert_eq!(token.line, Some(75.5));
        assert_eq!(token.price, Some(-110));

        let under = parse_odds_token("u 68 +105");
        assert_eq!(under.direction, Direction::Under);
        assert_eq!(under.line, Some(68.0));
        assert_eq!(under.price, Some(105));
    }

    #[test]
    fn price_only_and_line_price() {
        assert_eq!(
            parse_odds_token("-110"),
            OddsToken {
                direction: Direction::None,
                line: None,
                price: Some(-110),
            }
        );
        let pair = parse_odds_token("-3½ -115");
        assert_eq!(pair.line, Some(-3.5));
        assert_eq!(pair.price, Some(-115));
        assert_eq!(parse_odds_token("PK EV").line, Some(0.0));
        assert_eq!(parse_odds_token("PK EV").price, Some(100));
    }

    #[test]
    fn prices_are_kept_as_printed() {
        assert_eq!(parse_odds_token("50").price, Some(50));
        assert_eq!(parse_odds_token("+5").price, Some(5));
        let pair = parse_odds_token("3 -95");
        assert_eq!(pair.line, Some(3.0));
        assert_eq!(pair.price, Some(-95));
        assert!(parse_odds_token("3 junk").is_empty());
        assert!(parse_odds_token("junk -110").is_empty());
    }

    #[test]
    fn unparseable_tokens_are_empty() {
        assert!(parse_odds_token("").is_empty());
        assert!(parse_odds_token("   ").is_empty());
        assert!(parse_odds_token("X 75.5 -110").is_empty());
        assert!(parse_odds_token("O 75.5").is_empty());
        assert!(parse_odds_token("-").is_empty());
        assert!(parse_odds_token("45%").is_empty());
        assert!(parse_odds_token("O 75.5 -110 extra").is_empty());
        assert!(parse_odds_token("75.5").is_empty());
    }
}
