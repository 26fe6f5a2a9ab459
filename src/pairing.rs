use tracing::debug;

/// One raw table row, addressed by column position.
pub type RawRow = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    fn matches(self, index: usize) -> bool {
        match self {
            Parity::Even => index % 2 == 0,
            Parity::Odd => index % 2 == 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingRule {
    /// Data rows pair contiguously from the first row after the header. Within
    /// each pair the row whose source index has `away` parity is the away
    /// side, so sheets listing the home team first use `Parity::Even`.
    AdjacentPairParity { away: Parity },
    /// `column` holds `V` (visitor) or `H` (home); only `V` directly followed by
    /// `H` forms a pair.
    RoleTagMatch { column: usize },
}

/// Two raw rows describing one game. Indices are positions in the source
/// table (header included).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairedGame<'a> {
    pub away_index: usize,
    pub home_index: usize,
    pub away: &'a [String],
    pub home: &'a [String],
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairingOutcome<'a> {
    pub games: Vec<PairedGame<'a>>,
    /// Data rows (header excluded) that did not end up in any pair.
    pub dropped_rows: usize,
}

/// Group a raw table into per-game pairs. Row 0 is the header and is always
/// discarded. Leftover rows are dropped, never an error.
pub fn pair_rows(rows: &[RawRow], rule: PairingRule) -> PairingOutcome<'_> {
    if rows.len() < 2 {
        return PairingOutcome::default();
    }
    let data_rows = rows.len() - 1;
    let games = match rule {
        PairingRule::AdjacentPairParity { away } => pair_by_parity(rows, away),
        PairingRule::RoleTagMatch { column } => pair_by_role(rows, column),
    };
    let dropped_rows = data_rows - games.len() * 2;
    if dropped_rows > 0 {
        debug!(
            dropped_rows,
            paired = games.len(),
            "rows left out of game pairs"
        );
    }
    PairingOutcome {
        games,
        dropped_rows,
    }
}

fn pair_by_parity(rows: &[RawRow], away: Parity) -> Vec<PairedGame<'_>> {
    (1..rows.len() - 1)
        .step_by(2)
        .map(|i| {
            let (away_index, home_index) = if away.matches(i) { (i, i + 1) } else { (i + 1, i) };
            PairedGame {
                away_index,
                home_index,
                away: &rows[away_index],
                home: &rows[home_index],
            }
        })
        .collect()
}

fn pair_by_role(rows: &[RawRow], column: usize) -> Vec<PairedGame<'_>> {
    let mut out = Vec::new();
    let mut i = 1;
    while i + 1 < rows.len() {
        if role_tag(&rows[i], column) == Some('V') && role_tag(&rows[i + 1], column) == Some('H') {
            out.push(PairedGame {
                away_index: i,
                home_index: i + 1,
                away: &rows[i],
                home: &rows[i + 1],
            });
            i += 2;
        } else {
            debug!(row = i, "no visitor/home adjacency, dropping row");
            i += 1;
        }
    }
    out
}

fn role_tag(row: &[String], column: usize) -> Option<char> {
    let cell = row.get(column)?.trim();
    let mut chars = cell.chars();
    let tag = chars.next()?.to_ascii_uppercase();
    chars.next().is_none().then_some(tag)
}
