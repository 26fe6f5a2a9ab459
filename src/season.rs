use chrono::{Datelike, NaiveDate};

use crate::schema::Sport;

/// Inclusive month range that belongs to the season's starting year. Months
/// outside it roll into `season + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start_month: u32,
    pub end_month: u32,
}

impl DateWindow {
    pub const DEFAULT: DateWindow = DateWindow::new(8, 12);
    pub const BASEBALL: DateWindow = DateWindow::new(3, 10);
    /// Hockey's 2020 season started in January 2021.
    pub const SHORTENED: DateWindow = DateWindow::new(1, 3);

    pub const fn new(start_month: u32, end_month: u32) -> Self {
        Self {
            start_month,
            end_month,
        }
    }

    pub fn contains(&self, month: u32) -> bool {
        (self.start_month..=self.end_month).contains(&month)
    }
}

impl Default for DateWindow {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// `2021` → `"2021-22"`, `1999` → `"1999-00"`.
pub fn season_label(year: i32) -> String {
    format!("{year}-{:02}", (year + 1).rem_euclid(100))
}

/// Archive page segment for a season. Hockey's shortened 2020 season is
/// published as `"2021"` and the baseball spreadsheets are keyed by plain year.
pub fn url_season_segment(sport: Sport, year: i32) -> String {
    match sport {
        Sport::Nhl if year == 2020 => "2021".to_string(),
        Sport::Mlb => year.to_string(),
        _ => season_label(year),
    }
}

/// Turn an archive `"MMDD"` cell into `YYYYMMDD`. Returns `None` when the cell
/// is not a real calendar date.
pub fn normalize_date(raw: &str, season: i32, window: DateWindow) -> Option<u32> {
    let raw = raw.trim();
    // Spreadsheet cells sometimes come through as floats ("1109.0").
    let raw = raw.strip_suffix(".0").unwrap_or(raw);
    if !(3..=4).contains(&raw.len()) || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let padded = format!("{raw:0>4}");
    let month: u32 = padded[..2].parse().ok()?;
    let day: u32 = padded[2..].parse().ok()?;
    let year = if window.contains(month) {
        season
    } else {
        season + 1
    };
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(date_key(date))
}

/// `YYYYMMDD` integer for a calendar date.
pub fn date_key(date: NaiveDate) -> u32 {
    date.year() as u32 * 10_000 + date.month() * 100 + date.day()
}

/// Season (starting year) a calendar date belongs to.
pub fn season_for_date(date: NaiveDate, window: DateWindow) -> i32 {
    if window.contains(date.month()) {
        date.year()
    } else {
        date.year() - 1
    }
}

/// Scrape dates arrive as `YYYY-MM-DD`; compact `YYYYMMDD` is accepted too.
pub fn parse_unit_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    ["%Y-%m-%d", "%Y%m%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_labels_wrap_the_century() {
        assert_eq!(season_label(2021), "2021-22");
        assert_eq!(season_label(1999), "1999-00");
        assert_eq!(season_label(2099), "2099-00");
        assert_eq!(season_label(2008), "2008-09");
        for year in 1990..2110 {
            let expected = format!("{year}-{:02}", (year + 1) % 100);
            assert_eq!(season_label(year), expected);
        }
    }

    #[test]
    fn dates_inside_window_keep_the_season_year() {
        assert_eq!(normalize_date("1109", 2021, DateWindow::DEFAULT), Some(20211109));
    }

    #[test]
    fn three_digit_dates_are_padded_and_roll_over() {
        assert_eq!(normalize_date("215", 2021, DateWindow::DEFAULT), Some(20220215));
    }

    #[test]
    fn baseball_and_shortened_windows() {
        assert_eq!(normalize_date("401", 2019, DateWindow::BASEBALL), Some(20190401));
        assert_eq!(normalize_date("1101", 2019, DateWindow::BASEBALL), Some(20201101));
        assert_eq!(normalize_date("113", 2020, DateWindow::SHORTENED), Some(20200113));
        assert_eq!(normalize_date("503", 2020, DateWindow::SHORTENED), Some(20210503));
    }

    #[test]
    fn invalid_dates_are_rejected() {
        assert_eq!(normalize_date("1345", 2021, DateWindow::DEFAULT), None);
        assert_eq!(normalize_date("231", 2021, DateWindow::DEFAULT), None);
        assert_eq!(normalize_date("Date", 2021, DateWindow::DEFAULT), None);
        assert_eq!(normalize_date("12", 2021, DateWindow::DEFAULT), None);
        assert_eq!(normalize_date("1109.0", 2021, DateWindow::DEFAULT), Some(20211109));
    }

    #[test]
    fn unit_dates_map_to_seasons() {
        let feb = parse_unit_date("2024-02-05").unwrap();
        assert_eq!(date_key(feb), 20240205);
        assert_eq!(season_for_date(feb, DateWindow::DEFAULT), 2023);
        let nov = parse_unit_date("20231120").unwrap();
        assert_eq!(season_for_date(nov, DateWindow::DEFAULT), 2023);
        assert!(parse_unit_date("Feb 5").is_none());
    }

    #[test]
    fn url_segments_follow_archive_naming() {
        assert_eq!(url_season_segment(Sport::Nfl, 2021), "2021-22");
        assert_eq!(url_season_segment(Sport::Nhl, 2020), "2021");
        assert_eq!(url_season_segment(Sport::Nhl, 2019), "2019-20");
        assert_eq!(url_season_segment(Sport::Mlb, 2019), "2019");
    }
}
