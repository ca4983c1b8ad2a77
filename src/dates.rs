use chrono::{Datelike, Duration, Local, NaiveDate};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses a strict `YYYY-MM-DD` calendar day.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Signed number of calendar days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// Inclusive, ordered day sequence. Empty when `to` precedes `from`.
pub fn days_in_range(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let total = days_between(from, to);
    if total < 0 {
        return Vec::new();
    }
    (0..=total).map(|offset| add_days(from, offset)).collect()
}

/// "February 9, 2026"
pub fn format_display_date(date: NaiveDate) -> String {
    format!("{} {}, {}", date.format("%B"), date.day(), date.year())
}

/// "Feb 9"
pub fn format_short_date(date: NaiveDate) -> String {
    format!("{} {}", date.format("%b"), date.day())
}

fn format_short_date_with_year(date: NaiveDate) -> String {
    format!("{}, {}", format_short_date(date), date.year())
}

/// "Feb 9 - Feb 11, 2026", or both years when the range crosses one.
pub fn format_range_label(from: NaiveDate, to: NaiveDate) -> String {
    if from.year() != to.year() {
        return format!(
            "{} - {}",
            format_short_date_with_year(from),
            format_short_date_with_year(to)
        );
    }
    format!("{} - {}", format_short_date(from), format_short_date_with_year(to))
}

/// Monday..Sunday of the last complete week strictly before `today`.
pub fn last_complete_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let weekday = today.weekday().num_days_from_sunday() as i64;
    let back = if weekday == 0 { 7 } else { weekday };
    let last_sunday = add_days(today, -back);
    (add_days(last_sunday, -6), last_sunday)
}
