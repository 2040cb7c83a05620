//! Date helpers for filters and form defaults. Dates travel as ISO strings
//! (`yyyy-mm-dd`), the format `<input type="date">` uses.

use chrono::{Datelike, Months, NaiveDate};

const ISO: &str = "%Y-%m-%d";

pub fn to_iso(date: NaiveDate) -> String {
    date.format(ISO).to_string()
}

/// Local date of the browser
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn today_iso() -> String {
    to_iso(today())
}

/// First and last day of the month containing `date`
pub fn month_bounds(date: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let first = date.with_day(1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((first, last))
}

/// Bounds of the month before the one containing `date`
pub fn previous_month_bounds(date: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let first = date.with_day(1)?;
    month_bounds(first.pred_opt()?)
}

/// From the first day of the month eleven months back to `date`, twelve
/// calendar months in total
pub fn last_twelve_months(date: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let first = date.with_day(1)?.checked_sub_months(Months::new(11))?;
    Some((first, date))
}

pub fn iso_pair(range: Option<(NaiveDate, NaiveDate)>) -> (String, String) {
    range
        .map(|(a, b)| (to_iso(a), to_iso(b)))
        .unwrap_or_default()
}
