//! Trading-calendar arithmetic. Weekends are closed; holidays show up as
//! ordinary data gaps in the price source.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Weekdays in the half-open range `[start, end)`, in order.
pub fn weekdays_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start
        .iter_days()
        .take_while(move |date| *date < end)
        .filter(|date| is_weekday(*date))
}

pub fn n_days_from(date: NaiveDate, delta: i64) -> NaiveDate {
    date + Duration::days(delta)
}
