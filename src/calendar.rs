//! Calendar arithmetic and month grid construction.
//!
//! Month and day overflow is resolved through an explicit day-count
//! normalization instead of relying on implicit rollover of a date type.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc, Weekday};

use crate::types::{CalDate, DAYS_PER_WEEK, Day, DayCell, MonthGrid, blank_week};

/// Check if a year is a leap year under Gregorian rules.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Resolve a year, 0-indexed month and day that may each be out of range.
///
/// Excess months roll into the year and excess days into the following
/// months, so `(2020, 12, 1)` is 2021-01-01 and `(2020, 2, 0)` is 2020-02-29.
pub fn normalize_ymd(year: i32, month: i64, day: i64) -> CalDate {
    let Some(total_months) = i64::from(year)
        .checked_mul(12)
        .and_then(|m| m.checked_add(month))
    else {
        return CalDate::INVALID;
    };
    let Ok(year) = i32::try_from(total_months.div_euclid(12)) else {
        return CalDate::INVALID;
    };
    let month = total_months.rem_euclid(12) as u32 + 1;
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return CalDate::INVALID;
    };

    let offset = day.saturating_sub(1);
    let date = if offset >= 0 {
        first.checked_add_days(Days::new(offset.unsigned_abs()))
    } else {
        first.checked_sub_days(Days::new(offset.unsigned_abs()))
    };
    date.into()
}

/// Number of days in a 0-indexed month, 0 when the month is out of range.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    // Day 0 of the next month is the last day of this one.
    normalize_ymd(year, i64::from(month) + 1, 0)
        .day()
        .unwrap_or(0)
}

/// Slot of a weekday in a Monday-first week.
pub fn weekday_slot(weekday: Weekday) -> usize {
    match weekday.num_days_from_sunday() {
        0 => DAYS_PER_WEEK - 1,
        n => n as usize - 1,
    }
}

/// Move `date` to another month, clamping the day to the month's length.
fn move_to_month(date: CalDate, year: i32, month: i64) -> CalDate {
    let (Some(day), Some(first)) = (date.day(), normalize_ymd(year, month, 1).naive()) else {
        return CalDate::INVALID;
    };
    let day = day.min(days_in_month(first.year(), first.month0()));
    first.with_day(day).into()
}

/// Replace the 0-indexed month; values outside 0..12 roll over the year.
pub fn with_month(date: CalDate, month: i64) -> CalDate {
    match date.year() {
        Some(year) => move_to_month(date, year, month),
        None => CalDate::INVALID,
    }
}

pub fn with_year(date: CalDate, year: i32) -> CalDate {
    match date.month() {
        Some(month) => move_to_month(date, year, i64::from(month)),
        None => CalDate::INVALID,
    }
}

pub fn add_months(date: CalDate, months: i64) -> CalDate {
    match date.month() {
        Some(month) => with_month(date, i64::from(month) + months),
        None => CalDate::INVALID,
    }
}

pub fn add_years(date: CalDate, years: i32) -> CalDate {
    match date.year().and_then(|year| year.checked_add(years)) {
        Some(year) => with_year(date, year),
        None => CalDate::INVALID,
    }
}

/// Replace the day of month, rolling over into neighbouring months.
pub fn with_day(date: CalDate, day: u32) -> CalDate {
    match (date.year(), date.month()) {
        (Some(year), Some(month)) => normalize_ymd(year, i64::from(month), i64::from(day)),
        _ => CalDate::INVALID,
    }
}

/// The instant at which `date` starts in `tz`.
///
/// When midnight falls into a DST gap the first valid hour is used.
pub fn local_midnight_utc<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<DateTime<Utc>> {
    let midnight = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            midnight
                .checked_add_signed(TimeDelta::hours(1))
                .and_then(|later| tz.from_local_datetime(&later).earliest())
        })
        .map(|instant| instant.with_timezone(&Utc))
}

impl MonthGrid {
    /// Build the grid for the month containing `reference`.
    ///
    /// Weeks run Monday to Sunday; a new week starts on every Monday except
    /// the first of the month, so only the first and last week carry blanks.
    pub fn new<Tz: TimeZone>(reference: CalDate, selected: CalDate, tz: &Tz) -> Self {
        let Some(reference) = reference.naive() else {
            return MonthGrid::empty();
        };
        let (year, month) = (reference.year(), reference.month0());
        let days_in_month = days_in_month(year, month);

        let mut weeks = vec![blank_week()];
        for day in 1..=days_in_month {
            let Some(date) = NaiveDate::from_ymd_opt(year, month + 1, day) else {
                continue;
            };
            let weekday = date.weekday();
            if weekday == Weekday::Mon && day != 1 {
                weeks.push(blank_week());
            }

            let cell = DayCell::Day(Day {
                day,
                date,
                timestamp: local_midnight_utc(date, tz),
                is_selected: selected.naive() == Some(date),
            });
            if let Some(week) = weeks.last_mut() {
                week[weekday_slot(weekday)] = cell;
            }
        }

        MonthGrid {
            reference: reference.with_day(1).into(),
            weeks,
        }
    }
}
