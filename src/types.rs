//! Type definitions and constants for the date picker engine.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use log::warn;

/// A calendar date with the time of day stripped, or the invalid-date sentinel.
///
/// Every derived value of an invalid date is empty: grids have no weeks,
/// month and year read as `None`, and ISO strings are absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalDate(Option<NaiveDate>);

impl CalDate {
    pub const INVALID: CalDate = CalDate(None);

    /// Build a date from a 0-indexed month. Out-of-range parts give `INVALID`.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Self {
        CalDate(month.checked_add(1).and_then(|m| NaiveDate::from_ymd_opt(year, m, day)))
    }

    /// Calendar date of `instant` as seen from `tz`.
    pub fn from_timestamp<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> Self {
        CalDate(Some(instant.with_timezone(tz).date_naive()))
    }

    /// Parse user-supplied text, degrading to `INVALID` instead of failing.
    ///
    /// Accepted forms:
    /// - `2020-10-16`
    /// - `2020-10-16T08:30:00` (time is discarded)
    /// - `2020-10-16T08:30:00+02:00` (RFC 3339, converted into `tz`)
    /// - `Fri Oct 16 2020`
    pub fn parse_in<Tz: TimeZone>(text: &str, tz: &Tz) -> Self {
        let text = text.trim();

        if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
            return CalDate::from_timestamp(&instant.with_timezone(&Utc), tz);
        }
        for format in DATETIME_FORMATS {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
                return datetime.into();
            }
        }
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(text, format) {
                return date.into();
            }
        }

        warn!("unrecognized date {:?}, treating it as an invalid date", text);
        CalDate::INVALID
    }

    pub fn naive(self) -> Option<NaiveDate> {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self.0.is_some()
    }

    pub fn year(self) -> Option<i32> {
        self.0.map(|d| d.year())
    }

    /// 0-indexed month.
    pub fn month(self) -> Option<u32> {
        self.0.map(|d| d.month0())
    }

    pub fn day(self) -> Option<u32> {
        self.0.map(|d| d.day())
    }
}

impl From<NaiveDate> for CalDate {
    fn from(date: NaiveDate) -> Self {
        CalDate(Some(date))
    }
}

impl From<NaiveDateTime> for CalDate {
    fn from(datetime: NaiveDateTime) -> Self {
        CalDate(Some(datetime.date()))
    }
}

impl From<Option<NaiveDate>> for CalDate {
    fn from(date: Option<NaiveDate>) -> Self {
        CalDate(date)
    }
}

impl fmt::Display for CalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            None => f.write_str("Invalid Date"),
        }
    }
}

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%a %b %d %Y"];

/// Serialize an instant the way browsers print `Date.toISOString()`.
pub fn iso_timestamp(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Key pressed while a day cell has focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other(String),
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        match name {
            "Enter" => Key::Enter,
            other => Key::Other(other.to_string()),
        }
    }
}

/// State transition requested by the UI layer.
///
/// Months are 0-indexed throughout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NextMonth,
    PreviousMonth,
    NextYear,
    PreviousYear,
    SetMonth(i32),
    SetYear(i32),
    SetSelectedDate(CalDate),
    /// Select `day` within the given displayed month.
    ActivateDay { year: i32, month: u32, day: u32 },
}

/// Key-press behaviour of an interactive day cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHandler {
    command: Command,
}

impl KeyHandler {
    pub fn new(command: Command) -> Self {
        KeyHandler { command }
    }

    /// Only Enter activates the cell; any other key does nothing.
    pub fn handle(&self, key: &Key) -> Option<Command> {
        match key {
            Key::Enter => Some(self.command),
            Key::Other(_) => None,
        }
    }
}

/// Stable identity of a grid slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayKey {
    /// Blank cells are keyed by their 0-based slot in the week.
    Slot(usize),
    Date(NaiveDate),
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayKey::Slot(slot) => write!(f, "{}", slot),
            DayKey::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// Properties handed to the renderer for one grid slot.
///
/// Everything except `key` is `None` for blank cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayProps {
    pub is_selected: Option<bool>,
    pub tab_index: Option<i32>,
    pub role: Option<&'static str>,
    pub key: DayKey,
    pub on_key_down: Option<KeyHandler>,
    pub on_click: Option<Command>,
}

/// A real day of the displayed month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Day {
    pub day: u32,
    pub date: NaiveDate,
    /// Local midnight of `date` as an absolute instant.
    pub timestamp: Option<DateTime<Utc>>,
    pub is_selected: bool,
}

impl Day {
    /// Command that selects this day within its own month.
    pub fn activation(&self) -> Command {
        Command::ActivateDay {
            year: self.date.year(),
            month: self.date.month0(),
            day: self.day,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCell {
    Blank { slot: usize },
    Day(Day),
}

impl DayCell {
    pub fn day(&self) -> Option<u32> {
        match self {
            DayCell::Day(day) => Some(day.day),
            DayCell::Blank { .. } => None,
        }
    }

    /// ISO-8601 UTC timestamp of the day's local midnight.
    pub fn date(&self) -> Option<String> {
        match self {
            DayCell::Day(day) => day.timestamp.as_ref().map(iso_timestamp),
            DayCell::Blank { .. } => None,
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, DayCell::Day(day) if day.is_selected)
    }

    pub fn key(&self) -> DayKey {
        match self {
            DayCell::Day(day) => DayKey::Date(day.date),
            DayCell::Blank { slot } => DayKey::Slot(*slot),
        }
    }

    pub fn props(&self) -> DayProps {
        match self {
            DayCell::Day(day) => DayProps {
                is_selected: Some(day.is_selected),
                tab_index: Some(DAY_TAB_INDEX),
                role: Some(DAY_ROLE),
                key: self.key(),
                on_key_down: Some(KeyHandler::new(day.activation())),
                on_click: Some(day.activation()),
            },
            DayCell::Blank { slot } => DayProps {
                is_selected: None,
                tab_index: None,
                role: None,
                key: DayKey::Slot(*slot),
                on_key_down: None,
                on_click: None,
            },
        }
    }
}

/// Monday-first row of seven slots.
pub type Week = [DayCell; DAYS_PER_WEEK];

pub fn blank_week() -> Week {
    std::array::from_fn(|slot| DayCell::Blank { slot })
}

/// Week/day matrix for one displayed month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    /// First day of the month, or `INVALID`.
    pub reference: CalDate,
    pub weeks: Vec<Week>,
}

impl MonthGrid {
    pub fn empty() -> Self {
        MonthGrid {
            reference: CalDate::INVALID,
            weeks: Vec::new(),
        }
    }

    /// 0-indexed month.
    pub fn month(&self) -> Option<u32> {
        self.reference.month()
    }

    pub fn year(&self) -> Option<i32> {
        self.reference.year()
    }

    pub fn days(&self) -> impl Iterator<Item = &Day> {
        self.weeks.iter().flatten().filter_map(|cell| match cell {
            DayCell::Day(day) => Some(day),
            DayCell::Blank { .. } => None,
        })
    }

    pub fn find_day(&self, day: u32) -> Option<&DayCell> {
        self.weeks
            .iter()
            .flatten()
            .find(|cell| cell.day() == Some(day))
    }

    pub fn selected_day(&self) -> Option<u32> {
        self.days().find(|d| d.is_selected).map(|d| d.day)
    }

    /// Day numbers per week, `None` for blanks.
    pub fn day_numbers(&self) -> Vec<[Option<u32>; DAYS_PER_WEEK]> {
        self.weeks
            .iter()
            .map(|week| std::array::from_fn(|slot| week[slot].day()))
            .collect()
    }
}

/// Column display mode for multi-month layouts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnsMode {
    /// Fixed number of columns.
    Fixed(u32),
    /// Auto-detect from terminal width.
    Auto,
}

/// Terminal rendering options.
#[derive(Clone, Debug)]
pub struct DisplayContext {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
    /// Today's date for highlighting.
    pub today: CalDate,
    /// Width of gutter between months in multi-month display.
    pub gutter_width: usize,
    pub columns: ColumnsMode,
}

pub const DAYS_PER_WEEK: usize = 7;
pub const DAY_ROLE: &str = "button";
pub const DAY_TAB_INDEX: i32 = 0;

pub const MONTH_WIDTH: usize = 20;
pub const GUTTER_WIDTH: usize = 2;
pub const MAX_MONTHS: usize = 120;

// Color is enabled by default for better user experience
pub const COLOR_ENABLED_BY_DEFAULT: bool = true;

// ANSI color codes
pub const COLOR_RESET: &str = "\x1b[0m";
pub const COLOR_REVERSE: &str = "\x1b[7m";
pub const COLOR_RED: &str = "\x1b[91m";
pub const COLOR_TEAL: &str = "\x1b[96m";
pub const COLOR_SAND_YELLOW: &str = "\x1b[93m";
