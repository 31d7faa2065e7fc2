//! Command-line argument parsing using clap.
//!
//! Arguments: `[date] [-n months] [-a action]...`

use std::io::IsTerminal;
use std::str::FromStr;

use chrono::{NaiveDate, TimeZone, Utc};
use clap::{Parser, ValueHint};

use crate::engine::{CalendarEngine, EngineConfig};
use crate::error::CalError;
use crate::types::{
    COLOR_ENABLED_BY_DEFAULT, CalDate, ColumnsMode, DayProps, DisplayContext, GUTTER_WIDTH, Key,
    MAX_MONTHS,
};

#[derive(Parser, Debug)]
#[command(name = "datepick")]
#[command(about = "Displays a date picker month grid and applies navigation actions", long_about = None)]
#[command(version)]
#[command(after_help = HELP_MESSAGE)]
pub struct Args {
    /// Initial date (2020-10-16, RFC 3339 or "Fri Oct 16 2020"); defaults to today.
    #[arg(index = 1, value_name = "date", value_hint = ValueHint::Other)]
    pub date: Option<String>,

    /// Number of consecutive months to display.
    #[arg(
        short = 'n',
        long = "months",
        default_value_t = 1,
        help_heading = "Display options",
        value_name = "num"
    )]
    pub months: usize,

    /// Navigation action, applied in order (repeatable).
    #[arg(
        short = 'a',
        long = "action",
        help_heading = "Navigation",
        value_name = "action",
        value_parser = parse_action
    )]
    pub actions: Vec<Action>,

    /// Interpret dates in UTC instead of the local time zone.
    #[arg(long, help_heading = "Calendar options")]
    pub utc: bool,

    /// Disable colorized output.
    #[arg(long, help_heading = "Output options")]
    pub color: bool,

    /// Number of columns for multiple months (or "auto" for terminal width).
    #[arg(
        short = 'c',
        long = "columns",
        help_heading = "Output options",
        value_name = "width"
    )]
    pub columns: Option<String>,
}

/// Help message displayed with --help.
const HELP_MESSAGE: &str = "Actions:
  next-month, prev-month     Move the displayed month
  next-year, prev-year       Move the displayed year
  month=<0-11>               Jump to a month (0 = January) of the displayed year
  year=<year>                Jump to a year, keeping the month
  select=<date>              Select a date and display its month
  click=<day>                Click a day of the first displayed month
  key=<day>:<key>            Press a key on a day (only Enter selects)

Examples:
  datepick 2020-10-16                    Display October 2020
  datepick -n 2 2020-10-16               Display October and November 2020
  datepick -a next-month 2020-10-16      Display November 2020
  datepick -a click=25 2020-10-16        Select October 25th
  datepick -a key=25:Enter 2020-10-16    Same, via the keyboard";

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn engine_config<Tz: TimeZone>(&self, tz: &Tz) -> Result<EngineConfig, CalError> {
        if !(1..=MAX_MONTHS).contains(&self.months) {
            return Err(CalError::InvalidMonthCount(self.months));
        }

        let initial_date = match &self.date {
            Some(text) => CalDate::parse_in(text, tz),
            None => get_today_date(tz),
        };

        Ok(EngineConfig {
            initial_date: Some(initial_date),
            num_months: self.months,
        })
    }
}

/// Scripted interaction with the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    NextMonth,
    PreviousMonth,
    NextYear,
    PreviousYear,
    Month(i32),
    Year(i32),
    Select(String),
    Click(u32),
    KeyDown(u32, String),
}

impl FromStr for Action {
    type Err = CalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalError::InvalidAction(s.to_string());

        match s.split_once('=') {
            None => match s {
                "next-month" => Ok(Action::NextMonth),
                "prev-month" => Ok(Action::PreviousMonth),
                "next-year" => Ok(Action::NextYear),
                "prev-year" => Ok(Action::PreviousYear),
                _ => Err(invalid()),
            },
            Some(("month", value)) => value.parse().map(Action::Month).map_err(|_| invalid()),
            Some(("year", value)) => value.parse().map(Action::Year).map_err(|_| invalid()),
            Some(("select", value)) => Ok(Action::Select(value.to_string())),
            Some(("click", value)) => value.parse().map(Action::Click).map_err(|_| invalid()),
            Some(("key", value)) => {
                let (day, key) = value.split_once(':').ok_or_else(invalid)?;
                let day = day.parse().map_err(|_| invalid())?;
                Ok(Action::KeyDown(day, key.to_string()))
            }
            Some(_) => Err(invalid()),
        }
    }
}

fn parse_action(s: &str) -> Result<Action, CalError> {
    s.parse()
}

impl Action {
    /// Apply to `engine`. Clicks and key presses target the first grid.
    pub fn apply<Tz: TimeZone>(&self, engine: &mut CalendarEngine<Tz>) -> Result<(), CalError> {
        match self {
            Action::NextMonth => engine.go_to_next_month(),
            Action::PreviousMonth => engine.go_to_previous_month(),
            Action::NextYear => engine.go_to_next_year(),
            Action::PreviousYear => engine.go_to_previous_year(),
            Action::Month(month) => engine.set_month(*month),
            Action::Year(year) => engine.set_year(*year),
            Action::Select(text) => engine.set_selected_date_str(text),
            Action::Click(day) => {
                let props = day_props(engine, *day)?;
                if let Some(command) = props.on_click {
                    engine.apply(command);
                }
            }
            Action::KeyDown(day, key) => {
                let props = day_props(engine, *day)?;
                if let Some(handler) = props.on_key_down {
                    engine.key_down(&handler, &Key::from(key.as_str()));
                }
            }
        }
        Ok(())
    }
}

fn day_props<Tz: TimeZone>(
    engine: &CalendarEngine<Tz>,
    day: u32,
) -> Result<DayProps, CalError> {
    engine
        .months()
        .first()
        .and_then(|grid| grid.find_day(day))
        .map(|cell| cell.props())
        .ok_or(CalError::DayNotShown(day))
}

impl DisplayContext {
    pub fn new<Tz: TimeZone>(args: &Args, tz: &Tz) -> Result<Self, CalError> {
        let color = !args.color && COLOR_ENABLED_BY_DEFAULT && std::io::stdout().is_terminal();

        let columns = match args.columns.as_deref() {
            Some("auto") | None => ColumnsMode::Auto,
            Some(s) => {
                let n = s
                    .parse::<u32>()
                    .map_err(|_| CalError::InvalidColumns(s.to_string()))?;
                if n == 0 {
                    return Err(CalError::ZeroColumns);
                }
                ColumnsMode::Fixed(n)
            }
        };

        Ok(DisplayContext {
            color,
            today: get_today_date(tz),
            gutter_width: GUTTER_WIDTH,
            columns,
        })
    }
}

/// Get today's date, respecting DATEPICK_TEST_TIME environment variable for testing.
pub fn get_today_date<Tz: TimeZone>(tz: &Tz) -> CalDate {
    if let Ok(test_time) = std::env::var("DATEPICK_TEST_TIME")
        && let Ok(date) = NaiveDate::parse_from_str(&test_time, "%Y-%m-%d")
    {
        return date.into();
    }
    CalDate::from_timestamp(&Utc::now(), tz)
}
