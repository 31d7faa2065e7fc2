//! Navigation state: the displayed month, the selected day, and the grids
//! derived from them.

use chrono::{DateTime, Local, TimeZone, Utc};
use log::debug;

use crate::calendar::{
    add_months, add_years, local_midnight_utc, normalize_ymd, with_month, with_year,
};
use crate::types::{CalDate, Command, Key, KeyHandler, MonthGrid, iso_timestamp};

/// Construction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Seed for both the reference and selected date; `None` means now.
    pub initial_date: Option<CalDate>,
    /// Consecutive months to build, starting at the reference month.
    pub num_months: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            initial_date: None,
            num_months: 1,
        }
    }
}

/// Reference and selected date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
    pub reference: CalDate,
    pub selected: CalDate,
}

impl NavigationState {
    pub fn new(initial: CalDate) -> Self {
        NavigationState {
            reference: initial,
            selected: initial,
        }
    }

    /// Derive the state that follows `command`.
    pub fn apply(self, command: Command) -> Self {
        let reference = self.reference;
        match command {
            Command::NextMonth => self.with_reference(add_months(reference, 1)),
            Command::PreviousMonth => self.with_reference(add_months(reference, -1)),
            Command::NextYear => self.with_reference(add_years(reference, 1)),
            Command::PreviousYear => self.with_reference(add_years(reference, -1)),
            Command::SetMonth(month) => self.with_reference(with_month(reference, month.into())),
            Command::SetYear(year) => self.with_reference(with_year(reference, year)),
            Command::SetSelectedDate(date) => NavigationState::new(date),
            // The displayed month stays put when a day is picked
            Command::ActivateDay { year, month, day } => NavigationState {
                selected: normalize_ymd(year, month.into(), day.into()),
                ..self
            },
        }
    }

    fn with_reference(self, reference: CalDate) -> Self {
        NavigationState { reference, ..self }
    }
}

/// Snapshot of everything the renderer reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOutput {
    pub months: Vec<MonthGrid>,
    /// 0-indexed month of the first grid.
    pub current_month: Option<u32>,
    pub current_year: Option<i32>,
    pub selected_date: Option<String>,
}

/// Date picker engine bound to a time zone.
///
/// The time zone decides what "today" is and which instant a day's local
/// midnight maps to; grid layout itself is time-zone independent.
#[derive(Debug, Clone)]
pub struct CalendarEngine<Tz: TimeZone = Local> {
    tz: Tz,
    num_months: usize,
    state: NavigationState,
    months: Vec<MonthGrid>,
}

impl CalendarEngine<Local> {
    pub fn new(config: EngineConfig) -> Self {
        CalendarEngine::with_timezone(config, Local)
    }
}

impl<Tz: TimeZone> CalendarEngine<Tz> {
    pub fn with_timezone(config: EngineConfig, tz: Tz) -> Self {
        let initial = config
            .initial_date
            .unwrap_or_else(|| CalDate::from_timestamp(&Utc::now(), &tz));
        let mut engine = CalendarEngine {
            tz,
            num_months: config.num_months.max(1),
            state: NavigationState::new(initial),
            months: Vec::new(),
        };
        engine.rebuild();
        engine
    }

    /// Single entry point for every state change.
    pub fn apply(&mut self, command: Command) {
        self.state = self.state.apply(command);
        self.rebuild();
        debug!(
            "{:?}: reference {}, selected {}",
            command, self.state.reference, self.state.selected
        );
    }

    pub fn go_to_next_month(&mut self) {
        self.apply(Command::NextMonth);
    }

    pub fn go_to_previous_month(&mut self) {
        self.apply(Command::PreviousMonth);
    }

    pub fn go_to_next_year(&mut self) {
        self.apply(Command::NextYear);
    }

    pub fn go_to_previous_year(&mut self) {
        self.apply(Command::PreviousYear);
    }

    /// Jump to a 0-indexed month of the current year.
    pub fn set_month(&mut self, month: i32) {
        self.apply(Command::SetMonth(month));
    }

    pub fn set_year(&mut self, year: i32) {
        self.apply(Command::SetYear(year));
    }

    /// Select `date` and display its month.
    pub fn set_selected_date(&mut self, date: impl Into<CalDate>) {
        self.apply(Command::SetSelectedDate(date.into()));
    }

    /// Select text input as a date; unparseable text selects the invalid date.
    pub fn set_selected_date_str(&mut self, text: &str) {
        let date = CalDate::parse_in(text, &self.tz);
        self.set_selected_date(date);
    }

    /// Select the instant's calendar day in this engine's time zone.
    pub fn set_selected_timestamp(&mut self, instant: &DateTime<Utc>) {
        let date = CalDate::from_timestamp(instant, &self.tz);
        self.set_selected_date(date);
    }

    pub fn activate_day(&mut self, year: i32, month: u32, day: u32) {
        self.apply(Command::ActivateDay { year, month, day });
    }

    /// Forward a key press on a day cell; keys other than Enter are ignored.
    pub fn key_down(&mut self, handler: &KeyHandler, key: &Key) {
        if let Some(command) = handler.handle(key) {
            self.apply(command);
        }
    }

    pub fn months(&self) -> &[MonthGrid] {
        &self.months
    }

    pub fn current_month(&self) -> Option<u32> {
        self.state.reference.month()
    }

    pub fn current_year(&self) -> Option<i32> {
        self.state.reference.year()
    }

    pub fn reference_date(&self) -> CalDate {
        self.state.reference
    }

    pub fn selected(&self) -> CalDate {
        self.state.selected
    }

    /// Selected day's local midnight as an ISO-8601 UTC timestamp.
    pub fn selected_date(&self) -> Option<String> {
        self.state
            .selected
            .naive()
            .and_then(|date| local_midnight_utc(date, &self.tz))
            .map(|instant| iso_timestamp(&instant))
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn output(&self) -> EngineOutput {
        EngineOutput {
            months: self.months.clone(),
            current_month: self.current_month(),
            current_year: self.current_year(),
            selected_date: self.selected_date(),
        }
    }

    fn rebuild(&mut self) {
        let NavigationState {
            reference,
            selected,
        } = self.state;
        self.months = (0..self.num_months)
            .map(|offset| MonthGrid::new(add_months(reference, offset as i64), selected, &self.tz))
            .collect();
    }
}
