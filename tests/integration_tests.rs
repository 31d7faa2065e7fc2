//! Integration tests: grid invariants across many months and the `datepick` binary.

use assert_cmd::Command;
use chrono::{Datelike, NaiveDate, Utc};
use predicates::prelude::*;

use datepick::calendar::{days_in_month, weekday_slot};
use datepick::formatter::format_output;
use datepick::types::{CalDate, ColumnsMode, DayCell, DisplayContext, MonthGrid};
use datepick::{CalendarEngine, EngineConfig};

fn test_context() -> DisplayContext {
    DisplayContext {
        color: false,
        today: CalDate::INVALID,
        gutter_width: 2,
        columns: ColumnsMode::Fixed(3),
    }
}

fn every_month() -> impl Iterator<Item = (i32, u32)> {
    (1890..=2110).flat_map(|year| (0..12).map(move |month| (year, month)))
}

fn grid_for(year: i32, month: u32) -> MonthGrid {
    MonthGrid::new(CalDate::from_ymd(year, month, 1), CalDate::INVALID, &Utc)
}

mod grid_invariants {
    use super::*;

    #[test]
    fn day_count_matches_month_length() {
        for (year, month) in every_month() {
            let grid = grid_for(year, month);
            let expected = days_in_month(year, month) as usize;
            assert!((28..=31).contains(&expected));
            assert_eq!(grid.days().count(), expected, "{year}-{month}");
        }
    }

    #[test]
    fn days_are_in_order() {
        for (year, month) in every_month() {
            let grid = grid_for(year, month);
            let days: Vec<u32> = grid.days().map(|d| d.day).collect();
            let expected: Vec<u32> = (1..=days_in_month(year, month)).collect();
            assert_eq!(days, expected, "{year}-{month}");
        }
    }

    #[test]
    fn first_day_sits_in_its_weekday_slot() {
        for (year, month) in every_month() {
            let grid = grid_for(year, month);
            let first = NaiveDate::from_ymd_opt(year, month + 1, 1).unwrap();
            let slot = weekday_slot(first.weekday());
            assert_eq!(grid.weeks[0][slot].day(), Some(1), "{year}-{month}");
        }
    }

    #[test]
    fn every_day_sits_in_its_weekday_slot() {
        for (year, month) in every_month() {
            for week in &grid_for(year, month).weeks {
                for (slot, cell) in week.iter().enumerate() {
                    if let DayCell::Day(day) = cell {
                        assert_eq!(weekday_slot(day.date.weekday()), slot);
                    }
                }
            }
        }
    }

    #[test]
    fn blanks_only_pad_first_and_last_week() {
        for (year, month) in every_month() {
            let grid = grid_for(year, month);
            let last = grid.weeks.len() - 1;
            for (index, week) in grid.weeks.iter().enumerate() {
                let pattern: Vec<bool> = week.iter().map(|c| c.day().is_some()).collect();
                if index == 0 {
                    // blanks then days
                    assert!(pattern.windows(2).all(|w| w[0] <= w[1]), "{year}-{month}");
                }
                if index == last {
                    // days then blanks
                    assert!(pattern.windows(2).all(|w| w[0] >= w[1]), "{year}-{month}");
                }
                if index != 0 && index != last {
                    assert!(pattern.iter().all(|&is_day| is_day), "{year}-{month}");
                }
            }
        }
    }

    #[test]
    fn week_count_is_four_to_six() {
        for (year, month) in every_month() {
            let weeks = grid_for(year, month).weeks.len();
            assert!((4..=6).contains(&weeks), "{year}-{month}: {weeks}");
        }
    }

    #[test]
    fn no_date_appears_twice_across_months() {
        let engine = CalendarEngine::with_timezone(
            EngineConfig {
                initial_date: Some(CalDate::from_ymd(2020, 9, 16)),
                num_months: 14,
            },
            Utc,
        );
        let mut dates: Vec<NaiveDate> = engine
            .months()
            .iter()
            .flat_map(|m| m.days().map(|d| d.date))
            .collect();
        let total = dates.len();
        dates.sort();
        dates.dedup();
        assert_eq!(dates.len(), total);
    }
}

mod rendering {
    use super::*;

    fn october_output(num_months: usize) -> Vec<String> {
        let engine = CalendarEngine::with_timezone(
            EngineConfig {
                initial_date: Some(CalDate::from_ymd(2020, 9, 16)),
                num_months,
            },
            Utc,
        );
        format_output(&test_context(), &engine.output())
    }

    #[test]
    fn single_month() {
        let lines = october_output(1);
        assert_eq!(lines[0], "    October 2020");
        assert_eq!(lines[1], "Mo Tu We Th Fr Sa Su");
        assert_eq!(lines[2], "          1  2  3  4");
        assert_eq!(lines[6], "26 27 28 29 30 31");
        assert_eq!(lines.last().unwrap(), "Selected: 2020-10-16T00:00:00.000Z");
    }

    #[test]
    fn side_by_side() {
        let lines = october_output(2);
        assert_eq!(lines[0], "    October 2020          November 2020");
        assert_eq!(lines[2], "          1  2  3  4                     1");
    }

    #[test]
    fn invalid_date_renders_empty() {
        let engine = CalendarEngine::with_timezone(
            EngineConfig {
                initial_date: Some(CalDate::INVALID),
                num_months: 1,
            },
            Utc,
        );
        let lines = format_output(&test_context(), &engine.output());
        assert_eq!(lines.last().unwrap(), "Selected: ");
        assert!(!lines.iter().any(|l| l.contains('1')));
    }
}

mod cli {
    use super::*;

    fn datepick() -> Command {
        let mut cmd = Command::cargo_bin("datepick").unwrap();
        cmd.env("DATEPICK_TEST_TIME", "2020-10-16").arg("--utc");
        cmd
    }

    #[test]
    fn defaults_to_test_time() {
        datepick()
            .assert()
            .success()
            .stdout(predicate::str::contains("October 2020"))
            .stdout(predicate::str::contains(
                "Selected: 2020-10-16T00:00:00.000Z",
            ));
    }

    #[test]
    fn explicit_date() {
        datepick()
            .arg("Mon Feb 29 2016")
            .assert()
            .success()
            .stdout(predicate::str::contains("February 2016"))
            .stdout(predicate::str::contains("29"));
    }

    #[test]
    fn next_month_action() {
        datepick()
            .args(["-a", "next-month"])
            .assert()
            .success()
            .stdout(predicate::str::contains("November 2020"))
            .stdout(predicate::str::contains(
                "Selected: 2020-10-16T00:00:00.000Z",
            ));
    }

    #[test]
    fn click_action() {
        datepick()
            .args(["-a", "click=25"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Selected: 2020-10-25T00:00:00.000Z",
            ));
    }

    #[test]
    fn key_action_ignores_other_keys() {
        datepick()
            .args(["-a", "key=25:Down"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Selected: 2020-10-16T00:00:00.000Z",
            ));

        datepick()
            .args(["-a", "key=25:Enter"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Selected: 2020-10-25T00:00:00.000Z",
            ));
    }

    #[test]
    fn month_and_year_actions() {
        datepick()
            .args(["-a", "year=1987", "-a", "month=2"])
            .assert()
            .success()
            .stdout(predicate::str::contains("March 1987"));
    }

    #[test]
    fn select_action() {
        datepick()
            .args(["-a", "select=2021-01-05"])
            .assert()
            .success()
            .stdout(predicate::str::contains("January 2021"))
            .stdout(predicate::str::contains(
                "Selected: 2021-01-05T00:00:00.000Z",
            ));
    }

    #[test]
    fn multiple_months() {
        datepick()
            .args(["-n", "2", "-c", "1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("October 2020"))
            .stdout(predicate::str::contains("November 2020"));
    }

    #[test]
    fn invalid_date_is_not_an_error() {
        datepick()
            .arg("yesterday-ish")
            .assert()
            .success()
            .stdout(predicate::str::contains("Selected: \n"));
    }

    #[test]
    fn unknown_action_fails() {
        datepick()
            .args(["-a", "sideways"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid action: sideways"));
    }

    #[test]
    fn day_outside_month_fails() {
        datepick()
            .args(["-a", "next-month", "-a", "click=31"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Day 31 is not shown"));
    }

    #[test]
    fn zero_months_fails() {
        datepick()
            .args(["-n", "0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid number of months: 0"));
    }

    #[test]
    fn zero_columns_fails() {
        datepick()
            .args(["-c", "0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("datepick: Columns must be positive"));
    }
}
