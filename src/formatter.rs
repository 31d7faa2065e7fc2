//! Terminal rendering of month grids with color support.

use chrono::Weekday;
use unicode_width::UnicodeWidthStr;

use crate::engine::EngineOutput;
use crate::types::{
    COLOR_RED, COLOR_RESET, COLOR_REVERSE, COLOR_SAND_YELLOW, COLOR_TEAL, ColumnsMode, DayCell,
    DisplayContext, MONTH_WIDTH, MonthGrid,
};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Monday-first week, matching the grid slots.
pub const WEEKDAY_ORDER: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// English name of a 0-indexed month.
pub fn get_month_name(month: u32) -> &'static str {
    MONTH_NAMES.get(month as usize).copied().unwrap_or("")
}

/// 2-character weekday abbreviation.
pub fn get_weekday_short_name(weekday: Weekday) -> String {
    weekday.to_string().chars().take(2).collect()
}

/// Format month header with year and optional color.
pub fn format_month_header(grid: &MonthGrid, width: usize, color: bool) -> String {
    let header = match (grid.month(), grid.year()) {
        (Some(month), Some(year)) => format!("{} {}", get_month_name(month), year),
        _ => String::new(),
    };
    let centered = center_text(&header, width);
    if color {
        format!("{}{}{}", COLOR_TEAL, centered, COLOR_RESET)
    } else {
        centered
    }
}

/// Center text within a specified width, accounting for Unicode character widths.
fn center_text(text: &str, width: usize) -> String {
    let text_width = text.width();
    if text_width >= width {
        return text.to_string();
    }
    let total_padding = width - text_width;
    let left_padding = total_padding.div_ceil(2);
    let right_padding = total_padding - left_padding;
    format!(
        "{}{}{}",
        " ".repeat(left_padding),
        text,
        " ".repeat(right_padding)
    )
}

pub fn format_weekday_headers(color: bool) -> String {
    let names: Vec<String> = WEEKDAY_ORDER
        .iter()
        .map(|&weekday| get_weekday_short_name(weekday))
        .collect();
    let line = names.join(" ");
    if color {
        format!("{}{}{}", COLOR_SAND_YELLOW, line, COLOR_RESET)
    } else {
        line
    }
}

/// Format one slot of a week row.
///
/// Color priority: selected > today > weekend > regular
fn format_cell(ctx: &DisplayContext, cell: &DayCell, slot: usize) -> String {
    let is_last = slot + 1 == WEEKDAY_ORDER.len();
    let DayCell::Day(day) = cell else {
        return if is_last { "  ".into() } else { "   ".into() };
    };

    let day_str = format!("{:>2}", day.day);
    let formatted = if !ctx.color {
        day_str
    } else if day.is_selected {
        format!("{}{}{}", COLOR_REVERSE, day_str, COLOR_RESET)
    } else if ctx.today.naive() == Some(day.date) {
        format!("{}{}{}", COLOR_TEAL, day_str, COLOR_RESET)
    } else if matches!(WEEKDAY_ORDER[slot], Weekday::Sat | Weekday::Sun) {
        format!("{}{}{}", COLOR_RED, day_str, COLOR_RESET)
    } else {
        day_str
    };

    if is_last {
        formatted
    } else {
        format!("{} ", formatted)
    }
}

/// Format month as grid of lines.
pub fn format_month_grid(ctx: &DisplayContext, grid: &MonthGrid) -> Vec<String> {
    let mut lines = Vec::with_capacity(grid.weeks.len() + 2);
    lines.push(format_month_header(grid, MONTH_WIDTH, ctx.color));
    lines.push(format_weekday_headers(ctx.color));

    for week in &grid.weeks {
        let line: String = week
            .iter()
            .enumerate()
            .map(|(slot, cell)| format_cell(ctx, cell, slot))
            .collect();
        lines.push(line);
    }

    lines
}

/// Join month grids side by side, one row of text per line.
pub fn format_months_side_by_side(ctx: &DisplayContext, months: &[MonthGrid]) -> Vec<String> {
    let grids: Vec<Vec<String>> = months.iter().map(|m| format_month_grid(ctx, m)).collect();
    let max_height = grids.iter().map(|g| g.len()).max().unwrap_or(0);
    let mut lines = Vec::with_capacity(max_height);

    for row in 0..max_height {
        let mut line = String::new();
        for (i, grid) in grids.iter().enumerate() {
            let is_last = i + 1 == grids.len();
            let text = grid.get(row).map(String::as_str).unwrap_or("");
            line.push_str(text);
            if !is_last {
                // ANSI sequences have no display width
                let visible = strip_ansi(text).width();
                line.push_str(&" ".repeat(MONTH_WIDTH.saturating_sub(visible)));
                line.push_str(&" ".repeat(ctx.gutter_width));
            }
        }
        lines.push(line.trim_end().to_string());
    }

    lines
}

fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_escape = false;
    for c in text.chars() {
        match (in_escape, c) {
            (false, '\x1b') => in_escape = true,
            (true, 'm') => in_escape = false,
            (true, _) => {}
            (false, c) => out.push(c),
        }
    }
    out
}

/// Render the engine state: month grids in rows, then the selected date.
pub fn format_output(ctx: &DisplayContext, output: &EngineOutput) -> Vec<String> {
    let per_row = months_per_row(ctx).max(1) as usize;
    let mut lines = Vec::new();

    for (i, chunk) in output.months.chunks(per_row).enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.extend(format_months_side_by_side(ctx, chunk));
    }

    lines.push(String::new());
    lines.push(format!(
        "Selected: {}",
        output.selected_date.as_deref().unwrap_or("")
    ));
    lines
}

pub fn print_output(ctx: &DisplayContext, output: &EngineOutput) {
    for line in format_output(ctx, output) {
        println!("{}", line);
    }
}

pub fn months_per_row(ctx: &DisplayContext) -> u32 {
    match ctx.columns {
        ColumnsMode::Fixed(n) => n,
        ColumnsMode::Auto => {
            // ~20 chars per month + gutter, clamp to 1-3 for readability
            let month_width = MONTH_WIDTH + ctx.gutter_width;
            if let Some(term_width) = get_terminal_width() {
                (term_width / month_width as u32).clamp(1, 3)
            } else {
                3
            }
        }
    }
}

/// Get terminal width using terminal_size crate.
fn get_terminal_width() -> Option<u32> {
    terminal_size::terminal_size().map(|(w, _)| w.0 as u32)
}
