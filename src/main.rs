//! Date picker CLI application.
//!
//! # Usage
//! ```ignore
//! datepick                          // Current month, today selected
//! datepick 2020-10-16               // October 2020
//! datepick -n 3                     // Three consecutive months
//! datepick -a next-month -a click=3 // Navigate, then select a day
//! ```

use chrono::{Local, TimeZone, Utc};

use datepick::CalendarEngine;
use datepick::args::Args;
use datepick::error::CalError;
use datepick::formatter::print_output;
use datepick::types::DisplayContext;

fn main() {
    env_logger::init();
    let args = Args::parse();

    let result = if args.utc {
        run(&args, Utc)
    } else {
        run(&args, Local)
    };
    if let Err(e) = result {
        eprintln!("datepick: {}", e);
        std::process::exit(1);
    }
}

fn run<Tz: TimeZone>(args: &Args, tz: Tz) -> Result<(), CalError> {
    let ctx = DisplayContext::new(args, &tz)?;
    let mut engine = CalendarEngine::with_timezone(args.engine_config(&tz)?, tz);

    for action in &args.actions {
        action.apply(&mut engine)?;
    }

    print_output(&ctx, &engine.output());
    Ok(())
}
