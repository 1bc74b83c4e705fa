use std::fmt::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use helixis_core::domain::{DateSpan, parse_date_time};
use serde_json::json;

use crate::output::print_json;

pub fn difference(first: &str, second: &str, format: &str, json: bool) -> Result<ExitCode> {
    let start = parse_date_time(first, format)?;
    let end = parse_date_time(second, format)?;
    let span = DateSpan::between(start, end)?;
    let from = format_date(start, format)?;
    let to = format_date(end, format)?;

    if json {
        print_json(&json!({
            "from": from,
            "to": to,
            "span": span,
            "text": span.to_string(),
        }))?;
    } else {
        println!("Time from {from} to {to}:");
        println!("{span}");
    }
    Ok(ExitCode::SUCCESS)
}

fn format_date(date: NaiveDateTime, format: &str) -> Result<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(format)).context("unable to format date")?;
    Ok(out)
}
