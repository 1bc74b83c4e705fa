use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use chrono::Local;
use helixis_core::domain::parse_date_time;
use helixis_core::services::{TouchRequest, local_time, touch_file};

use crate::output::print_json;

/// `selected` holds the modified, accessed and created flags in that order.
pub fn run(
    file: &Path,
    date: Option<&str>,
    format: &str,
    selected: [bool; 3],
    json: bool,
) -> Result<ExitCode> {
    let when = match date {
        Some(raw) => local_time(parse_date_time(raw, format)?)?,
        None => Local::now(),
    };
    let [modified, accessed, created] = selected;
    let report = touch_file(file, &TouchRequest::new(when, modified, accessed, created))?;

    if json {
        print_json(&report)?;
    } else {
        for timestamp in &report.updated {
            println!(
                "{} of {} updated to {}",
                timestamp.label(),
                file.display(),
                report.time.format("%Y-%m-%d %H:%M:%S")
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}
