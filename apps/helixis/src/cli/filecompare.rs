use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use helixis_core::services::compare_files;

use crate::output::print_json;

/// Exits 1 when the files differ, mirroring `cmp`.
pub fn run(first: &Path, second: &Path, json: bool) -> Result<ExitCode> {
    let comparison = compare_files(first, second)?;

    if json {
        print_json(&comparison)?;
    } else {
        match comparison.mismatch {
            None => println!("Files are identical."),
            Some(offset) => println!("Files differ at byte position: {offset}"),
        }
    }

    Ok(if comparison.identical() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
