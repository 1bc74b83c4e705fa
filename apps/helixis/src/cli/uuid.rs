use std::process::ExitCode;

use anyhow::Result;
use helixis_core::services::{UuidFactory, UuidOptions, UuidRequest};
use serde_json::json;

use crate::output::print_json;

pub fn run(options: UuidOptions, number: usize, json: bool) -> Result<ExitCode> {
    let request = UuidRequest::from_options(options)?;
    let ids = UuidFactory::new().generate_many(&request, number);

    if json {
        print_json(&json!({ "uuids": ids }))?;
    } else {
        for id in &ids {
            println!("{id}");
        }
    }
    Ok(ExitCode::SUCCESS)
}
