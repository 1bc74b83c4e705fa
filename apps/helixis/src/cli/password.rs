use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use helixis_core::domain::{PasswordPolicy, PasswordRequest};
use helixis_core::services::{generate_passwords, write_passwords};
use serde_json::json;

use crate::output::print_json;

pub fn run(
    request: PasswordRequest,
    number: usize,
    file: Option<&Path>,
    json: bool,
) -> Result<ExitCode> {
    let policy = PasswordPolicy::resolve(request)?;
    let passwords = generate_passwords(&policy, number, &mut rand::thread_rng())?;

    if let Some(path) = file {
        write_passwords(path, &passwords)?;
        if json {
            print_json(&json!({ "file": path, "count": passwords.len() }))?;
        } else {
            println!("Wrote {} password(s) to {}", passwords.len(), path.display());
        }
        return Ok(ExitCode::SUCCESS);
    }

    if json {
        print_json(&json!({ "passwords": passwords }))?;
    } else {
        for password in &passwords {
            println!("{password}");
        }
    }
    Ok(ExitCode::SUCCESS)
}
