use std::process::ExitCode;

use anyhow::Result;
use helixis_core::domain::HashAlgorithm;
use helixis_core::services::hash_file;

use super::ChecksumCommands;
use crate::output::print_json;

pub fn run(command: ChecksumCommands, json: bool) -> Result<ExitCode> {
    let (algorithm, file) = match command {
        ChecksumCommands::Sha256 { file } => (HashAlgorithm::Sha256, file),
        ChecksumCommands::Md5 { file } => (HashAlgorithm::Md5, file),
        ChecksumCommands::Sha1 { file } => (HashAlgorithm::Sha1, file),
        ChecksumCommands::Sha512 { file } => (HashAlgorithm::Sha512, file),
    };
    let report = hash_file(algorithm, &file)?;

    if json {
        print_json(&report)?;
    } else {
        println!("{}", report.hex);
    }
    Ok(ExitCode::SUCCESS)
}
