use std::process::ExitCode;

use anyhow::Result;
use helixis_core::domain::{Charset, form_decode, form_encode};
use serde_json::json;

use super::UrlCommands;
use crate::output::print_json;

pub fn run(command: UrlCommands, json: bool) -> Result<ExitCode> {
    let (input, charset, output) = match command {
        UrlCommands::Encode { input, charset } => {
            let charset: Charset = charset.parse()?;
            let encoded = form_encode(&input, charset);
            (input, charset, encoded)
        }
        UrlCommands::Decode { input, charset } => {
            let charset: Charset = charset.parse()?;
            let decoded = form_decode(&input, charset)?;
            (input, charset, decoded)
        }
    };

    if json {
        print_json(&json!({ "input": input, "charset": charset, "output": output }))?;
    } else {
        println!("{output}");
    }
    Ok(ExitCode::SUCCESS)
}
