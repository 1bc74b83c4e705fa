use std::process::ExitCode;

use anyhow::Result;
use helixis_core::domain::Rgb;
use serde_json::json;

use crate::output::print_json;

pub fn run(
    red: i64,
    green: i64,
    blue: i64,
    similar: usize,
    sigma: f64,
    json: bool,
) -> Result<ExitCode> {
    let color = Rgb::from_components(red, green, blue)?;
    let similar = if similar > 0 {
        color.similar(similar, sigma, &mut rand::thread_rng())?
    } else {
        Vec::new()
    };

    if json {
        let hexes: Vec<String> = similar.iter().map(|c| c.to_hex()).collect();
        print_json(&json!({
            "rgb": color,
            "hex": color.to_hex(),
            "similar": hexes,
        }))?;
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "RGB values {color} are equivalent to hex value: {}",
        color.to_hex()
    );
    if !similar.is_empty() {
        println!("Here are {} similar colors:", similar.len());
        for c in &similar {
            println!("{}", c.to_hex());
        }
    }
    Ok(ExitCode::SUCCESS)
}
