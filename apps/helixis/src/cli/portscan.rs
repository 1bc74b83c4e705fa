use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use console::{Term, style};
use helixis_core::config::PortScanConfig;
use helixis_core::domain::PortRange;
use helixis_core::services::{PortScanner, ScanOptions, TcpProbe};
use indicatif::{ProgressBar, ProgressStyle};

use crate::output::print_json;

pub async fn run(
    host: &str,
    range: &str,
    settings: &PortScanConfig,
    json: bool,
) -> Result<ExitCode> {
    let range: PortRange = range.parse()?;
    let options = ScanOptions::try_from(settings)?;

    if !json {
        println!("Scanning {host} for open ports in range {range}...");
    }

    let bar = progress_bar(range.len(), !json && Term::stderr().is_term());
    let scanner = PortScanner::new(Arc::new(TcpProbe), options);
    let report = scanner
        .scan(host, range, |done| bar.set_position(done as u64))
        .await?;
    bar.finish_and_clear();

    if json {
        print_json(&report)?;
        return Ok(ExitCode::SUCCESS);
    }

    let styled = Term::stdout().is_term();
    for port in &report.open {
        let line = format!("Port {port} is open.");
        if styled {
            println!("{}", style(line).green());
        } else {
            println!("{line}");
        }
    }
    if report.incomplete {
        eprintln!(
            "Scan deadline of {}s reached after {} of {} ports.",
            settings.deadline_secs,
            report.scanned,
            range.len()
        );
    }
    println!("Scan complete.");
    Ok(ExitCode::SUCCESS)
}

fn progress_bar(total: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(total as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} ports")
    {
        bar.set_style(style);
    }
    bar
}
