use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use helixis_core::ports::RecordType;
use helixis_core::services::{DnsService, HickoryResolver};

use crate::output::print_json;

pub async fn lookup(host: &str, record_type: &str, json: bool) -> Result<ExitCode> {
    let record_type: RecordType = record_type.parse()?;
    let service = DnsService::new(Arc::new(HickoryResolver::from_system_conf()?));
    let report = service.lookup(host, record_type).await?;

    if json {
        print_json(&report)?;
    } else if report.records.is_empty() {
        println!("No {} records found for {}", report.record_type, report.host);
    } else {
        for record in &report.records {
            println!("{record}");
        }
    }
    Ok(ExitCode::SUCCESS)
}
