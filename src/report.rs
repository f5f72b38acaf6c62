//! Rendering of validation results

use crate::proxy::models::{Candidate, ProxyType, ValidationResult};
use crate::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;

/// One output record per candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(rename = "IP")]
    pub ip: String,
    pub port: u16,
    pub protocol: ProxyType,
    pub reachable: bool,
    #[serde(rename = "egressIP")]
    pub egress_ip: Option<String>,
    #[serde(rename = "latencyMs")]
    pub latency_ms: Option<u64>,
    #[serde(rename = "probedOk")]
    pub probed_ok: Option<bool>,
}

impl From<&ValidationResult> for Record {
    fn from(result: &ValidationResult) -> Self {
        Self {
            ip: result.candidate.host.clone(),
            port: result.candidate.port,
            protocol: result.candidate.protocol,
            reachable: result.reachable,
            egress_ip: result.egress_ip.clone(),
            latency_ms: result.latency_ms,
            probed_ok: result.probed_ok,
        }
    }
}

/// Records ordered by candidate, keeping only reachable ones when asked
pub fn records(
    results: &HashMap<Candidate, ValidationResult>,
    only_reachable: bool,
) -> Vec<Record> {
    let mut selected: Vec<&ValidationResult> = results
        .values()
        .filter(|r| !only_reachable || r.is_reachable())
        .collect();
    selected.sort_by(|a, b| a.candidate.cmp(&b.candidate));
    selected.into_iter().map(Record::from).collect()
}

/// Write the results as a pretty JSON array, returning how many records were written
pub fn write_json<W: Write>(
    results: &HashMap<Candidate, ValidationResult>,
    only_reachable: bool,
    mut writer: W,
) -> Result<usize> {
    let records = records(results, only_reachable);
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(records.len())
}

/// How the egress IP of probed proxies relates to their own address
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EgressSummary {
    /// Egress IP equals the proxy host
    pub same: usize,
    /// Probed but no egress IP came back
    pub empty: usize,
    /// Traffic leaves from another address
    pub different: usize,
}

impl EgressSummary {
    /// Tally reachable results; unreachable ones were never probed
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a ValidationResult>) -> Self {
        let mut summary = Self::default();
        for result in results.into_iter().filter(|r| r.is_reachable()) {
            match &result.egress_ip {
                None => summary.empty += 1,
                Some(ip) if *ip == result.candidate.host => summary.same += 1,
                Some(_) => summary.different += 1,
            }
        }
        summary
    }
}
