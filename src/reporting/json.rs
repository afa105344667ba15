use crate::reporting::model::{Finding, ScanError};
use serde::Serialize;

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Line<'a> {
    Finding {
        timestamp: String,
        #[serde(flatten)]
        finding: &'a Finding,
    },
    Error {
        timestamp: String,
        #[serde(flatten)]
        error: &'a ScanError,
    },
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

pub fn render_finding(finding: &Finding) -> anyhow::Result<String> {
    Ok(serde_json::to_string(&Line::Finding {
        timestamp: now(),
        finding,
    })?)
}

pub fn render_error(error: &ScanError) -> anyhow::Result<String> {
    Ok(serde_json::to_string(&Line::Error {
        timestamp: now(),
        error,
    })?)
}
