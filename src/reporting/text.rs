use crate::reporting::model::{Finding, ScanError};

pub fn render_finding(f: &Finding) -> String {
    format!(
        "param {} is reflected and allows {} on {}",
        f.parameter, f.probe, f.url
    )
}

pub fn render_error(e: &ScanError) -> String {
    match e {
        ScanError::Detect { message, .. } => format!("error from checkReflected: {}", message),
        ScanError::Probe {
            url,
            parameter,
            probe,
            message,
        } => format!(
            "error from checkAppend for url {} with param {} with {}: {}",
            url, parameter, probe, message
        ),
    }
}
