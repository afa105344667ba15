use crate::xss::probe::ProbeChar;
use serde::Serialize;

/// A parameter whose probe character came back unescaped
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Finding {
    pub url: String,
    pub parameter: String,
    pub probe: ProbeChar,
}

impl Finding {
    pub fn new(url: &str, parameter: &str, probe: ProbeChar) -> Self {
        Self {
            url: url.to_string(),
            parameter: parameter.to_string(),
            probe,
        }
    }
}

/// A target or probe abandoned after its retries ran out
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum ScanError {
    Detect {
        url: String,
        message: String,
    },
    Probe {
        url: String,
        parameter: String,
        probe: ProbeChar,
        message: String,
    },
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScanEvent {
    Finding(Finding),
    Error(ScanError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_event_serializes_by_kind() {
        let finding = ScanEvent::Finding(Finding::new("http://a.test/?q=1", "q", ProbeChar::SingleQuote));
        let v = serde_json::to_value(&finding).unwrap();
        assert_eq!(v["finding"]["parameter"], "q");
        assert_eq!(v["finding"]["probe"], "'");

        let error = ScanEvent::Error(ScanError::Detect {
            url: "http://b.test/".into(),
            message: "timed out".into(),
        });
        let v = serde_json::to_value(&error).unwrap();
        assert_eq!(v["error"]["stage"], "detect");
        assert_eq!(v["error"]["message"], "timed out");
    }
}
