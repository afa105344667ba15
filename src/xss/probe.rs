// Injection Probing
// Appends a marker carrying one special character to a reflected value and
// checks whether the parameter still reflects

use crate::http::client::HttpClient;
use crate::http::error::FetchError;
use crate::payload::injector::append_to_query_param;
use crate::xss::reflect::detect_reflected_url;
use serde::{Serialize, Serializer};
use std::fmt;
use url::Url;

pub const MARKER_PREFIX: &str = "aprefix";
pub const MARKER_SUFFIX: &str = "asuffix";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeChar {
    DoubleQuote,
    SingleQuote,
    LessThan,
    GreaterThan,
}

impl ProbeChar {
    /// Probe order
    pub const ALL: [ProbeChar; 4] = [
        ProbeChar::DoubleQuote,
        ProbeChar::SingleQuote,
        ProbeChar::LessThan,
        ProbeChar::GreaterThan,
    ];

    pub fn as_char(self) -> char {
        match self {
            ProbeChar::DoubleQuote => '"',
            ProbeChar::SingleQuote => '\'',
            ProbeChar::LessThan => '<',
            ProbeChar::GreaterThan => '>',
        }
    }

    /// `aprefix<c>asuffix`
    pub fn marker(self) -> String {
        format!("{}{}{}", MARKER_PREFIX, self.as_char(), MARKER_SUFFIX)
    }
}

impl fmt::Display for ProbeChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl Serialize for ProbeChar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.as_char())
    }
}

/// Probe `param` of `target` with `probe`.
///
/// Detection is re-run from scratch on the mutated URL; the verdict is
/// whether `param` is still in the reflected set. Parameters with an empty
/// or missing value are probed too.
pub async fn probe_injection(
    client: &HttpClient,
    target: &str,
    param: &str,
    probe: ProbeChar,
) -> Result<bool, FetchError> {
    let url = Url::parse(target).map_err(|e| FetchError::invalid_url(target, e))?;
    let probed = append_to_query_param(&url, param, &probe.marker());

    let reflected = detect_reflected_url(client, &probed).await?;
    let verdict = reflected.contains(param);

    tracing::debug!("probe {} on {} param {}: {}", probe, target, param, verdict);
    Ok(verdict)
}
