use reqwest::StatusCode;
use std::fmt;

/// Why a response was not scanned for reflections
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Redirect(u16),
    NotHtml(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Redirect(code) => write!(f, "redirect {}", code),
            SkipReason::NotHtml(content_type) => write!(f, "content type {}", content_type),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Body of an HTML (or untyped) response, invalid UTF-8 replaced
    Page(String),
    Skipped(SkipReason),
}

impl FetchOutcome {
    /// Classify a response whose body has already been read in full.
    ///
    /// Redirects are never followed, so a 3xx is reported as-is. A missing
    /// `Content-Type` is scanned; a present one must mention `html`.
    pub fn classify(status: StatusCode, content_type: Option<&str>, body: String) -> Self {
        if status.is_redirection() {
            return Self::Skipped(SkipReason::Redirect(status.as_u16()));
        }

        match content_type {
            Some(ct) if !ct.is_empty() && !ct.contains("html") => {
                Self::Skipped(SkipReason::NotHtml(ct.to_string()))
            }
            _ => Self::Page(body),
        }
    }
}
