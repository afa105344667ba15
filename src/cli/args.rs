use clap::{Parser, ValueEnum};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/80.0.3987.100 Safari/537.36";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One plain line per finding or error
    Text,
    /// One JSON object per line
    Json,
}

/// ECHOPROBE – reflected query parameter probe
#[derive(Parser, Debug)]
#[command(
    name = "echoprobe",
    version = "0.1.0",
    about = "ECHOPROBE – reflected query parameter probe",
    long_about = r#"
ECHOPROBE reads URLs from stdin, one per line, and for every URL:

  • Stage 1: fetches the page and finds query parameters whose values
             are echoed verbatim in the HTML body
  • Stage 2: appends aprefix<CHAR>asuffix to each echoed value, for each
             of " ' < >, and reports the characters that survive unescaped

Redirects and non-HTML responses are never scanned. TLS certificates are
not verified.
"#,
    after_help = r#"EXAMPLES:
  cat urls.txt | echoprobe
  cat urls.txt | echoprobe -c 50 --retries 2
  waybackurls example.com | grep '=' | echoprobe --format json"#
)]
pub struct Cli {
    // ═══════════════════════════════════════════════════════════════════
    // PERFORMANCE
    // ═══════════════════════════════════════════════════════════════════

    /// Maximum number of attempts for each request
    #[arg(long, default_value_t = 3, help_heading = "PERFORMANCE")]
    pub retries: u32,

    /// Number of URLs processed concurrently
    #[arg(short, long, default_value_t = 10, help_heading = "PERFORMANCE")]
    pub concurrency: usize,

    /// Seconds to wait between failed attempts
    #[arg(long = "retry-delay", default_value_t = 2, help_heading = "PERFORMANCE")]
    pub retry_delay: u64,

    // ═══════════════════════════════════════════════════════════════════
    // REQUEST
    // ═══════════════════════════════════════════════════════════════════

    /// User-Agent header sent with every request
    #[arg(short = 'A', long = "user-agent", default_value = DEFAULT_USER_AGENT, help_heading = "REQUEST")]
    pub user_agent: String,

    // ═══════════════════════════════════════════════════════════════════
    // OUTPUT
    // ═══════════════════════════════════════════════════════════════════

    /// Output format for findings and errors
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, help_heading = "OUTPUT")]
    pub format: OutputFormat,

    /// Skip the banner display
    #[arg(long, help_heading = "OUTPUT")]
    pub no_banner: bool,

    /// Quiet mode (no banner, no timing line)
    #[arg(short, long, help_heading = "OUTPUT")]
    pub quiet: bool,

    /// Verbose output (debug level)
    #[arg(short, long, help_heading = "OUTPUT", conflicts_with = "quiet")]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["echoprobe"]).unwrap();
        assert_eq!(cli.retries, 3);
        assert_eq!(cli.concurrency, 10);
        assert_eq!(cli.retry_delay, 2);
        assert_eq!(cli.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.quiet && !cli.verbose && !cli.no_banner);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "echoprobe",
            "--retries",
            "5",
            "-c",
            "40",
            "--format",
            "json",
            "-A",
            "probe/1.0",
        ])
        .unwrap();
        assert_eq!(cli.retries, 5);
        assert_eq!(cli.concurrency, 40);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.user_agent, "probe/1.0");
    }

    #[test]
    fn test_quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["echoprobe", "-q", "-v"]).is_err());
    }
}
