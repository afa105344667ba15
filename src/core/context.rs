//! Run configuration, built once from the command line

use crate::cli::args::{Cli, OutputFormat, DEFAULT_USER_AGENT};
use crate::core::retry::RetryPolicy;
use std::time::Duration;

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
pub const TCP_KEEPALIVE: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct Context {
    /// Worker count; also the capacity of the work queue
    pub concurrency: usize,
    pub retry: RetryPolicy,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub keepalive: Duration,
    pub format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            concurrency: 10,
            retry: RetryPolicy::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: CONNECT_TIMEOUT,
            keepalive: TCP_KEEPALIVE,
            format: OutputFormat::Text,
            quiet: false,
            verbose: false,
        }
    }
}

impl Context {
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        if cli.user_agent.trim().is_empty() {
            anyhow::bail!("--user-agent must not be empty");
        }

        if cli.concurrency == 0 {
            tracing::warn!("--concurrency 0 is not usable, running with 1 worker");
        }

        Ok(Self {
            concurrency: cli.concurrency.max(1),
            retry: RetryPolicy::new(cli.retries, Duration::from_secs(cli.retry_delay)),
            user_agent: cli.user_agent,
            format: cli.format,
            quiet: cli.quiet,
            verbose: cli.verbose,
            ..Self::default()
        })
    }
}
