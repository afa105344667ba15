mod cli;
mod core;
mod http;
mod payload;
mod reporting;
mod xss;

use clap::Parser;
use crate::cli::args::Cli;
use crate::core::context::Context;
use crate::core::engine::Engine;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const BANNER: &str = r#"
 ╔══════════════════════════════════════════════════════╗
 ║   ECHOPROBE · reflected query parameter probe        ║
 ║   stdin → reflection discovery → " ' < > probing     ║
 ╚══════════════════════════════════════════════════════╝
"#;

fn print_banner() {
    // stdout carries findings only
    eprintln!("\x1b[36m{}\x1b[0m", BANNER);
}

fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose { "echoprobe=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let start = Instant::now();
    let cli = Cli::parse();

    if !cli.no_banner && !cli.quiet {
        print_banner();
    }

    init_tracing(&cli);

    let ctx = Context::from_cli(cli)?;
    let quiet = ctx.quiet;
    let engine = Engine::new(ctx)?;
    let stats = engine.run().await?;

    tracing::debug!("{:?}", stats);
    if !quiet {
        println!("Total execution time: {:?}", start.elapsed());
    }

    Ok(())
}
