#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use propfix_cli::args::CliArgs;
use propfix_cli::config::resolve_config;
use propfix_cli::driver::{self, FixRequest};
use propfix_cli::reporter::Reporter;
use propfix_workspace::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Only installs a subscriber when PROPFIX_LOG or RUST_LOG is set.
    propfix_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let config = resolve_config(&args, &cwd)?;
    let request = FixRequest::from_args(&args, &config, &cwd);

    let report = driver::run(&request, &CancellationToken::new()).await?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("failed to serialize result")?;
        println!("{json}");
    } else if args.write {
        driver::write_changes(&report)?;
        let reporter = Reporter::new(std::io::stderr().is_terminal());
        eprintln!("{}", reporter.summary(&report));
    } else {
        let reporter = Reporter::new(std::io::stdout().is_terminal());
        print!("{}", reporter.render(&report));
    }
    Ok(())
}
