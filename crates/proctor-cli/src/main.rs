//! Proctor CLI application
//!
//! Runs coding-interview submissions against a problem's test table.
//!
//! # Usage
//!
//! ```bash
//! proctor run solution.rhai               # evaluate locally
//! proctor run solution.py                 # relay to the remote judge
//! proctor problems list                   # list known problems
//! proctor problems template two-sum -l rhai
//! proctor config init                     # write ~/.proctor/config.toml
//! ```
//!
//! Set `RUST_LOG=debug` for verbose logging.

mod args;
mod commands;
mod console;
mod router;

use clap::Parser;

pub use args::{Cli, Commands, ConfigAction, ProblemsAction};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    router::route(cli).await
}
