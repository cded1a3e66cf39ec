#![forbid(unsafe_code)]

//! # Mesa CLI
//!
//! Renders a JSON dataset through mesa's local or remote table.
//!
//! ## Usage
//!
//! ```bash
//! mesa people.json --search ana --sort age:desc
//! mesa people.json --fields fields.json --filter status=Ativo --remote
//! ```

mod app;
mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    let output = app::run(&cli).await?;
    print!("{output}");
    Ok(())
}

/// Logs go to stderr; `RUST_LOG` overrides the `-v` level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
