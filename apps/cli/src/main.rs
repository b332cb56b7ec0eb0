#![warn(rust_2018_idioms, unused_lifetimes)]

use anyhow::Result;
use clap::Parser;
use dreg::logger::{Logger, level_from_verbosity};
use dreg_cli::args::{Cli, Command};
use dreg_cli::handlers::{build, inspect};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logger = Logger::builder().name(env!("CARGO_BIN_NAME")).level(level_from_verbosity(cli.verbose));
    let _log = match &cli.log_dir {
        Some(dir) => logger.path(dir).init()?,
        None => logger.init()?,
    };

    match &cli.command {
        Command::Build(args) => build::run(args)?,
        Command::Inspect(args) => inspect::run(args).await?,
    }

    Ok(())
}
