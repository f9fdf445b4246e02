//! Command-line entry point for `storage-linker`.

use anyhow::Result;
use clap::Parser;

use storage_linker::cli::{Cli, Command};
use storage_linker::commands;
use storage_linker::logging::{Logger, init_subscriber};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    match args.command {
        Command::Link(opts) => {
            init_subscriber(args.verbose, "link");
            let log = Logger::new("link");
            commands::link::run(&args.global, &opts, &log)
        }
        Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
