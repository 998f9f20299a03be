#![allow(clippy::print_stderr)]

use anyhow::Result;
use clap::Parser;

use php_representer::cli::args::CliArgs;
use php_representer::cli::driver;
use php_representer::tracing_config;

fn main() -> Result<()> {
    // Defaults to `info`; REPRESENTER_LOG / RUST_LOG override the filter,
    // REPRESENTER_LOG_FORMAT=tree|json|text picks the output shape.
    tracing_config::init_tracing();

    let args = CliArgs::parse();
    driver::run(&args)
}
