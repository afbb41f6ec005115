use cafezinho::cli::{self, Options};
use clap::Parser;
use std::process::ExitCode;

fn main() -> std::result::Result<ExitCode, Box<dyn std::error::Error>> {
    cafezinho::init_tracing();
    let options = Options::parse();

    cli::run(&options)
}
