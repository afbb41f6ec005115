use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Command line options for the cafezinho analyzer
pub struct Options {
    /// Source file to analyze
    pub path: PathBuf,

    /// Print the token stream instead of parsing
    #[arg(short, long)]
    pub tokens: bool,

    /// Do not announce an accepted program
    #[arg(short, long)]
    pub quiet: bool,
}
