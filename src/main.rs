//! CLI entry point for the pixel-growth pattern generator

use clap::Parser;
use pixelbloom::io::cli::{Cli, GenerationRunner};

fn main() -> pixelbloom::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let mut runner = GenerationRunner::new(cli);
    runner.run()
}
