mod config;
mod core;
mod geometry;
mod render;
mod sampler;
mod types;
mod ui;

use std::fs::File;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Env, Target};

fn main() -> Result<()> {
    let args = config::Args::parse();
    init_logging(&args)?;
    log::info!("starting fan-strobe");
    ui::run(&args)
}

/// The terminal belongs to the TUI, so logs only go to stderr at error level
/// unless a log file is given.
fn init_logging(args: &config::Args) -> Result<()> {
    match &args.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            env_logger::Builder::from_env(Env::default().default_filter_or("info"))
                .target(Target::Pipe(Box::new(file)))
                .init();
        }
        None => {
            env_logger::Builder::from_env(Env::default().default_filter_or("error")).init();
        }
    }
    Ok(())
}
