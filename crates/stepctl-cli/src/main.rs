//! stepctl
//!
//! Command-line front end that replays recorded debugger sessions against
//! the thread plan core and prints plan stack listings.

mod args;
mod cli;
mod renderer;
mod script;

use anyhow::Result;
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

fn main() -> Result<()> {
    env_logger::init();

    let Args { no_color, command } = Args::parse();

    let renderer = TerminalRenderer::new(!no_color);

    info!("stepctl started");

    let cli = Cli::new(renderer);
    match command {
        Replay(args) => cli.replay(&args),
        Plans(args) => cli.plans(&args),
    }
}
