//! Command handlers.
//!
//! Each handler loads the session script, replays it against a fresh process
//! model and hands the resulting markdown to the [`TerminalRenderer`].

use anyhow::{Context, Result};
use log::info;
use stepctl_core::DumpOptions;

use crate::{
    args::{PlansArgs, ReplayArgs},
    renderer::TerminalRenderer,
    script::{build_process, Replayer, Session},
};

pub struct Cli {
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(renderer: TerminalRenderer) -> Self {
        Self { renderer }
    }

    /// Replays the script and prints what each dump, checkpoint, prune and
    /// clean-up event produces.
    pub fn replay(&self, args: &ReplayArgs) -> Result<()> {
        let session = Session::load(&args.script)?;
        info!(
            "replaying {} events from {}",
            session.events.len(),
            args.script.display()
        );

        let mut replayer = Replayer::new(build_process(args.process), DumpOptions::from(args.dump));
        replayer.run(session, |text| self.renderer.render(text))
    }

    /// Replays the script without output, then lists the plan stacks left at
    /// the end.
    pub fn plans(&self, args: &PlansArgs) -> Result<()> {
        let session = Session::load(&args.script)?;

        let mut replayer = Replayer::new(build_process(args.process), DumpOptions::from(args.dump));
        replayer.run(session, |_| Ok(()))?;
        info!(
            "{} plan stacks after replay",
            replayer.process().tracked_tids()?.len()
        );

        let listing = replayer
            .dump(args.tid)
            .context("Failed to list plan stacks")?;
        self.renderer.render(&listing)
    }
}
