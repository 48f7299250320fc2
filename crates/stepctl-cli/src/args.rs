//! Command-line argument definitions using clap.
//!
//! Argument structs carry the clap derives and convert into the core's
//! parameter types through `From` impls, so `stepctl-core` never sees clap.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use stepctl_core::{DescriptionLevel, DumpOptions, Tid, UpdatePolicy};

/// Replay recorded debugger sessions against the thread plan core
///
/// A session script is a JSON document listing stops, resumes and plan stack
/// operations in the order a debugger performed them. `stepctl` drives a
/// fresh process model through the script and prints the plan listings the
/// script asks for.
#[derive(Parser)]
#[command(version, about, name = "stepctl")]
pub struct Args {
    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a session, printing the output of every dump event
    #[command(alias = "r")]
    Replay(ReplayArgs),
    /// Replay a session silently and list the plan stacks it leaves behind
    #[command(alias = "p")]
    Plans(PlansArgs),
}

#[derive(ClapArgs)]
pub struct ReplayArgs {
    /// Path to the session script
    pub script: PathBuf,
    #[command(flatten)]
    pub process: ProcessArgs,
    #[command(flatten)]
    pub dump: DumpArgs,
}

#[derive(ClapArgs)]
pub struct PlansArgs {
    /// Path to the session script
    pub script: PathBuf,
    /// Only list the plans of this thread (decimal or 0x-prefixed hex)
    #[arg(long, value_parser = parse_tid)]
    pub tid: Option<Tid>,
    #[command(flatten)]
    pub process: ProcessArgs,
    #[command(flatten)]
    pub dump: DumpArgs,
}

/// How the replayed process reconciles threads at each stop.
#[derive(ClapArgs, Clone, Copy)]
pub struct ProcessArgs {
    /// Keep the plan stacks of threads that disappear from a stop
    #[arg(long)]
    pub keep_missing: bool,
    /// Seed every new thread with a base plan that refuses to be discarded
    #[arg(long)]
    pub base_plan: bool,
    /// Attach a tracer that logs plan events at trace level
    #[arg(long)]
    pub trace: bool,
}

impl From<ProcessArgs> for UpdatePolicy {
    fn from(val: ProcessArgs) -> Self {
        UpdatePolicy {
            delete_missing: !val.keep_missing,
            check_for_new: true,
        }
    }
}

/// What plan listings show.
#[derive(ClapArgs, Clone, Copy)]
pub struct DumpArgs {
    /// Include private plans in listings
    #[arg(long)]
    pub internal: bool,
    /// One-line plan descriptions
    #[arg(long, conflicts_with = "verbose")]
    pub brief: bool,
    /// Plan descriptions with their flags
    #[arg(long)]
    pub verbose: bool,
    /// Print "No active thread plans" for threads with empty stacks
    #[arg(long)]
    pub condense: bool,
    /// Leave out threads missing from the last stop
    #[arg(long)]
    pub skip_unreported: bool,
}

impl From<DumpArgs> for DumpOptions {
    fn from(val: DumpArgs) -> Self {
        let level = if val.brief {
            DescriptionLevel::Brief
        } else if val.verbose {
            DescriptionLevel::Verbose
        } else {
            DescriptionLevel::Full
        };
        DumpOptions {
            level,
            include_internal: val.internal,
            condense_if_trivial: val.condense,
            skip_unreported: val.skip_unreported,
        }
    }
}

fn parse_tid(value: &str) -> Result<Tid, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => Tid::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|err| format!("invalid thread id '{value}': {err}"))
}
