//! Execution-control core of an interactive debugger.
//!
//! At every stop of a debugged thread something has to decide what happens
//! next: single-step, run to an address, finish the current call, evaluate an
//! expression, or just continue. That intent is expressed as a stack of
//! *plans* per thread. This crate owns those stacks and keeps them matched to
//! the threads that exist at each stop.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐    ┌──────────────────┐    ┌──────────────────┐
//! │  DebugProcess    │    │ PlanStackRegistry│    │    PlanStack     │
//! │ (stop / resume / │───▶│  (tid → stack,   │───▶│ (active /        │
//! │  teardown, lock) │    │  reconciliation) │    │  completed /     │
//! └──────────────────┘    └──────────────────┘    │  discarded)      │
//!                                                 └────────┬─────────┘
//!                                                          ▼
//!                                                 ┌──────────────────┐
//!                                                 │ dyn ThreadPlan   │
//!                                                 └──────────────────┘
//! ```
//!
//! - [`plan`]: the [`ThreadPlan`] capability trait, tracers, and the
//!   data-driven [`ScriptedPlan`]
//! - [`stack`]: [`PlanStack`], one per thread
//! - [`registry`]: [`PlanStackRegistry`], one per process
//! - [`process`]: [`DebugProcess`], which drives the registry through stops
//!   and resumes
//! - [`display`]: markdown listings of stacks and threads
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use stepctl_core::{
//!     models::{PlanKind, ThreadList},
//!     plan::{PlanSpec, ScriptedPlan},
//!     DumpOptions, ProcessBuilder,
//! };
//!
//! # fn main() -> stepctl_core::Result<()> {
//! let process = ProcessBuilder::new().build();
//! process.stop(ThreadList::from_tids([0x101, 0x102])?)?;
//!
//! process.with_plan_stack(0x101, |stack| {
//!     stack.push_plan(Arc::new(ScriptedPlan::new(PlanSpec::new("step-over", PlanKind::StepOverRange))));
//! })?;
//!
//! let listing = process.dump_plans(&DumpOptions::default())?;
//! assert!(listing.contains("thread #1: tid = 0x0101"));
//!
//! process.resume()?;
//! process.teardown()?;
//! # Ok(())
//! # }
//! ```

pub mod display;
pub mod error;
pub mod models;
pub mod params;
pub mod plan;
pub mod process;
pub mod registry;
pub mod stack;

// Re-export commonly used types
pub use error::{PlanStackError, Result};
pub use models::{DescriptionLevel, PlanKind, StackKind, ThreadHandle, ThreadList, Tid};
pub use params::{DumpOptions, UpdatePolicy};
pub use plan::{same_plan, PlanHandle, PlanSpec, ScriptedPlan, ThreadPlan, TracerHandle};
pub use process::{DebugProcess, ProcessBuilder};
pub use registry::{PlanStackRegistry, UpdateSummary};
pub use stack::{CheckpointToken, PlanStack};
