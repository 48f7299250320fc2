//! Session scripts and their replay against a [`DebugProcess`].
//!
//! A script is `{"events": [...]}` where each event carries an `"op"` tag:
//!
//! ```json
//! {"events": [
//!   {"op": "stop", "threads": [{"tid": 4097, "index_id": 1}]},
//!   {"op": "push", "tid": 4097, "plan": {"name": "step-over", "kind": "step_over_range"}},
//!   {"op": "dump"}
//! ]}
//! ```
//!
//! Plans are referred to by name, looked up from the top of the thread's
//! active stack.

use std::{fs, path::Path, sync::Arc};

use anyhow::{anyhow, Context, Result};
use log::debug;
use serde::Deserialize;
use stepctl_core::{
    display::OperationStatus,
    plan::{LogTracer, PlanTracer},
    CheckpointToken, DebugProcess, DumpOptions, PlanHandle, PlanKind, PlanSpec, PlanStack,
    PlanStackError, ProcessBuilder, ScriptedPlan, StackKind, ThreadHandle, ThreadList, Tid,
};

use crate::args::ProcessArgs;

#[derive(Debug, Deserialize)]
pub struct Session {
    pub events: Vec<Event>,
}

impl Session {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session script {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse session script {}", path.display()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Event {
    Stop {
        threads: Vec<ThreadHandle>,
    },
    Resume,
    Push {
        tid: Tid,
        plan: PlanSpec,
    },
    Pop {
        tid: Tid,
    },
    Discard {
        tid: Tid,
    },
    DiscardUpTo {
        tid: Tid,
        #[serde(default)]
        plan: Option<String>,
    },
    DiscardAll {
        tid: Tid,
    },
    DiscardConsultingMasters {
        tid: Tid,
    },
    Checkpoint {
        tid: Tid,
    },
    Restore {
        tid: Tid,
        token: CheckpointToken,
    },
    DropCheckpoint {
        tid: Tid,
        token: CheckpointToken,
    },
    /// The thread object went away while something still refers to it
    Destroy {
        tid: Tid,
    },
    Detach {
        tid: Tid,
    },
    Reattach {
        tid: Tid,
    },
    SetTid {
        tid: Tid,
        new_tid: Tid,
    },
    CleanUp,
    Prune {
        tid: Tid,
    },
    Dump {
        #[serde(default)]
        tid: Option<Tid>,
    },
    Teardown,
}

impl Event {
    pub fn op(&self) -> &'static str {
        match self {
            Event::Stop { .. } => "stop",
            Event::Resume => "resume",
            Event::Push { .. } => "push",
            Event::Pop { .. } => "pop",
            Event::Discard { .. } => "discard",
            Event::DiscardUpTo { .. } => "discard_up_to",
            Event::DiscardAll { .. } => "discard_all",
            Event::DiscardConsultingMasters { .. } => "discard_consulting_masters",
            Event::Checkpoint { .. } => "checkpoint",
            Event::Restore { .. } => "restore",
            Event::DropCheckpoint { .. } => "drop_checkpoint",
            Event::Destroy { .. } => "destroy",
            Event::Detach { .. } => "detach",
            Event::Reattach { .. } => "reattach",
            Event::SetTid { .. } => "set_tid",
            Event::CleanUp => "clean_up",
            Event::Prune { .. } => "prune",
            Event::Dump { .. } => "dump",
            Event::Teardown => "teardown",
        }
    }
}

/// Builds the process a replay runs against.
pub fn build_process(args: ProcessArgs) -> DebugProcess {
    let policy = stepctl_core::UpdatePolicy::from(args);
    let mut builder = ProcessBuilder::new()
        .with_delete_missing(policy.delete_missing)
        .with_check_for_new(policy.check_for_new);
    if args.base_plan {
        builder = builder.with_base_plan(|_| {
            let base: PlanHandle = Arc::new(ScriptedPlan::new(
                PlanSpec::new("base", PlanKind::Base).master(false),
            ));
            base
        });
    }
    if args.trace {
        let tracer = Arc::new(LogTracer::new());
        tracer.enable_tracing(true);
        builder = builder.with_tracer(tracer);
    }
    builder.build()
}

/// Applies session events to a process, one at a time.
pub struct Replayer {
    process: DebugProcess,
    options: DumpOptions,
    detached: Vec<PlanStack>,
}

impl Replayer {
    pub fn new(process: DebugProcess, options: DumpOptions) -> Self {
        Self {
            process,
            options,
            detached: Vec::new(),
        }
    }

    pub fn process(&self) -> &DebugProcess {
        &self.process
    }

    /// Runs every event of `session`, handing each produced listing or status
    /// line to `output`. Stops at the first failing event.
    pub fn run(
        &mut self,
        session: Session,
        mut output: impl FnMut(&str) -> Result<()>,
    ) -> Result<()> {
        debug!("replaying with {:?}", self.process.config().update);
        for (index, event) in session.events.into_iter().enumerate() {
            let op = event.op();
            debug!("event {index}: {op}");
            if let Some(text) = self
                .apply(event)
                .with_context(|| format!("Session event {index} ({op}) failed"))?
            {
                output(&text)?;
            }
        }
        Ok(())
    }

    /// Applies one event. Returns the text it produced, if any.
    pub fn apply(&mut self, event: Event) -> Result<Option<String>> {
        match event {
            Event::Stop { threads } => {
                self.process.stop(ThreadList::new(threads)?)?;
            }
            Event::Resume => self.process.resume()?,
            Event::Detach { .. } | Event::Reattach { .. } | Event::SetTid { .. } => {
                self.apply_identity(&event)?;
            }
            Event::CleanUp => return self.clean_up(),
            Event::Prune { tid } => {
                let line = if self.process.prune_plans_for_tid(tid)? {
                    OperationStatus::success(format!("pruned plan stack of thread 0x{tid:04x}"))
                } else {
                    OperationStatus::failure(format!(
                        "thread 0x{tid:04x} is still alive or has no plan stack"
                    ))
                };
                return Ok(Some(line.to_string()));
            }
            Event::Dump { tid } => return self.dump(tid).map(Some),
            Event::Teardown => {
                self.process.teardown()?;
                self.detached.clear();
            }
            stack_event => return self.apply_to_stack(stack_event),
        }
        Ok(None)
    }

    /// Events that operate on a single thread's plan stack.
    fn apply_to_stack(&self, event: Event) -> Result<Option<String>> {
        let process = &self.process;
        match event {
            Event::Push { tid, plan } => {
                let plan: PlanHandle = Arc::new(ScriptedPlan::new(plan));
                process.with_plan_stack(tid, |stack| stack.push_plan(plan))?;
            }
            Event::Pop { tid } => {
                process.with_plan_stack(tid, PlanStack::pop_plan)??;
            }
            Event::Discard { tid } => {
                process.with_plan_stack(tid, PlanStack::discard_plan)??;
            }
            Event::DiscardUpTo { tid, plan } => {
                process.with_plan_stack(tid, |stack| -> stepctl_core::Result<usize> {
                    let target = plan.map(|name| find_active(stack, &name)).transpose()?;
                    stack.discard_plans_up_to_plan(target.as_ref())
                })??;
            }
            Event::DiscardAll { tid } => {
                process.with_plan_stack(tid, PlanStack::discard_all_plans)?;
            }
            Event::DiscardConsultingMasters { tid } => {
                process.with_plan_stack(tid, PlanStack::discard_consulting_master_plans)?;
            }
            Event::Checkpoint { tid } => {
                let token = process.with_plan_stack(tid, PlanStack::checkpoint_completed_plans)?;
                let line = OperationStatus::success(format!(
                    "checkpoint {token} saved on thread 0x{tid:04x}"
                ));
                return Ok(Some(line.to_string()));
            }
            Event::Restore { tid, token } => {
                process.with_plan_stack(tid, |stack| {
                    stack.restore_completed_plan_checkpoint(token)
                })??;
            }
            Event::DropCheckpoint { tid, token } => {
                process.with_plan_stack(tid, |stack| {
                    stack.discard_completed_plan_checkpoint(token)
                })??;
            }
            Event::Destroy { tid } => {
                process.with_plan_stack(tid, PlanStack::destroy_leaving_null_plan)?;
            }
            other => return Err(anyhow!("'{}' is not a plan stack event", other.op())),
        }
        Ok(None)
    }

    /// Detach, reattach and re-key events.
    fn apply_identity(&mut self, event: &Event) -> Result<()> {
        match *event {
            Event::Detach { tid } => {
                let stack = self
                    .process
                    .detach(tid)?
                    .ok_or(PlanStackError::UnknownThread { tid })?;
                self.detached.push(stack);
            }
            Event::Reattach { tid } => {
                let position = self
                    .detached
                    .iter()
                    .position(|stack| stack.is_tid(tid))
                    .ok_or_else(|| anyhow!("no detached plan stack for thread 0x{tid:04x}"))?;
                let stack = self.detached.remove(position);
                self.process.reattach(stack)?;
            }
            Event::SetTid { tid, new_tid } => {
                match self.detached.iter_mut().find(|stack| stack.is_tid(tid)) {
                    Some(stack) => stack.set_tid(new_tid),
                    None => self
                        .process
                        .with_plan_stack(tid, |stack| stack.set_tid(new_tid))?,
                }
            }
            _ => return Err(anyhow!("'{}' is not an identity event", event.op())),
        }
        Ok(())
    }

    /// Reattaches every drifted stack under its new identifier.
    fn clean_up(&self) -> Result<Option<String>> {
        let drifted = self.process.clean_up()?;
        if drifted.is_empty() {
            return Ok(None);
        }
        let mut text = String::new();
        for stack in drifted {
            let line = OperationStatus::success(format!(
                "plan stack re-keyed to thread 0x{:04x}",
                stack.tid()
            ));
            text.push_str(&line.to_string());
            self.process.reattach(stack)?;
        }
        Ok(Some(text))
    }

    /// Listing of every thread, or of `tid` alone.
    pub fn dump(&self, tid: Option<Tid>) -> Result<String> {
        let Some(tid) = tid else {
            let listing = self.process.dump_plans(&self.options)?;
            if listing.is_empty() {
                return Ok(OperationStatus::success("no plan stacks registered").to_string());
            }
            return Ok(listing);
        };
        Ok(match self.process.dump_plans_for_tid(tid, &self.options)? {
            Some(listing) => listing,
            None => OperationStatus::failure(format!("no plan stack for thread 0x{tid:04x}"))
                .to_string(),
        })
    }
}

/// Topmost active plan called `name`.
fn find_active(stack: &PlanStack, name: &str) -> stepctl_core::Result<PlanHandle> {
    stack
        .plans_of_kind(StackKind::Active)
        .iter()
        .rev()
        .find(|plan| plan.name() == name)
        .cloned()
        .ok_or_else(|| PlanStackError::PlanNotFound {
            tid: stack.tid(),
            plan: name.to_string(),
        })
}
