//! The debugged-process side that owns the plan stack registry.
//!
//! [`DebugProcess`] drives the registry through the stop/resume life cycle:
//!
//! ```text
//!   stop(threads) ──▶ Update (prune exited, add new, seed base plans)
//!        │
//!        ├──▶ with_plan_stack(tid, ..)  stepping logic pushes/pops/discards
//!        ├──▶ dump_plans(..)            inspection commands
//!        ▼
//!   resume() ──▶ WillResume on every stack
//!        ⋮
//!   teardown() ──▶ Clear
//! ```
//!
//! The registry and the current thread list sit behind one mutex, so a
//! listing can never observe a half-finished reconciliation.

pub mod builder;

use std::sync::{Mutex, MutexGuard};

use log::{debug, info};

pub use builder::{BasePlanFactory, ProcessBuilder, ProcessConfig};

use crate::{
    error::{PlanStackError, Result},
    models::{ThreadList, Tid},
    params::DumpOptions,
    registry::{PlanStackRegistry, UpdateSummary},
    stack::PlanStack,
};

#[derive(Debug, Default)]
struct ProcessState {
    registry: PlanStackRegistry,
    threads: ThreadList,
}

/// A debugged process as seen by the execution-control core.
#[derive(Debug)]
pub struct DebugProcess {
    state: Mutex<ProcessState>,
    config: ProcessConfig,
}

impl DebugProcess {
    pub(crate) fn new(config: ProcessConfig) -> Self {
        Self {
            state: Mutex::new(ProcessState::default()),
            config,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ProcessState>> {
        Ok(self.state.lock()?)
    }

    /// Settings applied at every stop.
    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    /// Records the threads alive at this stop and reconciles the registry
    /// with them. Newly discovered threads receive the configured tracer and
    /// base plan.
    pub fn stop(&self, threads: ThreadList) -> Result<UpdateSummary> {
        let mut guard = self.lock()?;
        let state = &mut *guard;
        state.threads = threads;

        let policy = self.config.update;
        let summary = state
            .registry
            .update(&state.threads, policy.delete_missing, policy.check_for_new);

        for tid in &summary.added {
            if let Some(stack) = state.registry.find_mut(*tid) {
                if let Some(tracer) = &self.config.tracer {
                    stack.set_tracer(Some(tracer.clone()));
                }
                if let Some(factory) = &self.config.base_plan {
                    stack.push_plan(factory(*tid));
                }
            }
        }
        debug!("stop with {} threads", state.threads.len());
        Ok(summary)
    }

    /// Resume notification for every thread's stack.
    pub fn resume(&self) -> Result<()> {
        let mut state = self.lock()?;
        state.registry.will_resume();
        debug!("resumed {} threads", state.registry.len());
        Ok(())
    }

    /// Runs `f` on the stack of `tid` while holding the registry lock.
    ///
    /// # Errors
    ///
    /// Returns `PlanStackError::UnknownThread` if `tid` has no stack.
    ///
    /// # Deadlocks
    ///
    /// The lock is not reentrant. `f`, and every plan hook it triggers, must
    /// not call back into this `DebugProcess`.
    pub fn with_plan_stack<R>(
        &self,
        tid: Tid,
        f: impl FnOnce(&mut PlanStack) -> R,
    ) -> Result<R> {
        let mut state = self.lock()?;
        let stack = state
            .registry
            .find_mut(tid)
            .ok_or(PlanStackError::UnknownThread { tid })?;
        Ok(f(stack))
    }

    /// Runs `f` on the whole registry and the current thread list.
    ///
    /// # Deadlocks
    ///
    /// Same restriction as [`with_plan_stack`](Self::with_plan_stack).
    pub fn with_registry<R>(
        &self,
        f: impl FnOnce(&mut PlanStackRegistry, &ThreadList) -> R,
    ) -> Result<R> {
        let mut guard = self.lock()?;
        let state = &mut *guard;
        Ok(f(&mut state.registry, &state.threads))
    }

    /// Takes the stack of `tid` out of the registry for later reattachment.
    pub fn detach(&self, tid: Tid) -> Result<Option<PlanStack>> {
        Ok(self.lock()?.registry.detach(tid))
    }

    /// Puts a detached stack back under its stored identifier.
    pub fn reattach(&self, stack: PlanStack) -> Result<()> {
        self.lock()?.registry.activate(stack);
        Ok(())
    }

    /// Detaches and returns stacks whose identifier drifted from their key.
    pub fn clean_up(&self) -> Result<Vec<PlanStack>> {
        Ok(self.lock()?.registry.clean_up())
    }

    pub fn dump_plans(&self, options: &DumpOptions) -> Result<String> {
        let state = self.lock()?;
        Ok(state.registry.dump_plans(&state.threads, options))
    }

    /// `None` if the thread is unknown.
    pub fn dump_plans_for_tid(&self, tid: Tid, options: &DumpOptions) -> Result<Option<String>> {
        let state = self.lock()?;
        Ok(state.registry.dump_plans_for_tid(tid, &state.threads, options))
    }

    /// Removes the stack of `tid` if the thread is no longer alive.
    pub fn prune_plans_for_tid(&self, tid: Tid) -> Result<bool> {
        let mut guard = self.lock()?;
        let state = &mut *guard;
        Ok(state.registry.prune_plans_for_tid(tid, &state.threads))
    }

    /// The thread list recorded at the last stop.
    pub fn threads(&self) -> Result<ThreadList> {
        Ok(self.lock()?.threads.clone())
    }

    /// Identifiers that currently have a stack, ascending.
    pub fn tracked_tids(&self) -> Result<Vec<Tid>> {
        Ok(self.lock()?.registry.tids().collect())
    }

    /// Destroys every stack and forgets the thread list.
    pub fn teardown(&self) -> Result<()> {
        let mut state = self.lock()?;
        state.registry.clear();
        state.threads = ThreadList::default();
        info!("process torn down");
        Ok(())
    }
}

impl Default for DebugProcess {
    fn default() -> Self {
        ProcessBuilder::new().build()
    }
}
