//! The per-thread plan stack.
//!
//! A [`PlanStack`] holds everything a thread intends to do the next time it
//! runs, plus what happened to its plans during the current stop:
//!
//! ```text
//!             push ┌──────────┐ pop      ┌───────────┐
//!          ───────▶│  active  │─────────▶│ completed │──┐
//!                  │ (top =   │ discard  ├───────────┤  │ cleared by
//!                  │ current) │─────────▶│ discarded │──┤ will_resume()
//!                  └──────────┘          └───────────┘  │
//!                                                       ▼
//! ```
//!
//! Plans only ever move from `active` to one of the other two sequences.
//! The completed sequence can additionally be checkpointed and restored so a
//! nested expression evaluation run during a stop does not leave its own
//! completed plans behind.
//!
//! The stack knows its thread only by [`Tid`]. It never stores a
//! [`ThreadHandle`](crate::models::ThreadHandle), which lets the registry
//! detach a stack from a stale handle and reattach it once the thread is
//! found again.

mod checkpoint;


use std::sync::Arc;

use log::debug;

pub use checkpoint::CheckpointToken;

use crate::{
    display::StackDump,
    error::{PlanStackError, Result},
    models::{DescriptionLevel, ExpressionVariable, ReturnValue, StackKind, Tid},
    plan::{position_of, NullPlan, PlanHandle, TracerHandle},
};
use checkpoint::CheckpointStore;

/// Active, completed and discarded plans of one thread.
#[derive(Debug)]
pub struct PlanStack {
    tid: Tid,
    plans: Vec<PlanHandle>,
    completed_plans: Vec<PlanHandle>,
    discarded_plans: Vec<PlanHandle>,
    checkpoints: CheckpointStore,
    tracer: Option<TracerHandle>,
}

impl PlanStack {
    /// Creates an empty stack for `tid`.
    pub fn new(tid: Tid) -> Self {
        Self {
            tid,
            plans: Vec::new(),
            completed_plans: Vec::new(),
            discarded_plans: Vec::new(),
            checkpoints: CheckpointStore::default(),
            tracer: None,
        }
    }

    pub fn tid(&self) -> Tid {
        self.tid
    }

    pub fn is_tid(&self, tid: Tid) -> bool {
        self.tid == tid
    }

    /// Re-keys the stack. Only meaningful before reattaching it through
    /// [`PlanStackRegistry::activate`](crate::registry::PlanStackRegistry::activate).
    pub fn set_tid(&mut self, tid: Tid) {
        self.tid = tid;
    }

    /// Makes `plan` the current plan.
    ///
    /// A plan without a tracer of its own inherits the stack's tracer.
    pub fn push_plan(&mut self, plan: PlanHandle) {
        if plan.tracer().is_none() {
            if let Some(tracer) = &self.tracer {
                plan.set_tracer(Some(tracer.clone()));
            }
        }
        debug!(
            "thread 0x{:04x}: push '{}' at depth {}",
            self.tid,
            plan.name(),
            self.plans.len()
        );
        self.plans.push(plan.clone());
        plan.did_push();
    }

    /// Moves the current plan to the completed sequence.
    ///
    /// # Errors
    ///
    /// Returns `PlanStackError::EmptyStack` if there is no active plan.
    pub fn pop_plan(&mut self) -> Result<PlanHandle> {
        let plan = self.plans.pop().ok_or(PlanStackError::EmptyStack {
            tid: self.tid,
            operation: "pop plan",
        })?;
        debug!("thread 0x{:04x}: completed '{}'", self.tid, plan.name());
        self.completed_plans.push(plan.clone());
        plan.did_complete();
        Ok(plan)
    }

    /// Moves the current plan to the discarded sequence.
    ///
    /// # Errors
    ///
    /// Returns `PlanStackError::EmptyStack` if there is no active plan.
    pub fn discard_plan(&mut self) -> Result<PlanHandle> {
        let plan = self.plans.pop().ok_or(PlanStackError::EmptyStack {
            tid: self.tid,
            operation: "discard plan",
        })?;
        debug!("thread 0x{:04x}: discarded '{}'", self.tid, plan.name());
        self.discarded_plans.push(plan.clone());
        plan.was_discarded();
        Ok(plan)
    }

    /// Discards plans from the top down to and including `target`, or the
    /// whole active sequence when `target` is `None`. Returns how many plans
    /// were discarded.
    ///
    /// # Errors
    ///
    /// Returns `PlanStackError::PlanNotFound`, without discarding anything,
    /// if `target` is not on the active sequence.
    pub fn discard_plans_up_to_plan(&mut self, target: Option<&PlanHandle>) -> Result<usize> {
        let Some(target) = target else {
            return Ok(self.discard_all_plans());
        };
        let index = position_of(&self.plans, target).ok_or_else(|| PlanStackError::PlanNotFound {
            tid: self.tid,
            plan: target.name().to_string(),
        })?;
        Ok(self.discard_down_to(index))
    }

    /// Discards every active plan. Returns how many were discarded.
    pub fn discard_all_plans(&mut self) -> usize {
        self.discard_down_to(0)
    }

    /// Discards plans from the top until it reaches a master plan that
    /// refuses to go. Master plans that agree are discarded along with
    /// everything above them and the search continues below. Returns how many
    /// plans were discarded.
    pub fn discard_consulting_master_plans(&mut self) -> usize {
        let mut discarded = 0;
        loop {
            let Some(master) = self.plans.iter().rposition(|plan| plan.is_master_plan()) else {
                return discarded + self.discard_all_plans();
            };
            if !self.plans[master].okay_to_discard() {
                debug!(
                    "thread 0x{:04x}: master plan '{}' refused discard",
                    self.tid,
                    self.plans[master].name()
                );
                return discarded + self.discard_down_to(master + 1);
            }
            discarded += self.discard_down_to(master);
        }
    }

    /// Discards until only `len` active plans remain.
    fn discard_down_to(&mut self, len: usize) -> usize {
        let mut count = 0;
        while self.plans.len() > len {
            if self.discard_plan().is_err() {
                break;
            }
            count += 1;
        }
        count
    }

    /// Saves the completed sequence and returns a token to restore it by.
    pub fn checkpoint_completed_plans(&mut self) -> CheckpointToken {
        let token = self.checkpoints.save(&self.completed_plans);
        debug!(
            "thread 0x{:04x}: checkpoint {token} of {} completed plans",
            self.tid,
            self.completed_plans.len()
        );
        token
    }

    /// Replaces the completed sequence with the snapshot saved under `token`
    /// and forgets the token.
    ///
    /// # Errors
    ///
    /// Returns `PlanStackError::UnknownCheckpoint` if the token was never
    /// issued or was already restored or discarded.
    pub fn restore_completed_plan_checkpoint(&mut self, token: CheckpointToken) -> Result<()> {
        let saved = self.take_checkpoint(token)?;
        debug!("thread 0x{:04x}: restore checkpoint {token}", self.tid);
        self.completed_plans = saved;
        Ok(())
    }

    /// Forgets the snapshot saved under `token`.
    ///
    /// # Errors
    ///
    /// Returns `PlanStackError::UnknownCheckpoint` for an unknown token.
    pub fn discard_completed_plan_checkpoint(&mut self, token: CheckpointToken) -> Result<()> {
        self.take_checkpoint(token).map(|_| ())
    }

    fn take_checkpoint(&mut self, token: CheckpointToken) -> Result<Vec<PlanHandle>> {
        self.checkpoints
            .take(token)
            .ok_or(PlanStackError::UnknownCheckpoint {
                tid: self.tid,
                token,
            })
    }

    /// Number of checkpoints not yet restored or discarded.
    pub fn outstanding_checkpoints(&self) -> usize {
        self.checkpoints.len()
    }

    /// The plan currently controlling the thread.
    pub fn current_plan(&self) -> Option<&PlanHandle> {
        self.plans.last()
    }

    /// Most recently completed plan, skipping private ones if asked.
    pub fn completed_plan(&self, skip_private: bool) -> Option<&PlanHandle> {
        self.completed_plans
            .iter()
            .rev()
            .find(|plan| !(skip_private && plan.is_private()))
    }

    /// Active plan at `index`, counting from the bottom. With `skip_private`
    /// private plans are left out of the count.
    pub fn plan_by_index(&self, index: usize, skip_private: bool) -> Option<&PlanHandle> {
        self.plans
            .iter()
            .filter(|plan| !(skip_private && plan.is_private()))
            .nth(index)
    }

    /// Return value of the newest completed plan carrying one. When nothing
    /// completed during this stop the current plan is asked instead.
    pub fn return_value_object(&self) -> Option<ReturnValue> {
        if self.completed_plans.is_empty() {
            return self.current_plan().and_then(|plan| plan.return_value());
        }
        self.completed_plans
            .iter()
            .rev()
            .find_map(|plan| plan.return_value())
    }

    /// Expression result, looked up like [`return_value_object`](Self::return_value_object).
    pub fn expression_variable(&self) -> Option<ExpressionVariable> {
        if self.completed_plans.is_empty() {
            return self.current_plan().and_then(|plan| plan.expression_variable());
        }
        self.completed_plans
            .iter()
            .rev()
            .find_map(|plan| plan.expression_variable())
    }

    pub fn any_plans(&self) -> bool {
        !self.plans.is_empty()
    }

    pub fn any_completed_plans(&self) -> bool {
        !self.completed_plans.is_empty()
    }

    pub fn any_discarded_plans(&self) -> bool {
        !self.discarded_plans.is_empty()
    }

    /// True if nothing is active, completed or discarded.
    pub fn is_trivial(&self) -> bool {
        !self.any_plans() && !self.any_completed_plans() && !self.any_discarded_plans()
    }

    pub fn is_plan_done(&self, plan: &PlanHandle) -> bool {
        position_of(&self.completed_plans, plan).is_some()
    }

    pub fn was_plan_discarded(&self, plan: &PlanHandle) -> bool {
        position_of(&self.discarded_plans, plan).is_some()
    }

    /// The plan just below `current` in whichever sequence holds it.
    pub fn previous_plan(&self, current: &PlanHandle) -> Option<&PlanHandle> {
        [&self.completed_plans, &self.discarded_plans, &self.plans]
            .into_iter()
            .find_map(|plans| {
                let index = position_of(plans, current)?;
                Some(index.checked_sub(1).map(|below| &plans[below]))
            })
            .flatten()
    }

    /// Nearest expression-evaluation plan, searching from the top.
    pub fn innermost_expression(&self) -> Option<&PlanHandle> {
        self.plans.iter().rev().find(|plan| plan.kind().is_expression())
    }

    /// Tells every active plan the thread is about to run, then drops the
    /// completed and discarded history of this stop.
    pub fn will_resume(&mut self) {
        for plan in self.plans.iter().rev() {
            plan.will_resume();
        }
        debug!(
            "thread 0x{:04x}: resuming, dropping {} completed and {} discarded plans",
            self.tid,
            self.completed_plans.len(),
            self.discarded_plans.len()
        );
        self.completed_plans.clear();
        self.discarded_plans.clear();
    }

    /// Switches tracing on or off for the stack tracer and every tracer an
    /// active plan carries.
    pub fn enable_tracer(&self, enabled: bool, single_step: bool) {
        let plan_tracers = self.plans.iter().filter_map(|plan| plan.tracer());
        for tracer in self.tracer.iter().cloned().chain(plan_tracers) {
            tracer.enable_tracing(enabled);
            tracer.enable_single_step(single_step);
        }
    }

    /// Hands `tracer` to every active plan and to plans pushed later. `None`
    /// detaches tracing.
    pub fn set_tracer(&mut self, tracer: Option<TracerHandle>) {
        for plan in &self.plans {
            plan.set_tracer(tracer.clone());
        }
        self.tracer = tracer;
    }

    pub fn tracer(&self) -> Option<&TracerHandle> {
        self.tracer.as_ref()
    }

    /// Notifies every plan that the thread is gone and empties all three
    /// sequences.
    pub fn thread_destroyed(&mut self) {
        for plan in self
            .plans
            .iter()
            .chain(&self.discarded_plans)
            .chain(&self.completed_plans)
        {
            plan.thread_destroyed();
        }
        debug!("thread 0x{:04x}: destroyed", self.tid);
        self.plans.clear();
        self.discarded_plans.clear();
        self.completed_plans.clear();
    }

    /// Like [`thread_destroyed`](Self::thread_destroyed), for a thread object
    /// that outlives its plans: the emptied stack gets a [`NullPlan`] as its
    /// current plan.
    pub fn destroy_leaving_null_plan(&mut self) {
        self.thread_destroyed();
        self.push_plan(Arc::new(NullPlan));
    }

    /// One of the three sequences, bottom first.
    pub fn plans_of_kind(&self, kind: StackKind) -> &[PlanHandle] {
        match kind {
            StackKind::Active => &self.plans,
            StackKind::Completed => &self.completed_plans,
            StackKind::Discarded => &self.discarded_plans,
        }
    }

    pub fn plan_count(&self, kind: StackKind) -> usize {
        self.plans_of_kind(kind).len()
    }

    /// Formats the three sequences for a plan listing.
    pub fn dump_thread_plans(&self, level: DescriptionLevel, include_internal: bool) -> String {
        StackDump::new(self, level, include_internal).to_string()
    }
}
