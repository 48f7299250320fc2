//! The process-wide registry of plan stacks.
//!
//! [`PlanStackRegistry`] maps each thread identifier to the [`PlanStack`]
//! holding that thread's plans. At every stop the owner reconciles it with the
//! freshly built [`ThreadList`] through [`update`](PlanStackRegistry::update):
//! stacks of exited threads are dropped, newly seen threads get an empty
//! stack.
//!
//! Thread handles are not trusted across stops, so a stack can be taken out
//! with [`detach`](PlanStackRegistry::detach) and put back under its own
//! stored identifier with [`activate`](PlanStackRegistry::activate). When a
//! stack's stored identifier drifts from its key,
//! [`clean_up`](PlanStackRegistry::clean_up) hands it back to the caller to
//! re-key or drop; the registry never guesses a new key.
//!
//! Entries are kept in ascending identifier order so listings are stable.

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::{
    display::ThreadPlansDump,
    models::{ThreadHandle, ThreadList, Tid},
    params::DumpOptions,
    stack::PlanStack,
};

/// What one reconciliation changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Threads that received a fresh stack
    pub added: Vec<Tid>,
    /// Threads whose stacks were destroyed
    pub removed: Vec<Tid>,
}

impl UpdateSummary {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Plan stacks of every thread of one debugged process, keyed by [`Tid`].
#[derive(Debug, Default)]
pub struct PlanStackRegistry {
    stacks: BTreeMap<Tid, PlanStack>,
}

impl PlanStackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciles the registry with the threads alive at this stop.
    ///
    /// With `delete_missing`, stacks whose thread is absent from `current`
    /// are notified and removed; otherwise they stay, idle. With
    /// `check_for_new`, every thread without a stack gets an empty one.
    pub fn update(
        &mut self,
        current: &ThreadList,
        delete_missing: bool,
        check_for_new: bool,
    ) -> UpdateSummary {
        let mut summary = UpdateSummary::default();

        if check_for_new {
            for thread in current {
                if !self.stacks.contains_key(&thread.tid) {
                    self.add_thread(thread);
                    summary.added.push(thread.tid);
                }
            }
        }

        if delete_missing {
            let missing: Vec<Tid> = self
                .stacks
                .keys()
                .copied()
                .filter(|tid| !current.contains(*tid))
                .collect();
            for tid in missing {
                if self.remove_tid(tid) {
                    summary.removed.push(tid);
                }
            }
        }

        if !summary.is_empty() {
            info!(
                "plan stacks reconciled: added {:?}, removed {:?}, {} tracked",
                summary.added,
                summary.removed,
                self.stacks.len()
            );
        }
        summary
    }

    /// Registers an empty stack for `thread` unless it already has one.
    pub fn add_thread(&mut self, thread: &ThreadHandle) -> &mut PlanStack {
        self.stacks.entry(thread.tid).or_insert_with(|| {
            debug!("thread 0x{:04x}: new plan stack", thread.tid);
            PlanStack::new(thread.tid)
        })
    }

    /// Destroys and removes the stack for `tid`. Returns false if there was
    /// none.
    pub fn remove_tid(&mut self, tid: Tid) -> bool {
        match self.stacks.remove(&tid) {
            Some(mut stack) => {
                stack.thread_destroyed();
                true
            }
            None => false,
        }
    }

    pub fn find(&self, tid: Tid) -> Option<&PlanStack> {
        self.stacks.get(&tid)
    }

    pub fn find_mut(&mut self, tid: Tid) -> Option<&mut PlanStack> {
        self.stacks.get_mut(&tid)
    }

    /// Takes the stack for `tid` out of the registry without notifying it,
    /// so it can be reattached later with [`activate`](Self::activate).
    pub fn detach(&mut self, tid: Tid) -> Option<PlanStack> {
        let stack = self.stacks.remove(&tid);
        if stack.is_some() {
            debug!("thread 0x{:04x}: plan stack detached", tid);
        }
        stack
    }

    /// Inserts `stack` under its own stored identifier. A stack already
    /// registered under that identifier is destroyed and replaced.
    pub fn activate(&mut self, stack: PlanStack) {
        let tid = stack.tid();
        if let Some(mut displaced) = self.stacks.insert(tid, stack) {
            warn!("thread 0x{:04x}: reattached plan stack replaced an existing one", tid);
            displaced.thread_destroyed();
        } else {
            debug!("thread 0x{:04x}: plan stack activated", tid);
        }
    }

    /// Removes and returns every stack whose stored identifier no longer
    /// matches the key it is registered under.
    pub fn clean_up(&mut self) -> Vec<PlanStack> {
        let drifted: Vec<Tid> = self
            .stacks
            .iter()
            .filter(|(key, stack)| !stack.is_tid(**key))
            .map(|(key, _)| *key)
            .collect();

        drifted
            .into_iter()
            .filter_map(|key| {
                let stack = self.stacks.remove(&key)?;
                warn!(
                    "plan stack registered as 0x{:04x} now belongs to 0x{:04x}; detached",
                    key,
                    stack.tid()
                );
                Some(stack)
            })
            .collect()
    }

    /// Destroys every stack. Used when the process goes away.
    pub fn clear(&mut self) {
        for stack in self.stacks.values_mut() {
            stack.thread_destroyed();
        }
        info!("cleared {} plan stacks", self.stacks.len());
        self.stacks.clear();
    }

    /// Resume notification for every registered stack.
    pub fn will_resume(&mut self) {
        for stack in self.stacks.values_mut() {
            stack.will_resume();
        }
    }

    /// Lists the plans of every registered thread, in identifier order.
    pub fn dump_plans(&self, threads: &ThreadList, options: &DumpOptions) -> String {
        let mut output = String::new();
        for (tid, stack) in self.iter() {
            let handle = threads.find_by_tid(tid);
            if options.skip_unreported && handle.is_none() {
                continue;
            }
            output.push_str(&ThreadPlansDump::new(stack, handle, options).to_string());
        }
        output
    }

    /// Lists the plans of one thread. `None` if the thread has no stack, or
    /// is missing from `threads` while `skip_unreported` is set.
    pub fn dump_plans_for_tid(
        &self,
        tid: Tid,
        threads: &ThreadList,
        options: &DumpOptions,
    ) -> Option<String> {
        let handle = threads.find_by_tid(tid);
        if options.skip_unreported && handle.is_none() {
            return None;
        }
        let stack = self.find(tid)?;
        Some(ThreadPlansDump::new(stack, handle, options).to_string())
    }

    /// Removes the stack for `tid` only if the thread is not alive in
    /// `threads`. Returns whether a stack was removed.
    pub fn prune_plans_for_tid(&mut self, tid: Tid, threads: &ThreadList) -> bool {
        if threads.contains(tid) {
            return false;
        }
        self.remove_tid(tid)
    }

    pub fn tids(&self) -> impl Iterator<Item = Tid> + '_ {
        self.stacks.keys().copied()
    }

    /// Registered stacks in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (Tid, &PlanStack)> + '_ {
        self.stacks.iter().map(|(tid, stack)| (*tid, stack))
    }

    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}
