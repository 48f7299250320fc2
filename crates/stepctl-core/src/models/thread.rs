//! Thread identity and the per-stop live thread list.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{PlanStackError, Result};

/// Stable identifier of a logical debuggee thread.
pub type Tid = u64;

/// The thread object a stop hands out.
///
/// Handles are rebuilt at every stop, so two handles for the same `tid` from
/// different stops are distinct values. Nothing in this crate keeps one past
/// the call it was passed to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThreadHandle {
    pub tid: Tid,
    /// User-facing thread number ("thread #1")
    pub index_id: u32,
}

impl ThreadHandle {
    pub fn new(tid: Tid, index_id: u32) -> Self {
        Self { tid, index_id }
    }
}

/// Threads known to be alive at the current stop, in reporting order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadList {
    threads: Vec<ThreadHandle>,
}

impl ThreadList {
    /// Builds a thread list, rejecting duplicate identifiers.
    pub fn new(threads: Vec<ThreadHandle>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(threads.len());
        for thread in &threads {
            if !seen.insert(thread.tid) {
                return Err(PlanStackError::invalid_input("threads")
                    .with_reason(format!("duplicate tid 0x{:04x}", thread.tid)));
            }
        }
        Ok(Self { threads })
    }

    /// Builds a list from bare identifiers, numbering threads from 1.
    pub fn from_tids(tids: impl IntoIterator<Item = Tid>) -> Result<Self> {
        let threads = tids
            .into_iter()
            .zip(1u32..)
            .map(|(tid, index_id)| ThreadHandle::new(tid, index_id))
            .collect();
        Self::new(threads)
    }

    pub fn find_by_tid(&self, tid: Tid) -> Option<&ThreadHandle> {
        self.threads.iter().find(|thread| thread.tid == tid)
    }

    pub fn contains(&self, tid: Tid) -> bool {
        self.find_by_tid(tid).is_some()
    }

    pub fn tids(&self) -> impl Iterator<Item = Tid> + '_ {
        self.threads.iter().map(|thread| thread.tid)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ThreadHandle> {
        self.threads.iter()
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }
}

impl<'a> IntoIterator for &'a ThreadList {
    type Item = &'a ThreadHandle;
    type IntoIter = std::slice::Iter<'a, ThreadHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.threads.iter()
    }
}
