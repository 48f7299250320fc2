//! Plan listings for one stack or one thread.

use std::fmt;

use crate::{
    models::{DescriptionLevel, StackKind, ThreadHandle, Tid},
    params::DumpOptions,
    stack::PlanStack,
};

/// The three sequences of a stack as markdown sections.
///
/// Sequences with nothing to show are omitted. Without `include_internal`
/// private plans are skipped and element numbers count only the plans that
/// are printed.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use stepctl_core::{display::StackDump, models::{DescriptionLevel, PlanKind}, plan::{PlanSpec, ScriptedPlan}, PlanStack};
///
/// let mut stack = PlanStack::new(1);
/// stack.push_plan(Arc::new(ScriptedPlan::new(PlanSpec::new("base", PlanKind::Base))));
///
/// let output = StackDump::new(&stack, DescriptionLevel::Brief, false).to_string();
/// assert!(output.contains("### Active plan stack"));
/// assert!(output.contains("- Element 0: base"));
/// ```
pub struct StackDump<'a> {
    stack: &'a PlanStack,
    level: DescriptionLevel,
    include_internal: bool,
}

impl<'a> StackDump<'a> {
    pub fn new(stack: &'a PlanStack, level: DescriptionLevel, include_internal: bool) -> Self {
        Self {
            stack,
            level,
            include_internal,
        }
    }
}

impl fmt::Display for StackDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for kind in StackKind::ALL {
            let mut visible = self
                .stack
                .plans_of_kind(kind)
                .iter()
                .filter(|plan| self.include_internal || !plan.is_private())
                .peekable();
            if visible.peek().is_none() {
                continue;
            }

            writeln!(f, "### {}", kind.heading())?;
            writeln!(f)?;
            for (index, plan) in visible.enumerate() {
                writeln!(f, "- Element {index}: {}", plan.describe(self.level))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Heading line naming a thread by its user-facing number and identifier.
pub struct ThreadHeader {
    pub index_id: u32,
    pub tid: Tid,
}

impl ThreadHeader {
    /// Header for `tid`, numbered from the live handle when there is one.
    pub fn new(tid: Tid, handle: Option<&ThreadHandle>) -> Self {
        Self {
            index_id: handle.map_or(0, |thread| thread.index_id),
            tid,
        }
    }
}

impl fmt::Display for ThreadHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "thread #{}: tid = 0x{:04x}", self.index_id, self.tid)
    }
}

/// A thread header followed by its stack, or a one-line summary when the
/// stack is trivial and condensing was requested.
pub struct ThreadPlansDump<'a> {
    header: ThreadHeader,
    stack: &'a PlanStack,
    options: &'a DumpOptions,
}

impl<'a> ThreadPlansDump<'a> {
    pub fn new(
        stack: &'a PlanStack,
        handle: Option<&ThreadHandle>,
        options: &'a DumpOptions,
    ) -> Self {
        Self {
            header: ThreadHeader::new(stack.tid(), handle),
            stack,
            options,
        }
    }
}

impl fmt::Display for ThreadPlansDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}", self.header)?;
        writeln!(f)?;
        if self.options.condense_if_trivial && self.stack.is_trivial() {
            writeln!(f, "No active thread plans")?;
            return writeln!(f);
        }
        write!(
            f,
            "{}",
            StackDump::new(self.stack, self.options.level, self.options.include_internal)
        )
    }
}
