//! The stepping-plan capability the stacks are built on.
//!
//! A plan is one unit of execution-control intent for a thread: step over a
//! line, run to an address, call a function to evaluate an expression. How a
//! plan decides that it is done lives in its own implementation; the stacks
//! in [`crate::stack`] only consult the small capability set of
//! [`ThreadPlan`]:
//!
//! - identity, compared by pointer through [`same_plan`]
//! - the *master* flag and [`ThreadPlan::okay_to_discard`], which let an outer
//!   plan survive blanket cancellation
//! - the *private* flag hiding implementation-internal plans from listings
//! - lifecycle hooks fired as the plan moves between sequences
//!
//! Plans are shared as [`PlanHandle`]s. A plan never holds on to a thread
//! handle; the only thread identity anything keeps is the stack's `Tid`.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use stepctl_core::plan::{same_plan, PlanHandle, PlanSpec, ScriptedPlan};
//! use stepctl_core::models::PlanKind;
//!
//! let step: PlanHandle = Arc::new(ScriptedPlan::new(PlanSpec::new("step-over", PlanKind::StepOverRange)));
//! let alias = Arc::clone(&step);
//! assert!(same_plan(&step, &alias));
//! ```

pub mod null;
pub mod scripted;
pub mod tracer;

use std::{fmt, sync::Arc};

pub use null::NullPlan;
pub use scripted::{PlanEvent, PlanSpec, ScriptedPlan};
pub use tracer::{LogTracer, PlanTracer, TracerHandle};

use crate::models::{DescriptionLevel, ExpressionVariable, PlanKind, ReturnValue};

/// Shared handle to a plan.
pub type PlanHandle = Arc<dyn ThreadPlan>;

/// Capability interface of a stepping plan.
///
/// Every hook defaults to doing nothing so simple plans only implement the
/// identity and description methods.
pub trait ThreadPlan: fmt::Debug + Send + Sync {
    /// Short name used in logs and when a script refers to the plan.
    fn name(&self) -> &str;

    fn kind(&self) -> PlanKind;

    /// Master plans may veto being discarded by
    /// [`PlanStack::discard_consulting_master_plans`](crate::stack::PlanStack::discard_consulting_master_plans).
    fn is_master_plan(&self) -> bool {
        false
    }

    /// Only consulted for master plans.
    fn okay_to_discard(&self) -> bool {
        true
    }

    /// Private plans are helpers that user-facing listings hide.
    fn is_private(&self) -> bool {
        false
    }

    /// One-line description for plan dumps.
    fn describe(&self, level: DescriptionLevel) -> String;

    /// The plan became the top of the active stack.
    fn did_push(&self) {}

    /// The owning thread is about to resume.
    fn will_resume(&self) {}

    /// The plan finished and moved to the completed sequence.
    fn did_complete(&self) {}

    /// The plan was cancelled and moved to the discarded sequence.
    fn was_discarded(&self) {}

    /// The thread the plan was stepping has gone away.
    fn thread_destroyed(&self) {}

    fn tracer(&self) -> Option<TracerHandle> {
        None
    }

    fn set_tracer(&self, _tracer: Option<TracerHandle>) {}

    fn return_value(&self) -> Option<ReturnValue> {
        None
    }

    fn expression_variable(&self) -> Option<ExpressionVariable> {
        None
    }
}

/// Identity comparison of two plan handles.
///
/// Compares the data pointers only; vtable pointers for the same type can
/// differ across codegen units.
pub fn same_plan(a: &PlanHandle, b: &PlanHandle) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Position of `plan` in `plans`, by identity.
pub(crate) fn position_of(plans: &[PlanHandle], plan: &PlanHandle) -> Option<usize> {
    plans.iter().position(|candidate| same_plan(candidate, plan))
}
