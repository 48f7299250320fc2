use std::sync::Arc;

use stepctl_core::{
    models::{PlanKind, ThreadList, Tid},
    plan::{PlanHandle, PlanSpec, ScriptedPlan},
    DebugProcess, ProcessBuilder,
};

/// Helper function to build a thread list from identifiers
pub fn threads(tids: &[Tid]) -> ThreadList {
    ThreadList::from_tids(tids.iter().copied()).expect("Failed to build thread list")
}

/// Helper function to create a scripted plan and a handle to it
pub fn scripted(spec: PlanSpec) -> (Arc<ScriptedPlan>, PlanHandle) {
    let plan = Arc::new(ScriptedPlan::new(spec));
    let handle: PlanHandle = plan.clone();
    (plan, handle)
}

/// Helper function to create a process that seeds a base plan on every new
/// thread
pub fn create_test_process() -> DebugProcess {
    ProcessBuilder::new()
        .with_base_plan(|tid| {
            let base: PlanHandle = Arc::new(ScriptedPlan::new(
                PlanSpec::new(format!("base-{tid:x}"), PlanKind::Base).master(false),
            ));
            base
        })
        .build()
}
