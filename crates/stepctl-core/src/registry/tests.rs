//! Tests for the plan stack registry.

use std::sync::Arc;

use super::*;
use crate::{
    models::{DescriptionLevel, PlanKind},
    plan::{PlanEvent, PlanHandle, PlanSpec, ScriptedPlan},
};

fn threads(tids: &[Tid]) -> ThreadList {
    ThreadList::from_tids(tids.iter().copied()).expect("valid thread list")
}

fn registry_with(tids: &[Tid]) -> PlanStackRegistry {
    let mut registry = PlanStackRegistry::new();
    registry.update(&threads(tids), true, true);
    registry
}

fn push(registry: &mut PlanStackRegistry, tid: Tid, name: &str) -> Arc<ScriptedPlan> {
    let plan = Arc::new(ScriptedPlan::new(PlanSpec::new(name, PlanKind::StepOverRange)));
    let handle: PlanHandle = plan.clone();
    registry.find_mut(tid).expect("thread registered").push_plan(handle);
    plan
}

#[test]
fn test_update_prunes_missing_and_adds_new() {
    let mut registry = registry_with(&[1, 2, 3]);
    let kept = push(&mut registry, 2, "kept");
    let doomed = push(&mut registry, 1, "doomed");

    let summary = registry.update(&threads(&[2, 3, 4]), true, true);

    assert_eq!(summary.added, vec![4]);
    assert_eq!(summary.removed, vec![1]);
    assert_eq!(registry.tids().collect::<Vec<_>>(), vec![2, 3, 4]);
    assert!(registry.find(1).is_none());
    assert!(registry.find(4).unwrap().is_trivial());
    assert_eq!(registry.find(2).unwrap().current_plan().unwrap().name(), "kept");
    assert_eq!(kept.events(), vec![PlanEvent::Pushed]);
    assert_eq!(doomed.events().last(), Some(&PlanEvent::ThreadDestroyed));
}

#[test]
fn test_update_keeps_missing_when_not_deleting() {
    let mut registry = registry_with(&[1, 2]);

    let summary = registry.update(&threads(&[2]), false, true);

    assert!(summary.is_empty());
    assert_eq!(registry.len(), 2);
    assert!(registry.find(1).is_some());
}

#[test]
fn test_update_without_check_for_new() {
    let mut registry = registry_with(&[1]);

    let summary = registry.update(&threads(&[1, 5]), true, false);

    assert!(summary.added.is_empty());
    assert!(registry.find(5).is_none());
}

#[test]
fn test_update_is_idempotent() {
    let mut registry = registry_with(&[1, 2]);
    let summary = registry.update(&threads(&[1, 2]), true, true);
    assert!(summary.is_empty());
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_add_thread_keeps_existing_stack() {
    let mut registry = registry_with(&[1]);
    push(&mut registry, 1, "existing");

    registry.add_thread(&ThreadHandle::new(1, 1));

    assert!(registry.find(1).unwrap().any_plans());
}

#[test]
fn test_remove_tid_notifies_stack() {
    let mut registry = registry_with(&[1]);
    let plan = push(&mut registry, 1, "p");

    assert!(registry.remove_tid(1));
    assert!(!registry.remove_tid(1));
    assert_eq!(plan.events().last(), Some(&PlanEvent::ThreadDestroyed));
}

#[test]
fn test_detach_and_activate_preserve_plans() {
    let mut registry = registry_with(&[1]);
    let plan = push(&mut registry, 1, "survivor");

    let stack = registry.detach(1).expect("stack detached");
    assert!(registry.find(1).is_none());
    assert!(!plan.events().contains(&PlanEvent::ThreadDestroyed));

    registry.activate(stack);
    assert_eq!(registry.find(1).unwrap().current_plan().unwrap().name(), "survivor");
}

#[test]
fn test_activate_uses_stack_identifier() {
    let mut registry = PlanStackRegistry::new();
    let mut stack = PlanStack::new(5);
    stack.set_tid(6);

    registry.activate(stack);

    assert!(registry.find(5).is_none());
    assert!(registry.find(6).unwrap().is_tid(6));
}

#[test]
fn test_activate_replaces_existing_entry() {
    let mut registry = registry_with(&[1]);
    let displaced = push(&mut registry, 1, "old");

    let mut replacement = PlanStack::new(1);
    replacement.push_plan(Arc::new(ScriptedPlan::new(PlanSpec::new("new", PlanKind::StepOut))));
    registry.activate(replacement);

    assert_eq!(registry.find(1).unwrap().current_plan().unwrap().name(), "new");
    assert_eq!(displaced.events().last(), Some(&PlanEvent::ThreadDestroyed));
}

#[test]
fn test_clean_up_detaches_only_drifted_entries() {
    let mut registry = registry_with(&[1, 2, 3]);
    push(&mut registry, 3, "moved");
    registry.find_mut(3).unwrap().set_tid(7);

    let detached = registry.clean_up();

    assert_eq!(detached.len(), 1);
    assert_eq!(detached[0].tid(), 7);
    assert_eq!(registry.tids().collect::<Vec<_>>(), vec![1, 2]);
    assert!(registry.clean_up().is_empty());

    for stack in detached {
        registry.activate(stack);
    }
    assert_eq!(registry.find(7).unwrap().current_plan().unwrap().name(), "moved");
}

#[test]
fn test_clear_destroys_everything() {
    let mut registry = registry_with(&[1, 2]);
    let one = push(&mut registry, 1, "one");
    let two = push(&mut registry, 2, "two");

    registry.clear();

    assert!(registry.is_empty());
    assert_eq!(one.events().last(), Some(&PlanEvent::ThreadDestroyed));
    assert_eq!(two.events().last(), Some(&PlanEvent::ThreadDestroyed));
}

#[test]
fn test_will_resume_reaches_every_stack() {
    let mut registry = registry_with(&[1, 2]);
    push(&mut registry, 1, "a");
    push(&mut registry, 2, "b");
    registry.find_mut(1).unwrap().pop_plan().unwrap();

    registry.will_resume();

    assert!(!registry.find(1).unwrap().any_completed_plans());
    assert!(registry.find(2).unwrap().any_plans());
}

#[test]
fn test_dump_plans_in_tid_order() {
    let mut registry = registry_with(&[0x30, 0x10]);
    push(&mut registry, 0x10, "first");
    push(&mut registry, 0x30, "second");
    let options = DumpOptions {
        level: DescriptionLevel::Brief,
        ..DumpOptions::default()
    };

    let output = registry.dump_plans(&threads(&[0x30, 0x10]), &options);

    let first = output.find("thread #2: tid = 0x0010").expect("first header");
    let second = output.find("thread #1: tid = 0x0030").expect("second header");
    assert!(first < second);
    assert!(output.contains("- Element 0: first"));
    assert!(output.contains("- Element 0: second"));
}

#[test]
fn test_dump_plans_condenses_and_skips_unreported() {
    let mut registry = registry_with(&[1, 2]);
    push(&mut registry, 1, "busy");
    registry.update(&threads(&[1]), false, true);
    let live = threads(&[1]);

    let condensed = DumpOptions {
        condense_if_trivial: true,
        ..DumpOptions::default()
    };
    let output = registry.dump_plans(&live, &condensed);
    assert!(output.contains("thread #0: tid = 0x0002"));
    assert!(output.contains("No active thread plans"));

    let reported_only = DumpOptions {
        skip_unreported: true,
        ..condensed
    };
    let output = registry.dump_plans(&live, &reported_only);
    assert!(!output.contains("0x0002"));
    assert!(output.contains("0x0001"));
}

#[test]
fn test_dump_plans_for_tid() {
    let mut registry = registry_with(&[1, 2]);
    push(&mut registry, 2, "target");
    let live = threads(&[1, 2]);
    let options = DumpOptions::default();

    let output = registry.dump_plans_for_tid(2, &live, &options).expect("known thread");
    assert!(output.starts_with("## thread #2: tid = 0x0002"));
    assert!(output.contains("target"));

    assert!(registry.dump_plans_for_tid(9, &live, &options).is_none());

    let reported_only = DumpOptions {
        skip_unreported: true,
        ..DumpOptions::default()
    };
    assert!(registry.dump_plans_for_tid(2, &threads(&[1]), &reported_only).is_none());
}

#[test]
fn test_prune_plans_for_tid_only_removes_dead_threads() {
    let mut registry = registry_with(&[1, 2]);
    let live = threads(&[1]);

    assert!(!registry.prune_plans_for_tid(1, &live));
    assert!(registry.prune_plans_for_tid(2, &live));
    assert!(!registry.prune_plans_for_tid(2, &live));
    assert_eq!(registry.tids().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn test_iter_pairs_keys_with_stacks() {
    let mut registry = registry_with(&[9, 4]);
    push(&mut registry, 9, "nine");

    let entries: Vec<_> = registry
        .iter()
        .map(|(tid, stack)| (tid, stack.tid(), stack.any_plans()))
        .collect();

    assert_eq!(entries, vec![(4, 4, false), (9, 9, true)]);
}
