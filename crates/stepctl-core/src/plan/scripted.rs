//! Data-driven plan used by session replays and tests.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use super::{ThreadPlan, TracerHandle};
use crate::models::{DescriptionLevel, ExpressionVariable, PlanKind, ReturnValue};

fn default_okay_to_discard() -> bool {
    true
}

/// Serializable description of a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanSpec {
    pub name: String,
    pub kind: PlanKind,
    #[serde(default)]
    pub master: bool,
    #[serde(default = "default_okay_to_discard")]
    pub okay_to_discard: bool,
    #[serde(default)]
    pub private: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_value: Option<ReturnValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression_variable: Option<ExpressionVariable>,
}

impl PlanSpec {
    pub fn new(name: impl Into<String>, kind: PlanKind) -> Self {
        Self {
            name: name.into(),
            kind,
            master: false,
            okay_to_discard: true,
            private: false,
            description: None,
            return_value: None,
            expression_variable: None,
        }
    }

    /// Marks the plan as a master plan with the given discard policy.
    pub fn master(mut self, okay_to_discard: bool) -> Self {
        self.master = true;
        self.okay_to_discard = okay_to_discard;
        self
    }

    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_return_value(mut self, value: ReturnValue) -> Self {
        self.return_value = Some(value);
        self
    }

    pub fn with_expression_variable(mut self, variable: ExpressionVariable) -> Self {
        self.expression_variable = Some(variable);
        self
    }
}

/// Lifecycle notification a [`ScriptedPlan`] received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanEvent {
    Pushed,
    WillResume,
    Completed,
    Discarded,
    ThreadDestroyed,
}

/// Plan whose behaviour is fully described by a [`PlanSpec`].
///
/// It records every hook the owning stack fires so the stack's handling of
/// it can be inspected afterwards.
#[derive(Debug)]
pub struct ScriptedPlan {
    spec: PlanSpec,
    tracer: Mutex<Option<TracerHandle>>,
    events: Mutex<Vec<PlanEvent>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Plain data behind the lock; a panicking holder cannot leave it torn.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ScriptedPlan {
    pub fn new(spec: PlanSpec) -> Self {
        Self {
            spec,
            tracer: Mutex::new(None),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn spec(&self) -> &PlanSpec {
        &self.spec
    }

    /// Hooks received so far, oldest first.
    pub fn events(&self) -> Vec<PlanEvent> {
        lock(&self.events).clone()
    }

    fn record(&self, event: PlanEvent) {
        lock(&self.events).push(event);
        let tracer = lock(&self.tracer).clone();
        if let Some(tracer) = tracer {
            tracer.trace(self, &format!("{event:?}"));
        }
    }
}

impl ThreadPlan for ScriptedPlan {
    fn name(&self) -> &str {
        &self.spec.name
    }

    fn kind(&self) -> PlanKind {
        self.spec.kind
    }

    fn is_master_plan(&self) -> bool {
        self.spec.master
    }

    fn okay_to_discard(&self) -> bool {
        self.spec.okay_to_discard
    }

    fn is_private(&self) -> bool {
        self.spec.private
    }

    fn describe(&self, level: DescriptionLevel) -> String {
        let mut text = match level {
            DescriptionLevel::Brief => return self.spec.name.clone(),
            _ => format!("{} plan '{}'", self.spec.kind, self.spec.name),
        };
        if let Some(description) = &self.spec.description {
            text.push_str(": ");
            text.push_str(description);
        }
        if level == DescriptionLevel::Verbose {
            let mut flags = Vec::new();
            if self.spec.master {
                flags.push(if self.spec.okay_to_discard {
                    "master"
                } else {
                    "master, keep"
                });
            }
            if self.spec.private {
                flags.push("private");
            }
            if lock(&self.tracer).is_some() {
                flags.push("traced");
            }
            if !flags.is_empty() {
                text.push_str(&format!(" [{}]", flags.join(", ")));
            }
        }
        text
    }

    fn did_push(&self) {
        self.record(PlanEvent::Pushed);
    }

    fn will_resume(&self) {
        self.record(PlanEvent::WillResume);
    }

    fn did_complete(&self) {
        self.record(PlanEvent::Completed);
    }

    fn was_discarded(&self) {
        self.record(PlanEvent::Discarded);
    }

    fn thread_destroyed(&self) {
        self.record(PlanEvent::ThreadDestroyed);
    }

    fn tracer(&self) -> Option<TracerHandle> {
        lock(&self.tracer).clone()
    }

    fn set_tracer(&self, tracer: Option<TracerHandle>) {
        *lock(&self.tracer) = tracer;
    }

    fn return_value(&self) -> Option<ReturnValue> {
        self.spec.return_value.clone()
    }

    fn expression_variable(&self) -> Option<ExpressionVariable> {
        self.spec.expression_variable.clone()
    }
}
