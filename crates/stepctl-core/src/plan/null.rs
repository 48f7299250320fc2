//! Placeholder plan for a thread whose plans were destroyed.

use super::ThreadPlan;
use crate::models::{DescriptionLevel, PlanKind};

/// Inert plan left on the stack of a destroyed thread that is still
/// referenced, so stepping queries on it find a current plan instead of an
/// empty stack.
#[derive(Debug, Default)]
pub struct NullPlan;

impl ThreadPlan for NullPlan {
    fn name(&self) -> &str {
        "null"
    }

    fn kind(&self) -> PlanKind {
        PlanKind::Null
    }

    fn describe(&self, level: DescriptionLevel) -> String {
        match level {
            DescriptionLevel::Brief => "null".to_string(),
            _ => "Null Thread Plan".to_string(),
        }
    }
}
