//! Plain data shared by plans, stacks and the registry.
//!
//! - [`thread`]: thread identifiers, per-stop thread handles and thread lists
//! - [`kind`]: plan kinds, plan sequence selectors and dump verbosity
//! - [`values`]: values a completed plan can report back to the user

pub mod kind;
pub mod thread;
pub mod values;

pub use kind::{DescriptionLevel, PlanKind, StackKind};
pub use thread::{ThreadHandle, ThreadList, Tid};
pub use values::{ExpressionVariable, ReturnValue};
