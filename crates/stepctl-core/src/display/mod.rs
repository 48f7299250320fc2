//! Display wrappers for plan listings and operation feedback.
//!
//! Stacks and the registry do not implement `Display` themselves. Wrapper
//! types decide how much to show (description level, private plans,
//! condensing empty threads) so the same stack can be listed differently by
//! different callers. Output is markdown so the CLI can render it richly or
//! print it as plain text.
//!
//! - [`dump`]: [`StackDump`], [`ThreadHeader`], [`ThreadPlansDump`]
//! - [`status`]: [`OperationStatus`] success/failure lines

pub mod dump;
pub mod status;

pub use dump::{StackDump, ThreadHeader, ThreadPlansDump};
pub use status::OperationStatus;
