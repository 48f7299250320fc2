//! Parameter structures shared by the library and its front ends.
//!
//! These carry no framework derives beyond serde; the CLI converts its clap
//! arguments into them with `From` impls so that argument parsing concerns
//! stay out of the core.

use serde::{Deserialize, Serialize};

use crate::models::DescriptionLevel;

/// Controls a registry or thread plan listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DumpOptions {
    /// How much each plan says about itself
    #[serde(default)]
    pub level: DescriptionLevel,
    /// Show private (implementation-internal) plans
    #[serde(default)]
    pub include_internal: bool,
    /// Print "No active thread plans" for threads with nothing in any
    /// sequence instead of an empty listing
    #[serde(default)]
    pub condense_if_trivial: bool,
    /// Leave out threads missing from the current thread list
    #[serde(default)]
    pub skip_unreported: bool,
}

/// How a stop reconciles the registry with the live thread list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdatePolicy {
    /// Remove stacks of threads missing from the list
    pub delete_missing: bool,
    /// Create stacks for threads the registry has not seen
    pub check_for_new: bool,
}

impl Default for UpdatePolicy {
    fn default() -> Self {
        Self {
            delete_missing: true,
            check_for_new: true,
        }
    }
}
