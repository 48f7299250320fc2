//! Enumerations describing plans, plan sequences and dump verbosity.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Coarse classification of a stepping plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    /// Bottom-most plan of a thread; decides what to do when nothing else is
    /// stepping
    Base,
    CallFunction,
    CallUserExpression,
    StepInstruction,
    StepOverRange,
    StepInRange,
    StepOut,
    StepThrough,
    StepUntil,
    RunToAddress,
    Scripted,
    /// Placeholder left on the stack of a destroyed thread that is still
    /// referenced
    Null,
}

impl PlanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanKind::Base => "base",
            PlanKind::CallFunction => "call_function",
            PlanKind::CallUserExpression => "call_user_expression",
            PlanKind::StepInstruction => "step_instruction",
            PlanKind::StepOverRange => "step_over_range",
            PlanKind::StepInRange => "step_in_range",
            PlanKind::StepOut => "step_out",
            PlanKind::StepThrough => "step_through",
            PlanKind::StepUntil => "step_until",
            PlanKind::RunToAddress => "run_to_address",
            PlanKind::Scripted => "scripted",
            PlanKind::Null => "null",
        }
    }

    /// Plans that run code in the inferior to evaluate an expression.
    pub fn is_expression(&self) -> bool {
        matches!(self, PlanKind::CallFunction | PlanKind::CallUserExpression)
    }
}

impl FromStr for PlanKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.to_lowercase().replace('-', "_").as_str() {
            "base" => PlanKind::Base,
            "call_function" => PlanKind::CallFunction,
            "call_user_expression" => PlanKind::CallUserExpression,
            "step_instruction" => PlanKind::StepInstruction,
            "step_over_range" => PlanKind::StepOverRange,
            "step_in_range" => PlanKind::StepInRange,
            "step_out" => PlanKind::StepOut,
            "step_through" => PlanKind::StepThrough,
            "step_until" => PlanKind::StepUntil,
            "run_to_address" => PlanKind::RunToAddress,
            "scripted" => PlanKind::Scripted,
            "null" => PlanKind::Null,
            _ => return Err(format!("Invalid plan kind: {s}")),
        };
        Ok(kind)
    }
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selects one of the three plan sequences a stack holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackKind {
    Active,
    Completed,
    Discarded,
}

impl StackKind {
    /// Dump order.
    pub const ALL: [StackKind; 3] = [StackKind::Active, StackKind::Completed, StackKind::Discarded];

    /// Heading used when the sequence is dumped.
    pub fn heading(&self) -> &'static str {
        match self {
            StackKind::Active => "Active plan stack",
            StackKind::Completed => "Completed plan stack",
            StackKind::Discarded => "Discarded plan stack",
        }
    }
}

/// How much a plan says about itself in a dump.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionLevel {
    Brief,
    #[default]
    Full,
    Verbose,
}

impl FromStr for DescriptionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "brief" => Ok(DescriptionLevel::Brief),
            "full" => Ok(DescriptionLevel::Full),
            "verbose" => Ok(DescriptionLevel::Verbose),
            _ => Err(format!("Invalid description level: {s}")),
        }
    }
}
