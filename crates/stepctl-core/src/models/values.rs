//! Values a plan computes and reports once it completes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value returned by a function a plan stepped out of or called.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReturnValue {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Set when the value describes a failure (a thrown error, a failed
    /// expression) rather than a result
    #[serde(default)]
    pub is_error: bool,
}

/// Persistent result variable produced by an expression evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpressionVariable {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

impl fmt::Display for ReturnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(type_name) = &self.type_name {
            write!(f, "({type_name}) ")?;
        }
        write!(f, "{}", self.value)?;
        if self.is_error {
            write!(f, " [error]")?;
        }
        Ok(())
    }
}

impl fmt::Display for ExpressionVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.type_name {
            Some(type_name) => write!(f, "({type_name}) {} = {}", self.name, self.value),
            None => write!(f, "{} = {}", self.name, self.value),
        }
    }
}
