//! Error types for expression compilation and model evaluation.
//!
//! This module provides `CompileError`, the single error enum raised across
//! the construction, compilation, and evaluation of expressions.

use std::fmt;

/// Errors that can occur while building, compiling, or evaluating an
/// expression.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum CompileError {
    /// An argument was malformed: division by zero, a non-positive exponent,
    /// a sample missing a variable the model requires, or a degree-&gt;2
    /// term that leaked past quadratization into BQM emission.
    InvalidArgument {
        /// Description of the invalid argument.
        detail: String,
    },
    /// Coefficient evaluation encountered a placeholder absent from the feed
    /// dictionary.
    MissingPlaceholder {
        /// The placeholder's name.
        name: String,
    },
    /// An invariant the compiler is supposed to maintain internally was
    /// violated. Reaching this means a bug in the compiler, not bad input.
    InternalInvariant {
        /// Description of the violated invariant.
        detail: String,
    },
}

impl CompileError {
    /// Build an `InvalidArgument` error.
    pub fn invalid_argument(detail: impl Into<String>) -> Self {
        CompileError::InvalidArgument {
            detail: detail.into(),
        }
    }

    /// Build a `MissingPlaceholder` error.
    pub fn missing_placeholder(name: impl Into<String>) -> Self {
        CompileError::MissingPlaceholder { name: name.into() }
    }

    /// Build an `InternalInvariant` error.
    pub fn internal_invariant(detail: impl Into<String>) -> Self {
        CompileError::InternalInvariant {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::InvalidArgument { detail } => {
                write!(f, "invalid argument: {detail}")
            }
            CompileError::MissingPlaceholder { name } => {
                write!(f, "missing value for placeholder '{name}' in feed dictionary")
            }
            CompileError::InternalInvariant { detail } => {
                write!(f, "internal invariant violated: {detail}")
            }
        }
    }
}

impl std::error::Error for CompileError {}
