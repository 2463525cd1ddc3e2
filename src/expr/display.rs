//! Canonical `to_string()` form for diagnostics.
//!
//! Not a round-trippable wire format — there is no parser that inverts this
//! output. It exists purely so an `Expr` is readable in logs, test failures,
//! and `assert_eq!` diffs.

use std::fmt;

use super::{Expr, ExprKind};

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &**self {
            ExprKind::NumericLiteral(v) => write!(f, "{v}"),
            ExprKind::Binary(name) => write!(f, "Binary('{name}')"),
            ExprKind::Spin(name) => write!(f, "Spin('{name}')"),
            ExprKind::Placeholder(name) => write!(f, "Placeholder('{name}')"),
            ExprKind::Add(lhs, rhs) => write!(f, "({lhs} + {rhs})"),
            ExprKind::Mul(lhs, rhs) => write!(f, "({lhs} * {rhs})"),
            ExprKind::Constraint { inner, name, .. } => {
                write!(f, "Constraint({inner}, '{name}')")
            }
            ExprKind::WithPenalty {
                inner,
                penalty,
                name,
            } => write!(f, "WithPenalty({inner}, {penalty}, '{name}')"),
        }
    }
}
