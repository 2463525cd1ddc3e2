//! Coefficient evaluation: resolving a symbolic coefficient (literals,
//! placeholders, sums, products) against a feed dictionary.

use rustc_hash::FxHashMap;

use crate::error::CompileError;
use crate::expr::{Expr, ExprKind};

/// Evaluate a coefficient expression against `feed`.
///
/// A coefficient is restricted by construction to `NumericLiteral`,
/// `Placeholder`, `Add`, and `Mul` nodes; encountering anything else is an
/// internal invariant violation, not user error.
///
/// # Errors
/// Returns [`CompileError::MissingPlaceholder`] if a placeholder name has no
/// entry in `feed`.
pub fn evaluate(coefficient: &Expr, feed: &FxHashMap<String, f64>) -> Result<f64, CompileError> {
    match &**coefficient {
        ExprKind::NumericLiteral(v) => Ok(*v),
        ExprKind::Placeholder(name) => feed
            .get(&**name)
            .copied()
            .ok_or_else(|| CompileError::missing_placeholder(&**name)),
        ExprKind::Add(lhs, rhs) => Ok(evaluate(lhs, feed)? + evaluate(rhs, feed)?),
        ExprKind::Mul(lhs, rhs) => Ok(evaluate(lhs, feed)? * evaluate(rhs, feed)?),
        ExprKind::Binary(_) | ExprKind::Spin(_) | ExprKind::Constraint { .. } | ExprKind::WithPenalty { .. } => {
            Err(CompileError::internal_invariant(
                "a coefficient expression contained a variable, constraint, or penalty node",
            ))
        }
    }
}
