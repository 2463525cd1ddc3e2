//! Structural equality, hashing, and debug formatting for `Expr`.
//!
//! Equality and hashing recurse into children by kind and payload. A
//! `Constraint`'s predicate closure cannot be compared or hashed, so it is
//! excluded — two constraints with the same inner expression and name are
//! equal regardless of predicate, matching the source implementation's
//! `hash()`, which combines the name and inner expression but never the
//! condition.

use std::hash::{Hash, Hasher};

use super::{Expr, ExprKind};

impl PartialEq for ExprKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ExprKind::NumericLiteral(a), ExprKind::NumericLiteral(b)) => a == b,
            (ExprKind::Binary(a), ExprKind::Binary(b))
            | (ExprKind::Spin(a), ExprKind::Spin(b))
            | (ExprKind::Placeholder(a), ExprKind::Placeholder(b)) => a == b,
            (ExprKind::Add(al, ar), ExprKind::Add(bl, br))
            | (ExprKind::Mul(al, ar), ExprKind::Mul(bl, br)) => al == bl && ar == br,
            (
                ExprKind::Constraint {
                    inner: ai, name: an, ..
                },
                ExprKind::Constraint {
                    inner: bi, name: bn, ..
                },
            ) => an == bn && ai == bi,
            (
                ExprKind::WithPenalty {
                    inner: ai,
                    penalty: ap,
                    name: an,
                },
                ExprKind::WithPenalty {
                    inner: bi,
                    penalty: bp,
                    name: bn,
                },
            ) => an == bn && ai == bi && ap == bp,
            _ => false,
        }
    }
}

impl Eq for ExprKind {}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_ref() == other.0.as_ref()
    }
}

impl Eq for Expr {}

impl Hash for ExprKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            ExprKind::NumericLiteral(v) => v.to_bits().hash(state),
            ExprKind::Binary(name) => name.hash(state),
            ExprKind::Spin(name) => name.hash(state),
            ExprKind::Placeholder(name) => name.hash(state),
            ExprKind::Add(l, r) | ExprKind::Mul(l, r) => {
                l.hash(state);
                r.hash(state);
            }
            ExprKind::Constraint { inner, name, .. } => {
                name.hash(state);
                inner.hash(state);
            }
            ExprKind::WithPenalty {
                inner,
                penalty,
                name,
            } => {
                name.hash(state);
                inner.hash(state);
                penalty.hash(state);
            }
        }
    }
}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl std::fmt::Debug for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}
