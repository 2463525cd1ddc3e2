//! Expression AST for binary/spin/placeholder arithmetic.
//!
//! Eight node kinds (`NumericLiteral`, `Binary`, `Spin`, `Placeholder`,
//! `Add`, `Mul`, `Constraint`, `WithPenalty`) over an immutable, structurally
//! hashed tree. Arithmetic constructors fold literal-literal operations so
//! that e.g. `number(2) + number(3)` is indistinguishable from `number(5)`.

mod display;
mod hash_eq;
mod ops;

use std::sync::Arc;

/// A constraint's satisfaction test: maps the constraint's evaluated energy
/// to whether it is considered satisfied.
pub type Predicate = Arc<dyn Fn(f64) -> bool + Send + Sync>;

/// Exact-zero predicate used when a `Constraint` is built without an
/// explicit one. Exact equality, not a tolerance: floats from
/// integer-valued binary/spin samples land exactly on zero when satisfied.
fn default_predicate(energy: f64) -> bool {
    energy == 0.0
}

/// The algebra of an expression node.
///
/// All nodes are immutable once constructed. Child expressions are shared
/// (`Arc<Expr>`) so the same subtree can appear in multiple parents without
/// cloning the tree.
pub enum ExprKind {
    /// A constant number.
    NumericLiteral(f64),
    /// A binary variable (value in {0,1}).
    Binary(Arc<str>),
    /// A spin variable (value in {-1,+1}).
    Spin(Arc<str>),
    /// An unresolved numeric parameter, evaluated against a feed dictionary
    /// at BQM-emission time.
    Placeholder(Arc<str>),
    /// `lhs + rhs`.
    Add(Arc<Expr>, Arc<Expr>),
    /// `lhs * rhs`.
    Mul(Arc<Expr>, Arc<Expr>),
    /// Labels `inner` as a named constraint; `predicate` tests whether the
    /// constraint's evaluated energy counts as satisfied.
    Constraint {
        /// The labeled sub-expression.
        inner: Arc<Expr>,
        /// The constraint's name, used as the key in `Model`'s constraint map.
        name: Arc<str>,
        /// Satisfaction test over the constraint's evaluated energy.
        predicate: Predicate,
    },
    /// `inner` contributes to the objective; `penalty` is added to the
    /// penalty accumulator only, never to the primary polynomial.
    WithPenalty {
        /// The objective-contributing sub-expression.
        inner: Arc<Expr>,
        /// The penalty-only sub-expression.
        penalty: Arc<Expr>,
        /// A label for this penalty term (not currently surfaced elsewhere,
        /// kept for parity with the constructor's external signature).
        name: Arc<str>,
    },
}

/// An immutable algebraic expression over binary, spin, and placeholder
/// variables.
///
/// Cloning an `Expr` is cheap (an `Arc` bump); equality and hashing are
/// structural, so two independently built expressions with the same shape
/// compare equal and hash identically.
#[derive(Clone)]
pub struct Expr(Arc<ExprKind>);

impl std::ops::Deref for Expr {
    type Target = ExprKind;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Expr {
    fn new(kind: ExprKind) -> Self {
        Expr(Arc::new(kind))
    }

    /// A constant number.
    #[must_use]
    pub fn number(value: f64) -> Self {
        Expr::new(ExprKind::NumericLiteral(value))
    }

    /// A binary variable (value in {0,1}).
    #[must_use]
    pub fn binary(name: impl AsRef<str>) -> Self {
        Expr::new(ExprKind::Binary(Arc::from(name.as_ref())))
    }

    /// A spin variable (value in {-1,+1}).
    #[must_use]
    pub fn spin(name: impl AsRef<str>) -> Self {
        Expr::new(ExprKind::Spin(Arc::from(name.as_ref())))
    }

    /// An unresolved numeric parameter.
    #[must_use]
    pub fn placeholder(name: impl AsRef<str>) -> Self {
        Expr::new(ExprKind::Placeholder(Arc::from(name.as_ref())))
    }

    /// Label `inner` as a named constraint with the default predicate
    /// (satisfied iff the evaluated energy is exactly zero).
    #[must_use]
    pub fn constraint(inner: Expr, name: impl AsRef<str>) -> Self {
        Expr::constraint_with(inner, name, Arc::new(default_predicate))
    }

    /// Label `inner` as a named constraint with an explicit predicate.
    #[must_use]
    pub fn constraint_with(inner: Expr, name: impl AsRef<str>, predicate: Predicate) -> Self {
        Expr::new(ExprKind::Constraint {
            inner: Arc::new(inner),
            name: Arc::from(name.as_ref()),
            predicate,
        })
    }

    /// `inner` contributes to the objective; `penalty` contributes only to
    /// the penalty accumulator.
    #[must_use]
    pub fn with_penalty(inner: Expr, penalty: Expr, name: impl AsRef<str>) -> Self {
        Expr::new(ExprKind::WithPenalty {
            inner: Arc::new(inner),
            penalty: Arc::new(penalty),
            name: Arc::from(name.as_ref()),
        })
    }

    /// Add two expressions, folding `NumericLiteral + NumericLiteral` into a
    /// single literal.
    #[must_use]
    pub fn add(lhs: Expr, rhs: Expr) -> Self {
        if let (ExprKind::NumericLiteral(a), ExprKind::NumericLiteral(b)) = (&*lhs, &*rhs) {
            return Expr::number(a + b);
        }
        Expr::new(ExprKind::Add(Arc::new(lhs), Arc::new(rhs)))
    }

    /// Multiply two expressions, folding `NumericLiteral * NumericLiteral`
    /// into a single literal.
    #[must_use]
    pub fn mul(lhs: Expr, rhs: Expr) -> Self {
        if let (ExprKind::NumericLiteral(a), ExprKind::NumericLiteral(b)) = (&*lhs, &*rhs) {
            return Expr::number(a * b);
        }
        Expr::new(ExprKind::Mul(Arc::new(lhs), Arc::new(rhs)))
    }

    /// Negate: `-a := (-1) * a`.
    #[must_use]
    pub fn negate(self) -> Self {
        Expr::mul(Expr::number(-1.0), self)
    }

    /// Subtract: `a - b := a + (-1) * b`.
    #[must_use]
    pub fn subtract(lhs: Expr, rhs: Expr) -> Self {
        Expr::add(lhs, Expr::mul(Expr::number(-1.0), rhs))
    }

    /// Divide by a numeric constant: `a / c := a * (1 / c)`.
    ///
    /// # Errors
    /// Returns [`crate::CompileError::InvalidArgument`] when `divisor` is
    /// zero.
    pub fn checked_div(self, divisor: f64) -> Result<Self, crate::CompileError> {
        if divisor == 0.0 {
            return Err(crate::CompileError::invalid_argument(
                "division by zero",
            ));
        }
        Ok(Expr::mul(self, Expr::number(1.0 / divisor)))
    }

    /// Raise to an integer power `>= 1` via repeated multiplication.
    ///
    /// # Errors
    /// Returns [`crate::CompileError::InvalidArgument`] when `exponent` is
    /// not positive.
    pub fn checked_pow(self, exponent: i64) -> Result<Self, crate::CompileError> {
        if exponent <= 0 {
            return Err(crate::CompileError::invalid_argument(
                "exponent must be positive",
            ));
        }
        let mut result = self.clone();
        for _ in 1..exponent {
            result = Expr::mul(result, self.clone());
        }
        Ok(result)
    }

    /// Compile this expression into a [`crate::Model`] using the given
    /// quadratization strength.
    #[must_use]
    pub fn compile(&self, strength: f64) -> crate::Model {
        crate::compile(self, strength)
    }

    /// Compile this expression using [`crate::DEFAULT_STRENGTH`].
    #[must_use]
    pub fn compile_default(&self) -> crate::Model {
        self.compile(crate::DEFAULT_STRENGTH)
    }
}
