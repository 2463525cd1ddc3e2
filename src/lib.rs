#![forbid(unsafe_code)]
//! QUBO/Ising Expression Compiler
//!
//! Compiles symbolic expressions over binary, spin, and placeholder
//! variables into a quadratic unconstrained binary optimization (QUBO) /
//! Ising model suitable for annealing-style solvers.
//!
//! # Pipeline
//!
//! `Expr` (user arithmetic) → the expander (polynomial normal form,
//! spin→binary encoding) → the quadratizer (degree ≤ 2 reduction via
//! auxiliary substitution) → [`Model`].
//!
//! # Usage Examples
//!
//! ## Building an expression and compiling it
//! ```
//! use qubo_compiler::Expr;
//!
//! let x = Expr::binary("x");
//! let y = Expr::binary("y");
//! let model = (x + y).compile_default();
//! ```
//!
//! ## Spin encoding and BQM emission
//! ```
//! use qubo_compiler::Expr;
//! use rustc_hash::FxHashMap;
//!
//! let model = Expr::spin("s").compile_default();
//! let (linear, quadratic, offset) = model.to_bqm_parameters(&FxHashMap::default()).unwrap();
//! assert_eq!(linear["s"], 2.0);
//! assert!(quadratic.is_empty());
//! assert_eq!(offset, -1.0);
//! ```

mod error;
mod eval;
mod expand;
mod expr;
mod model;
mod poly;
mod quadratize;
mod registry;

#[cfg(test)]
mod tests;

pub use error::CompileError;
pub use expr::{Expr, ExprKind, Predicate};
pub use model::{BqmParameters, Model, Solution, Vartype};
pub use poly::{Polynomial, Product};
pub use registry::{VarIndex, VariableRegistry};

/// The default Rosenberg penalty strength used by [`Expr::compile_default`].
pub const DEFAULT_STRENGTH: f64 = 5.0;

/// Compile `expr` into a [`Model`] with the given quadratization strength.
///
/// Equivalent to `expr.compile(strength)`; exposed as a free function for
/// callers that prefer it.
#[must_use]
pub fn compile(expr: &Expr, strength: f64) -> Model {
    Model::compile(expr, strength)
}
