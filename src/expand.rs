//! The Expander: a single-pass visitor turning an [`Expr`] tree into
//! polynomial normal form.
//!
//! Produces an objective polynomial, a penalty polynomial (kept separate
//! until the final sum so penalties do not get multiplied into the
//! objective by an enclosing `Mul`), and a map of named constraint
//! sub-polynomials.

use rustc_hash::FxHashMap;

use crate::expr::{Expr, ExprKind, Predicate};
use crate::poly::{Polynomial, Product};
use crate::registry::VariableRegistry;

/// A named constraint's polynomial form plus the predicate that tests
/// whether its evaluated energy counts as satisfied.
///
/// `decode_sample` needs both a constraint's polynomial form and its
/// satisfaction predicate, so the expander carries both, keyed by name,
/// rather than dropping the predicate on the floor once the polynomial is
/// built.
pub struct ConstraintInfo {
    pub polynomial: Polynomial,
    pub predicate: Predicate,
}

/// The accumulators the Expander threads through recursion.
struct Expansion {
    objective: Polynomial,
    penalty: Polynomial,
    constraints: FxHashMap<String, ConstraintInfo>,
}

/// Merge `r`'s constraints into `l`, keeping `l`'s entry on a name collision.
///
/// Matches depth-first left-to-right visitation: the first-encountered
/// constraint with a given name wins, later ones with the same name are
/// dropped rather than overwriting it.
fn merge_constraints(
    mut l: FxHashMap<String, ConstraintInfo>,
    r: FxHashMap<String, ConstraintInfo>,
) -> FxHashMap<String, ConstraintInfo> {
    for (name, info) in r {
        l.entry(name).or_insert(info);
    }
    l
}

fn expand_node(node: &ExprKind, registry: &mut VariableRegistry) -> Expansion {
    match node {
        ExprKind::NumericLiteral(v) => Expansion {
            objective: Polynomial::constant(*v),
            penalty: Polynomial::zero(),
            constraints: FxHashMap::default(),
        },
        ExprKind::Binary(name) => {
            let idx = registry.index(name);
            Expansion {
                objective: Polynomial::from_term(Product::single(idx), Expr::number(1.0)),
                penalty: Polynomial::zero(),
                constraints: FxHashMap::default(),
            }
        }
        ExprKind::Spin(name) => {
            let idx = registry.index(name);
            let mut objective = Polynomial::from_term(Product::single(idx), Expr::number(2.0));
            objective.add_term(Product::empty(), Expr::number(-1.0));
            Expansion {
                objective,
                penalty: Polynomial::zero(),
                constraints: FxHashMap::default(),
            }
        }
        ExprKind::Placeholder(name) => Expansion {
            objective: Polynomial::from_term(Product::empty(), Expr::placeholder(&**name)),
            penalty: Polynomial::zero(),
            constraints: FxHashMap::default(),
        },
        ExprKind::Add(lhs, rhs) => {
            let l = expand_node(lhs, registry);
            let r = expand_node(rhs, registry);
            Expansion {
                objective: l.objective + r.objective,
                penalty: l.penalty + r.penalty,
                constraints: merge_constraints(l.constraints, r.constraints),
            }
        }
        ExprKind::Mul(lhs, rhs) => {
            let l = expand_node(lhs, registry);
            let r = expand_node(rhs, registry);
            Expansion {
                objective: &l.objective * &r.objective,
                penalty: l.penalty + r.penalty,
                constraints: merge_constraints(l.constraints, r.constraints),
            }
        }
        ExprKind::Constraint {
            inner,
            name,
            predicate,
        } => {
            let inner = expand_node(inner, registry);
            let mut constraints = inner.constraints;
            constraints.insert(
                name.to_string(),
                ConstraintInfo {
                    polynomial: inner.objective.clone(),
                    predicate: predicate.clone(),
                },
            );
            Expansion {
                objective: inner.objective,
                penalty: inner.penalty,
                constraints,
            }
        }
        ExprKind::WithPenalty {
            inner,
            penalty: strength,
            ..
        } => {
            let inner = expand_node(inner, registry);
            let strength = expand_node(strength, registry);
            let penalty = inner.penalty + strength.penalty + strength.objective;
            Expansion {
                objective: inner.objective,
                penalty,
                constraints: merge_constraints(inner.constraints, strength.constraints),
            }
        }
    }
}

/// Expand `expr` into `(combined_polynomial, constraints)`, extending
/// `registry` with every variable name encountered.
///
/// The combined polynomial is `objective + penalty`: penalties are kept
/// apart from the objective throughout recursion so an enclosing `Mul`
/// never multiplies a penalty term into the objective, then folded in once
/// at the top.
pub fn expand(
    expr: &Expr,
    registry: &mut VariableRegistry,
) -> (Polynomial, FxHashMap<String, ConstraintInfo>) {
    let result = expand_node(expr, registry);
    (result.objective + result.penalty, result.constraints)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_variable_expands_to_single_linear_term() {
        let mut reg = VariableRegistry::new();
        let e = Expr::binary("x");
        let (poly, constraints) = expand(&e, &mut reg);
        assert!(constraints.is_empty());
        assert_eq!(poly.len(), 1);
        let x = reg.get("x").unwrap();
        let (product, coeff) = poly.iter().next().unwrap();
        assert_eq!(product.indices(), &[x]);
        assert_eq!(*coeff, Expr::number(1.0));
    }

    #[test]
    fn spin_variable_expands_with_the_2x_minus_1_encoding() {
        let mut reg = VariableRegistry::new();
        let e = Expr::spin("s");
        let (poly, _) = expand(&e, &mut reg);
        let s = reg.get("s").unwrap();
        let mut terms: Vec<_> = poly.iter().collect();
        terms.sort_by_key(|(p, _)| p.len());
        assert_eq!(terms.len(), 2);
        let (empty_product, constant) = terms[0];
        assert!(empty_product.is_empty());
        assert_eq!(*constant, Expr::number(-1.0));
        let (linear_product, linear_coeff) = terms[1];
        assert_eq!(linear_product.indices(), &[s]);
        assert_eq!(*linear_coeff, Expr::number(2.0));
    }

    #[test]
    fn placeholder_stays_symbolic() {
        let mut reg = VariableRegistry::new();
        let e = Expr::placeholder("p");
        let (poly, _) = expand(&e, &mut reg);
        assert_eq!(poly.len(), 1);
        let (product, coeff) = poly.iter().next().unwrap();
        assert!(product.is_empty());
        assert_eq!(*coeff, Expr::placeholder("p"));
    }

    #[test]
    fn multiplication_of_three_binaries_yields_one_cubic_term() {
        let mut reg = VariableRegistry::new();
        let e = Expr::mul(
            Expr::mul(Expr::binary("a"), Expr::binary("b")),
            Expr::binary("c"),
        );
        let (poly, _) = expand(&e, &mut reg);
        assert_eq!(poly.len(), 1);
        let (product, coeff) = poly.iter().next().unwrap();
        assert_eq!(product.len(), 3);
        assert_eq!(*coeff, Expr::number(1.0));
    }

    #[test]
    fn constraint_records_its_inner_objective_under_its_name() {
        let mut reg = VariableRegistry::new();
        let inner = Expr::add(Expr::binary("x"), Expr::binary("y"));
        let e = Expr::constraint(inner, "one-hot");
        let (_, constraints) = expand(&e, &mut reg);
        assert_eq!(constraints.len(), 1);
        assert!(constraints.contains_key("one-hot"));
        assert_eq!(constraints["one-hot"].polynomial.len(), 2);
    }

    #[test]
    fn with_penalty_excludes_the_penalty_term_from_the_objective() {
        let mut reg = VariableRegistry::new();
        let x = Expr::binary("x");
        let penalty_term = Expr::mul(
            Expr::subtract(x.clone(), Expr::number(1.0)),
            Expr::subtract(x.clone(), Expr::number(1.0)),
        );
        let e = Expr::with_penalty(x.clone(), penalty_term.clone(), "p1");

        let mut reg_obj_only = VariableRegistry::new();
        let (objective_alone, _) = expand(&x, &mut reg_obj_only);

        let (combined, constraints) = expand(&e, &mut reg);
        assert!(constraints.is_empty());

        let x_idx = reg.get("x").unwrap();
        let (objective_product, objective_coeff) = objective_alone.iter().next().unwrap();
        assert_eq!(objective_product.indices(), &[x_idx]);
        assert_ne!(combined.len(), objective_alone.len());
        assert_eq!(*objective_coeff, Expr::number(1.0));
    }

    #[test]
    fn duplicate_constraint_name_keeps_the_first_encountered_polynomial() {
        let mut reg = VariableRegistry::new();
        let e = Expr::add(
            Expr::constraint(Expr::binary("a"), "dup"),
            Expr::constraint(Expr::binary("b"), "dup"),
        );
        let (_, constraints) = expand(&e, &mut reg);
        assert_eq!(constraints.len(), 1);
        let a = reg.get("a").unwrap();
        let (product, _) = constraints["dup"].polynomial.iter().next().unwrap();
        assert_eq!(product.indices(), &[a]);
    }

    #[test]
    fn with_penalty_surfaces_a_constraint_nested_inside_it() {
        let mut reg = VariableRegistry::new();
        let constrained = Expr::constraint(Expr::binary("x"), "c1");
        let e = Expr::with_penalty(Expr::binary("y"), constrained, "p1");
        let (_, constraints) = expand(&e, &mut reg);
        assert!(constraints.contains_key("c1"));
    }
}
