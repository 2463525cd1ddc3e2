//! `Model`: the compiled, immutable result of `compile()`.
//!
//! Owns the quadratic polynomial, the named constraint sub-polynomials (with
//! their satisfaction predicates), and the variable registry. Resolves
//! placeholders via a feed dictionary to produce numeric BQM parameters,
//! evaluates sample energies, and decodes samples into [`Solution`]s.

use rustc_hash::FxHashMap;

use crate::error::CompileError;
use crate::eval::evaluate;
use crate::expand::{expand, ConstraintInfo};
use crate::poly::Polynomial;
use crate::quadratize::quadratize;
use crate::registry::VariableRegistry;
use crate::Expr;

/// The domain a sample's values are interpreted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vartype {
    /// Values in `{0, 1}`.
    Binary,
    /// Values in `{-1, +1}`, converted to binary via `x = (s + 1) / 2`
    /// before evaluation.
    Spin,
}

/// The compiled result of an expression: a degree ≤ 2 polynomial plus named
/// constraint sub-polynomials, ready to be fed numeric placeholder values
/// and sampled.
pub struct Model {
    quadratic: Polynomial,
    constraints: FxHashMap<String, Polynomial>,
    predicates: FxHashMap<String, crate::expr::Predicate>,
    registry: VariableRegistry,
}

impl std::fmt::Debug for Model {
    /// Predicates are opaque closures with no useful `Debug` rendering, so
    /// this impl reports their count rather than skipping the field
    /// silently.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("quadratic_terms", &self.quadratic.len())
            .field("constraints", &self.constraints.keys().collect::<Vec<_>>())
            .field("variables", &self.registry.len())
            .finish()
    }
}

/// `(linear, quadratic, offset)` BQM parameters.
pub type BqmParameters = (FxHashMap<String, f64>, FxHashMap<(String, String), f64>, f64);

impl Model {
    /// Compile `expr` into a `Model`, expanding it into polynomial normal
    /// form and then quadratizing with the given Rosenberg penalty
    /// `strength`.
    #[must_use]
    pub fn compile(expr: &Expr, strength: f64) -> Self {
        let mut registry = VariableRegistry::new();
        let (polynomial, constraint_infos) = expand(expr, &mut registry);
        let quadratic = quadratize(polynomial, strength, &mut registry);

        let mut constraints = FxHashMap::default();
        let mut predicates = FxHashMap::default();
        for (name, info) in constraint_infos {
            let ConstraintInfo {
                polynomial,
                predicate,
            } = info;
            constraints.insert(name.clone(), polynomial);
            predicates.insert(name, predicate);
        }

        Model {
            quadratic,
            constraints,
            predicates,
            registry,
        }
    }

    /// The underlying variable registry, for callers that need name/index
    /// translation outside the BQM-emission path.
    #[must_use]
    pub fn registry(&self) -> &VariableRegistry {
        &self.registry
    }

    /// Resolve placeholders against `feed` and emit `(linear, quadratic,
    /// offset)` BQM parameters.
    ///
    /// # Errors
    /// [`CompileError::MissingPlaceholder`] if a coefficient references a
    /// placeholder absent from `feed`; [`CompileError::InvalidArgument`] if a
    /// term of degree > 2 has leaked past quadratization (an internal
    /// invariant violation surfaced as a caller-facing error rather than a panic).
    pub fn to_bqm_parameters(&self, feed: &FxHashMap<String, f64>) -> Result<BqmParameters, CompileError> {
        let mut linear = FxHashMap::default();
        let mut quadratic = FxHashMap::default();
        let mut offset = 0.0;

        for (product, coefficient) in self.quadratic.iter() {
            let value = evaluate(coefficient, feed)?;
            match product.indices() {
                [] => offset += value,
                [i] => {
                    let name = self.registry.name(*i).to_string();
                    *linear.entry(name).or_insert(0.0) += value;
                }
                [i, j] => {
                    let key = (
                        self.registry.name(*i).to_string(),
                        self.registry.name(*j).to_string(),
                    );
                    *quadratic.entry(key).or_insert(0.0) += value;
                }
                _ => {
                    return Err(CompileError::invalid_argument(
                        "a term of degree > 2 leaked past quadratization",
                    ))
                }
            }
        }

        Ok((linear, quadratic, offset))
    }

    fn normalize_sample(
        &self,
        sample: &FxHashMap<String, f64>,
        vartype: Vartype,
    ) -> FxHashMap<String, f64> {
        match vartype {
            Vartype::Binary => sample.clone(),
            Vartype::Spin => sample
                .iter()
                .map(|(name, spin)| (name.clone(), (spin + 1.0) / 2.0))
                .collect(),
        }
    }

    /// Look up `name`'s value in a binary-normalized sample, resolving
    /// auxiliary names absent from the sample as the product of their
    /// component variables.
    fn resolve_value(name: &str, sample: &FxHashMap<String, f64>) -> Result<f64, CompileError> {
        if let Some(value) = sample.get(name) {
            return Ok(*value);
        }
        if let Some((a, b)) = name.split_once(" * ") {
            return Ok(Model::resolve_value(a, sample)? * Model::resolve_value(b, sample)?);
        }
        Err(CompileError::invalid_argument(format!(
            "sample is missing a value for variable '{name}'"
        )))
    }

    fn evaluate_polynomial(
        &self,
        polynomial: &Polynomial,
        sample: &FxHashMap<String, f64>,
        feed: &FxHashMap<String, f64>,
    ) -> Result<f64, CompileError> {
        let mut total = 0.0;
        for (product, coefficient) in polynomial.iter() {
            let coeff_value = evaluate(coefficient, feed)?;
            let mut term_value = coeff_value;
            for idx in product.indices() {
                let name = self.registry.name(*idx);
                term_value *= Model::resolve_value(name, sample)?;
            }
            total += term_value;
        }
        Ok(total)
    }

    /// Evaluate the compiled quadratic polynomial's energy on `sample`.
    ///
    /// # Errors
    /// [`CompileError::MissingPlaceholder`] or [`CompileError::InvalidArgument`]
    /// (unknown variable name).
    pub fn energy(
        &self,
        sample: &FxHashMap<String, f64>,
        vartype: Vartype,
        feed: &FxHashMap<String, f64>,
    ) -> Result<f64, CompileError> {
        let normalized = self.normalize_sample(sample, vartype);
        self.evaluate_polynomial(&self.quadratic, &normalized, feed)
    }

    /// Evaluate `sample`'s energy and decode per-constraint satisfaction.
    ///
    /// # Errors
    /// See [`Model::energy`].
    pub fn decode_sample(
        &self,
        sample: &FxHashMap<String, f64>,
        vartype: Vartype,
        feed: &FxHashMap<String, f64>,
    ) -> Result<Solution, CompileError> {
        let normalized = self.normalize_sample(sample, vartype);
        let energy = self.evaluate_polynomial(&self.quadratic, &normalized, feed)?;

        let mut constraints = FxHashMap::default();
        for (name, polynomial) in &self.constraints {
            let constraint_energy = self.evaluate_polynomial(polynomial, &normalized, feed)?;
            let predicate = &self.predicates[name];
            let satisfied = predicate(constraint_energy);
            constraints.insert(name.clone(), (satisfied, constraint_energy));
        }

        Ok(Solution {
            sample: normalized,
            energy,
            constraints,
        })
    }

    /// Decode every sample in `samples`, returning `Solution`s sorted by
    /// energy ascending (stable on ties).
    ///
    /// # Errors
    /// See [`Model::energy`]. The first error encountered aborts the whole
    /// batch.
    pub fn decode_samples(
        &self,
        samples: &[FxHashMap<String, f64>],
        vartype: Vartype,
        feed: &FxHashMap<String, f64>,
    ) -> Result<Vec<Solution>, CompileError> {
        let mut solutions = samples
            .iter()
            .map(|sample| self.decode_sample(sample, vartype, feed))
            .collect::<Result<Vec<_>, _>>()?;
        solutions.sort_by(|a, b| {
            a.energy
                .partial_cmp(&b.energy)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(solutions)
    }
}

/// A decoded sample: its energy and per-constraint satisfaction status.
#[derive(Debug, Clone)]
pub struct Solution {
    sample: FxHashMap<String, f64>,
    energy: f64,
    constraints: FxHashMap<String, (bool, f64)>,
}

impl Solution {
    /// The (binary-normalized) sample this solution was decoded from.
    #[must_use]
    pub fn sample(&self) -> &FxHashMap<String, f64> {
        &self.sample
    }

    /// The total energy of the compiled model on this sample.
    #[must_use]
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Per-constraint `(satisfied, energy)` pairs. When `only_broken` is
    /// true, only unsatisfied constraints are included.
    #[must_use]
    pub fn constraints(&self, only_broken: bool) -> FxHashMap<String, (bool, f64)> {
        if only_broken {
            self.constraints
                .iter()
                .filter(|(_, (satisfied, _))| !satisfied)
                .map(|(name, status)| (name.clone(), *status))
                .collect()
        } else {
            self.constraints.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_feed() -> FxHashMap<String, f64> {
        FxHashMap::default()
    }

    fn sample(pairs: &[(&str, f64)]) -> FxHashMap<String, f64> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn spin_variable_emits_the_documented_bqm_parameters() {
        let model = Model::compile(&Expr::spin("s"), 5.0);
        let (linear, quadratic, offset) = model.to_bqm_parameters(&empty_feed()).unwrap();
        assert_eq!(linear.get("s"), Some(&2.0));
        assert!(quadratic.is_empty());
        assert_eq!(offset, -1.0);
    }

    #[test]
    fn placeholder_times_binary_resolves_via_feed() {
        let e = Expr::mul(Expr::placeholder("p"), Expr::binary("x"));
        let model = Model::compile(&e, 5.0);
        let feed = sample(&[("p", 3.5)]);
        let (linear, _, offset) = model.to_bqm_parameters(&feed).unwrap();
        assert_eq!(linear.get("x"), Some(&3.5));
        assert_eq!(offset, 0.0);
    }

    #[test]
    fn binary_and_via_quadratization_evaluates_correctly_when_auxiliary_is_consistent() {
        let e = Expr::mul(
            Expr::mul(Expr::binary("a"), Expr::binary("b")),
            Expr::binary("c"),
        );
        let model = Model::compile(&e, 5.0);
        assert_eq!(model.quadratic.max_degree(), 2);

        let aux_name = model
            .registry
            .get("a * b")
            .or_else(|| model.registry.get("b * c"))
            .or_else(|| model.registry.get("a * c"))
            .map(|idx| model.registry.name(idx).to_string())
            .expect("an auxiliary should have been introduced");

        let s = sample(&[("a", 1.0), ("b", 1.0), ("c", 1.0), (aux_name.as_str(), 1.0)]);
        let energy = model.energy(&s, Vartype::Binary, &empty_feed()).unwrap();
        assert_eq!(energy, 1.0);
    }

    #[test]
    fn constraint_decoding_reports_broken_with_its_energy() {
        let e = Expr::constraint(
            Expr::subtract(
                Expr::add(Expr::binary("x"), Expr::binary("y")),
                Expr::number(1.0),
            ),
            "one-hot",
        );
        let model = Model::compile(&e, 5.0);

        let satisfied = model
            .decode_sample(&sample(&[("x", 1.0), ("y", 0.0)]), Vartype::Binary, &empty_feed())
            .unwrap();
        assert!(satisfied.constraints(false)["one-hot"].0);

        let broken = model
            .decode_sample(&sample(&[("x", 1.0), ("y", 1.0)]), Vartype::Binary, &empty_feed())
            .unwrap();
        let (ok, energy) = broken.constraints(false)["one-hot"];
        assert!(!ok);
        assert_eq!(energy, 1.0);
        assert_eq!(broken.constraints(true).len(), 1);
    }

    #[test]
    fn with_penalty_objective_excludes_the_squared_penalty_term() {
        let x = Expr::binary("x");
        let penalty = Expr::mul(
            Expr::subtract(x.clone(), Expr::number(1.0)),
            Expr::subtract(x.clone(), Expr::number(1.0)),
        );
        let e = Expr::with_penalty(x, penalty, "p1");
        let model = Model::compile(&e, 5.0);

        let energy_at_one = model
            .energy(&sample(&[("x", 1.0)]), Vartype::Binary, &empty_feed())
            .unwrap();
        assert_eq!(energy_at_one, 1.0);
    }

    #[test]
    fn decode_samples_sorts_by_energy_ascending() {
        let model = Model::compile(&Expr::binary("x"), 5.0);
        let samples = vec![sample(&[("x", 1.0)]), sample(&[("x", 0.0)])];
        let solutions = model
            .decode_samples(&samples, Vartype::Binary, &empty_feed())
            .unwrap();
        assert_eq!(solutions[0].energy(), 0.0);
        assert_eq!(solutions[1].energy(), 1.0);
    }
}
