//! Products and polynomials: the normal form expressions expand into.
//!
//! A [`Product`] is a sorted, deduplicated multiset of variable indices — the
//! deduplication *is* the Boolean identity `x^2 = x` for binary variables,
//! applied at construction time rather than as a simplification pass. A
//! [`Polynomial`] is a `Product -> coefficient` map; coefficients are plain
//! [`Expr`](crate::Expr) values restricted to the `NumericLiteral` /
//! `Placeholder` / `Add` / `Mul` subset.

use std::collections::BTreeMap;

use crate::registry::VarIndex;
use crate::Expr;

/// A sorted, deduplicated multiset of variable indices. The empty product
/// represents the constant term; all indices refer to binary variables
/// (spins are rewritten to binaries before a product can mention them).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Product(Vec<VarIndex>);

impl Product {
    /// The empty product (the constant term).
    #[must_use]
    pub fn empty() -> Self {
        Product::default()
    }

    /// A single-variable product.
    #[must_use]
    pub fn single(index: VarIndex) -> Self {
        Product(vec![index])
    }

    /// Build a product from any sequence of indices, normalizing by sorting
    /// ascending and removing duplicates.
    pub fn new(indices: impl IntoIterator<Item = VarIndex>) -> Self {
        let mut v: Vec<VarIndex> = indices.into_iter().collect();
        v.sort_unstable();
        v.dedup();
        Product(v)
    }

    /// The union of two products' index sets, normalized.
    #[must_use]
    pub fn union(&self, other: &Product) -> Self {
        Product::new(self.0.iter().copied().chain(other.0.iter().copied()))
    }

    /// The product's degree (number of distinct variables it references).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the empty (constant) product.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The normalized index vector.
    #[must_use]
    pub fn indices(&self) -> &[VarIndex] {
        &self.0
    }

    /// Whether this product's index set contains both `a` and `b`.
    #[must_use]
    pub fn contains_pair(&self, a: VarIndex, b: VarIndex) -> bool {
        self.0.binary_search(&a).is_ok() && self.0.binary_search(&b).is_ok()
    }

    /// Build the product obtained by removing `a` and `b` from this one and
    /// appending `replacement`, renormalized.
    #[must_use]
    pub fn substitute_pair(&self, a: VarIndex, b: VarIndex, replacement: VarIndex) -> Self {
        let mut v: Vec<VarIndex> = self
            .0
            .iter()
            .copied()
            .filter(|&idx| idx != a && idx != b)
            .collect();
        v.push(replacement);
        Product::new(v)
    }
}

/// A mapping from [`Product`] to coefficient expression.
///
/// Backed by a `BTreeMap` (not a hash map) so iteration order is
/// deterministic given a fixed registry — required for
/// `Model::to_bqm_parameters`'s determinism guarantee and for stable
/// energy-ascending sorting in `decode_samples`.
#[derive(Debug, Clone, Default)]
pub struct Polynomial(BTreeMap<Product, Expr>);

impl Polynomial {
    /// The zero polynomial (no terms).
    #[must_use]
    pub fn zero() -> Self {
        Polynomial::default()
    }

    /// A polynomial consisting of a single constant term.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Polynomial::from_term(Product::empty(), Expr::number(value))
    }

    /// A polynomial consisting of a single term.
    #[must_use]
    pub fn from_term(product: Product, coefficient: Expr) -> Self {
        let mut map = BTreeMap::new();
        map.insert(product, coefficient);
        Polynomial(map)
    }

    /// Add a single term, merging coefficients (via the AST `+` constructor,
    /// which folds literal-literal sums) if the product already exists.
    pub fn add_term(&mut self, product: Product, coefficient: Expr) {
        self.0
            .entry(product)
            .and_modify(|existing| {
                *existing = Expr::add(existing.clone(), coefficient.clone());
            })
            .or_insert(coefficient);
    }

    /// Remove a term and return its coefficient, if present.
    pub fn remove_term(&mut self, product: &Product) -> Option<Expr> {
        self.0.remove(product)
    }

    /// Iterate over `(product, coefficient)` pairs in deterministic,
    /// ascending-product order.
    pub fn iter(&self) -> impl Iterator<Item = (&Product, &Expr)> {
        self.0.iter()
    }

    /// The number of distinct terms (zero-coefficient terms are not pruned,
    /// so this may overcount "meaningful" terms).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the polynomial has no terms at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The highest degree (product size) among all terms, or 0 for the zero
    /// polynomial.
    #[must_use]
    pub fn max_degree(&self) -> usize {
        self.0.keys().map(Product::len).max().unwrap_or(0)
    }
}

impl std::ops::Add for Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: Polynomial) -> Polynomial {
        let mut result = self;
        for (product, coefficient) in rhs.0 {
            result.add_term(product, coefficient);
        }
        result
    }
}

impl std::ops::Mul for &Polynomial {
    type Output = Polynomial;

    /// The Cartesian product of terms: every `(productA, coeffA)` paired
    /// with every `(productB, coeffB)` contributes `(productA ∪ productB,
    /// coeffA * coeffB)`, accumulated via the same merge-on-collision rule
    /// as `+`.
    fn mul(self, rhs: &Polynomial) -> Polynomial {
        let mut result = Polynomial::zero();
        for (pa, ca) in &self.0 {
            for (pb, cb) in &rhs.0 {
                let product = pa.union(pb);
                let coefficient = Expr::mul(ca.clone(), cb.clone());
                result.add_term(product, coefficient);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::VariableRegistry;

    #[test]
    fn product_normalizes_duplicates_and_order() {
        let mut reg = VariableRegistry::new();
        let x = reg.index("x");
        let y = reg.index("y");
        let p = Product::new([y, x, y, x]);
        assert_eq!(p.indices(), &[x, y]);
    }

    #[test]
    fn addition_merges_coefficients_on_matching_products() {
        let mut reg = VariableRegistry::new();
        let x = reg.index("x");
        let a = Polynomial::from_term(Product::single(x), Expr::number(2.0));
        let b = Polynomial::from_term(Product::single(x), Expr::number(3.0));
        let sum = a + b;
        assert_eq!(sum.len(), 1);
        let (_, coeff) = sum.iter().next().unwrap();
        assert_eq!(*coeff, Expr::number(5.0));
    }

    #[test]
    fn multiplication_unions_products_and_multiplies_coefficients() {
        let mut reg = VariableRegistry::new();
        let x = reg.index("x");
        let y = reg.index("y");
        let a = Polynomial::from_term(Product::single(x), Expr::number(2.0));
        let b = Polynomial::from_term(Product::single(y), Expr::number(3.0));
        let product = &a * &b;
        assert_eq!(product.len(), 1);
        let (key, coeff) = product.iter().next().unwrap();
        assert_eq!(key.indices(), &[x, y]);
        assert_eq!(*coeff, Expr::number(6.0));
    }

    #[test]
    fn max_degree_reflects_the_largest_product() {
        let mut reg = VariableRegistry::new();
        let x = reg.index("x");
        let y = reg.index("y");
        let z = reg.index("z");
        let poly = Polynomial::from_term(Product::new([x, y, z]), Expr::number(1.0));
        assert_eq!(poly.max_degree(), 3);
    }
}
