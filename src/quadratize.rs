//! The Quadratizer: reduces a polynomial to degree ≤ 2 by iteratively
//! substituting the most frequent variable pair with an auxiliary, plus a
//! Rosenberg enforcing penalty.

use std::collections::BTreeMap;

use crate::poly::{Polynomial, Product};
use crate::registry::{VarIndex, VariableRegistry};
use crate::Expr;

/// Scan every term of degree ≥ 3, count unordered pairs `(i, j)` with `i <
/// j`, and return the pair with the largest count. Ties break on the first
/// pair in ascending `(i, j)` lexicographic order, since `counts` is a
/// `BTreeMap` iterated ascending and only a strictly larger count replaces
/// the current best.
fn find_replacing_pair(poly: &Polynomial) -> Option<(VarIndex, VarIndex)> {
    let mut counts: BTreeMap<(VarIndex, VarIndex), usize> = BTreeMap::new();
    for (product, _) in poly.iter() {
        let indices = product.indices();
        if indices.len() < 3 {
            continue;
        }
        for a in 0..indices.len() {
            for b in (a + 1)..indices.len() {
                *counts.entry((indices[a], indices[b])).or_insert(0) += 1;
            }
        }
    }

    let mut best: Option<((VarIndex, VarIndex), usize)> = None;
    for (pair, count) in counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((pair, count)),
        }
    }
    best.map(|(pair, _)| pair)
}

fn substitute_pair(poly: &Polynomial, i: VarIndex, j: VarIndex, k: VarIndex) -> Polynomial {
    let mut result = Polynomial::zero();
    for (product, coefficient) in poly.iter() {
        let new_product = if product.contains_pair(i, j) {
            product.substitute_pair(i, j, k)
        } else {
            product.clone()
        };
        result.add_term(new_product, coefficient.clone());
    }
    result
}

fn append_rosenberg_penalty(poly: &mut Polynomial, i: VarIndex, j: VarIndex, k: VarIndex, strength: f64) {
    poly.add_term(Product::single(k), Expr::number(3.0 * strength));
    poly.add_term(
        Product::new([i, k]),
        Expr::number(-2.0 * strength),
    );
    poly.add_term(
        Product::new([j, k]),
        Expr::number(-2.0 * strength),
    );
    poly.add_term(Product::new([i, j]), Expr::number(strength));
}

/// Reduce `poly` to degree ≤ 2, introducing auxiliary variables in
/// `registry` and appending a Rosenberg enforcing penalty term for each one.
pub fn quadratize(mut poly: Polynomial, strength: f64, registry: &mut VariableRegistry) -> Polynomial {
    while let Some((i, j)) = find_replacing_pair(&poly) {
        let k = registry.auxiliary_for(i, j);
        poly = substitute_pair(&poly, i, j, k);
        append_rosenberg_penalty(&mut poly, i, j, k, strength);
    }
    poly
}
