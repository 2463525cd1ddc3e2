//! `std::ops` overloads exposed to the host binding layer.
//!
//! `Div` and integer exponentiation are deliberately *not* `std::ops` trait
//! impls: both can fail (division by zero, non-positive exponent) and
//! `std::ops` traits cannot return a `Result`. Use
//! [`super::Expr::checked_div`] and [`super::Expr::checked_pow`] instead.

use std::ops::{Add, Mul, Neg, Sub};

use super::Expr;

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::add(self, rhs)
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::subtract(self, rhs)
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::mul(self, rhs)
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        self.negate()
    }
}

#[cfg(test)]
mod tests {
    use super::super::Expr;

    #[test]
    fn operators_match_named_constructors() {
        let x = Expr::binary("x");
        let y = Expr::binary("y");
        assert_eq!(x.clone() + y.clone(), Expr::add(x.clone(), y.clone()));
        assert_eq!(x.clone() * y.clone(), Expr::mul(x.clone(), y.clone()));
        assert_eq!(x.clone() - y.clone(), Expr::subtract(x.clone(), y.clone()));
        assert_eq!(-x.clone(), x.clone().negate());
    }
}
