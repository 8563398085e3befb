//! Ratios of polynomials, normalized so that power series expansion is well-defined.

use crate::polynomial::Polynomial;
use crate::ring::{Field, Ring, ZeroDivision};
use std::fmt::{self, Display, Formatter};
use std::ops::{Add, Mul, Neg, Sub};

/// A ratio of two polynomials.
///
/// Every value is fully reduced (the numerator and denominator share no common factor) and the
/// denominator's constant term is normalized to one. The second condition means a value like
/// `1/x` is not representable; it also guarantees that every representable value has a power
/// series expansion around zero, which is what makes these usable as generating functions.
///
/// Values with a unit denominator constant term are closed under addition, subtraction, and
/// multiplication, so those operators cannot fail. Division can, and is exposed through
/// [`Field::checked_div`].
#[derive(Debug, Clone)]
pub struct RationalFunction<F: Field> {
    numerator: Polynomial<F>,
    denominator: Polynomial<F>,
}

impl<F: Field> RationalFunction<F> {
    /// Creates a rational function from the given polynomials, reducing the fraction and
    /// normalizing the denominator's constant term to one.
    ///
    /// Returns [`ZeroDivision`] if the denominator is zero, or if the reduced denominator's
    /// constant term is zero (the value has a pole at zero and is not representable).
    pub fn new(
        numerator: Polynomial<F>,
        denominator: Polynomial<F>,
    ) -> Result<Self, ZeroDivision> {
        if denominator.is_zero() {
            return Err(ZeroDivision);
        }

        // the gcd of a non-zero denominator and anything is non-zero, so the exact divisions
        // cannot fail
        let g = Polynomial::gcd(numerator.clone(), denominator.clone());
        let numerator = numerator.div_rem(&g)?.0;
        let denominator = denominator.div_rem(&g)?.0;

        let constant = denominator.coefficient(0);
        if constant.is_zero() {
            return Err(ZeroDivision);
        }

        Ok(Self {
            numerator: numerator.scaled_down(&constant),
            denominator: denominator.scaled_down(&constant),
        })
    }

    /// Creates a rational function with the given numerator over a denominator of one.
    pub fn from_numerator(numerator: Polynomial<F>) -> Self {
        Self {
            numerator,
            denominator: Polynomial::constant(F::one()),
        }
    }

    /// The reduced numerator.
    pub fn numerator(&self) -> &Polynomial<F> {
        &self.numerator
    }

    /// The reduced denominator. Its constant term is always one.
    pub fn denominator(&self) -> &Polynomial<F> {
        &self.denominator
    }

    /// Evaluates the function at `x`.
    ///
    /// Returns [`ZeroDivision`] if `x` is a pole.
    pub fn eval(&self, x: &F) -> Result<F, ZeroDivision> {
        self.numerator.eval(x).checked_div(&self.denominator.eval(x))
    }

    /// Combines a numerator and denominator produced by arithmetic on existing values, where the
    /// denominator is a product of unit-constant-term denominators and therefore valid.
    fn combined(numerator: Polynomial<F>, denominator: Polynomial<F>) -> Self {
        match Self::new(numerator, denominator) {
            Ok(result) => result,
            Err(ZeroDivision) => unreachable!(),
        }
    }
}

impl<F: Field> Default for RationalFunction<F> {
    fn default() -> Self {
        Self::from_numerator(Polynomial::zero())
    }
}

impl<F: Field> From<Polynomial<F>> for RationalFunction<F> {
    fn from(numerator: Polynomial<F>) -> Self {
        Self::from_numerator(numerator)
    }
}

impl<F: Field> PartialEq for RationalFunction<F> {
    fn eq(&self, other: &Self) -> bool {
        self.numerator.clone() * other.denominator.clone()
            == other.numerator.clone() * self.denominator.clone()
    }
}

impl<F: Field> Add for RationalFunction<F> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let numerator = self.numerator.clone() * rhs.denominator.clone()
            + self.denominator.clone() * rhs.numerator.clone();
        if numerator.is_zero() {
            return Self::default();
        }
        Self::combined(numerator, self.denominator * rhs.denominator)
    }
}

impl<F: Field> Sub for RationalFunction<F> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl<F: Field> Mul for RationalFunction<F> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let numerator = self.numerator * rhs.numerator;
        if numerator.is_zero() {
            return Self::default();
        }
        Self::combined(numerator, self.denominator * rhs.denominator)
    }
}

impl<F: Field> Neg for RationalFunction<F> {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            numerator: -self.numerator,
            denominator: self.denominator,
        }
    }
}

impl<F: Field + PartialOrd> Display for RationalFunction<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({})/({})", self.numerator, self.denominator)
    }
}

impl<F: Field + PartialOrd> Ring for RationalFunction<F> {
    fn zero() -> Self {
        Self::default()
    }

    fn one() -> Self {
        Self::from_numerator(Polynomial::constant(F::one()))
    }

    fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }
}

impl<F: Field + PartialOrd> Field for RationalFunction<F> {
    fn checked_div(&self, rhs: &Self) -> Result<Self, ZeroDivision> {
        if rhs.numerator.is_zero() {
            return Err(ZeroDivision);
        }
        let numerator = self.numerator.clone() * rhs.denominator.clone();
        if numerator.is_zero() {
            return Ok(Self::default());
        }
        Self::new(numerator, self.denominator.clone() * rhs.numerator.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rational;
    use pretty_assertions::assert_eq;
    use rug::Integer;

    type Poly = Polynomial<Rational<Integer>>;
    type Func = RationalFunction<Rational<Integer>>;

    fn rat(n: i64, d: i64) -> Rational<Integer> {
        Rational::new(Integer::from(n), Integer::from(d)).unwrap()
    }

    fn poly(coefficients: &[i64]) -> Poly {
        Polynomial::new(coefficients.iter().map(|&c| rat(c, 1)).collect())
    }

    fn func(numerator: &[i64], denominator: &[i64]) -> Func {
        RationalFunction::new(poly(numerator), poly(denominator)).unwrap()
    }

    #[test]
    fn normalization() {
        // (x^2 - 1) / (x - 1) reduces to the polynomial x + 1
        let f = func(&[-1, 0, 1], &[-1, 1]);
        assert_eq!(*f.numerator(), poly(&[1, 1]));
        assert_eq!(*f.denominator(), poly(&[1]));

        // (2) / (2 - 4x): the denominator's constant term is scaled to one
        let f = func(&[2], &[2, -4]);
        assert_eq!(*f.numerator(), poly(&[1]));
        assert_eq!(*f.denominator(), poly(&[1, -2]));
    }

    #[test]
    fn unrepresentable_values() {
        // zero denominator
        assert!(RationalFunction::new(poly(&[1]), Poly::zero()).is_err());
        // 1/x has a pole at zero
        assert!(RationalFunction::new(poly(&[1]), poly(&[0, 1])).is_err());
        // x/x^2 reduces to 1/x
        assert!(RationalFunction::new(poly(&[0, 1]), poly(&[0, 0, 1])).is_err());
    }

    #[test]
    fn arithmetic() {
        let geometric = func(&[1], &[1, -1]); // 1/(1-x)
        let x = Func::from_numerator(poly(&[0, 1]));

        // 1/(1-x) - x/(1-x) = 1
        let quotient = x.clone().checked_div(&func(&[1, -1], &[1])).unwrap();
        assert_eq!(geometric.clone() - quotient, func(&[1], &[1]));

        // 1/(1-x) * (1-x) = 1
        assert_eq!(
            geometric.clone() * func(&[1, -1], &[1]),
            Func::one(),
        );

        // 1/(1-x) + 1/(1+x) = 2/(1-x^2)
        assert_eq!(
            geometric.clone() + func(&[1], &[1, 1]),
            func(&[2], &[1, 0, -1]),
        );

        assert_eq!(geometric.clone() - geometric.clone(), Func::default());
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(
            Func::one().checked_div(&Func::default()),
            Err(ZeroDivision),
        );
        // 1 / x is representable-input but unrepresentable-output
        let x = Func::from_numerator(poly(&[0, 1]));
        assert_eq!(Func::one().checked_div(&x), Err(ZeroDivision));
    }

    #[test]
    fn eval() {
        let f = func(&[1], &[1, -1]); // 1/(1-x)
        assert_eq!(f.eval(&rat(1, 2)), Ok(rat(2, 1)));
        assert_eq!(f.eval(&rat(1, 1)), Err(ZeroDivision));
    }

    #[test]
    fn display() {
        assert_eq!(func(&[0, 1], &[1]).to_string(), "(x)/(1)");
        assert_eq!(func(&[1], &[1, -2]).to_string(), "(1)/(1-2*x)");
        assert_eq!(Func::default().to_string(), "(0)/(1)");
    }
}
