//! Exact fractions over an arbitrary Euclidean ring.

use crate::ring::{EuclideanRing, Field, Ring, ZeroDivision};
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::ops::{Add, Mul, Neg, Sub};

/// A fraction of two ring elements, kept in lowest terms with a positive denominator.
///
/// Arithmetic follows the usual cross-multiplication formulas, with gcd cancellation applied
/// before multiplying to keep intermediate values small.
#[derive(Debug, Clone)]
pub struct Rational<T: EuclideanRing> {
    numerator: T,
    denominator: T,
}

impl<T: EuclideanRing> Rational<T> {
    /// Creates a fraction from the given numerator and denominator, reducing it to lowest terms.
    ///
    /// Returns [`ZeroDivision`] if the denominator is zero.
    pub fn new(numerator: T, denominator: T) -> Result<Self, ZeroDivision> {
        if denominator.is_zero() {
            return Err(ZeroDivision);
        }
        Ok(Self::reduced(numerator, denominator))
    }

    /// Reduces `numerator / denominator` to canonical form. The denominator must be non-zero.
    fn reduced(numerator: T, denominator: T) -> Self {
        let g = numerator.gcd(&denominator);
        let (mut numerator, mut denominator) = if g.is_zero() {
            (numerator, denominator)
        } else {
            (numerator.div_exact(&g), denominator.div_exact(&g))
        };
        if denominator < T::zero() {
            numerator = -numerator;
            denominator = -denominator;
        }
        Self { numerator, denominator }
    }

    /// The numerator, in lowest terms. Carries the sign of the fraction.
    pub fn numerator(&self) -> &T {
        &self.numerator
    }

    /// The denominator, in lowest terms. Always positive.
    pub fn denominator(&self) -> &T {
        &self.denominator
    }
}

impl<T: EuclideanRing> From<T> for Rational<T> {
    fn from(value: T) -> Self {
        Self { numerator: value, denominator: T::one() }
    }
}

impl<T: EuclideanRing> PartialEq for Rational<T> {
    fn eq(&self, other: &Self) -> bool {
        self.numerator.clone() * other.denominator.clone()
            == other.numerator.clone() * self.denominator.clone()
    }
}

impl<T: EuclideanRing> PartialOrd for Rational<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        // denominators are positive, so cross-multiplying preserves the order
        (self.numerator.clone() * other.denominator.clone())
            .partial_cmp(&(other.numerator.clone() * self.denominator.clone()))
    }
}

impl<T: EuclideanRing> Add for Rational<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let g = self.denominator.gcd(&rhs.denominator);
        let left_scale = rhs.denominator.div_exact(&g);
        let right_scale = self.denominator.div_exact(&g);
        Self::reduced(
            self.numerator * left_scale.clone() + rhs.numerator * right_scale,
            self.denominator * left_scale,
        )
    }
}

impl<T: EuclideanRing> Sub for Rational<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl<T: EuclideanRing> Mul for Rational<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        // cancel across the diagonal before multiplying; the factors are then coprime, so the
        // result is already in lowest terms
        let g1 = self.numerator.gcd(&rhs.denominator);
        let g2 = rhs.numerator.gcd(&self.denominator);
        Self {
            numerator: self.numerator.div_exact(&g1) * rhs.numerator.div_exact(&g2),
            denominator: self.denominator.div_exact(&g2) * rhs.denominator.div_exact(&g1),
        }
    }
}

impl<T: EuclideanRing> Neg for Rational<T> {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            numerator: -self.numerator,
            denominator: self.denominator,
        }
    }
}

impl<T: EuclideanRing> Display for Rational<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.denominator == T::one() {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

impl<T: EuclideanRing> Ring for Rational<T> {
    fn zero() -> Self {
        Self { numerator: T::zero(), denominator: T::one() }
    }

    fn one() -> Self {
        Self { numerator: T::one(), denominator: T::one() }
    }

    fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }
}

impl<T: EuclideanRing> Field for Rational<T> {
    fn checked_div(&self, rhs: &Self) -> Result<Self, ZeroDivision> {
        if rhs.numerator.is_zero() {
            return Err(ZeroDivision);
        }
        let mut numerator = rhs.denominator.clone();
        let mut denominator = rhs.numerator.clone();
        if denominator < T::zero() {
            numerator = -numerator;
            denominator = -denominator;
        }
        Ok(self.clone() * Self { numerator, denominator })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rug::Integer;

    fn rat(n: i64, d: i64) -> Rational<Integer> {
        Rational::new(Integer::from(n), Integer::from(d)).unwrap()
    }

    #[test]
    fn canonical_form() {
        let r = rat(2, -4);
        assert_eq!(*r.numerator(), Integer::from(-1));
        assert_eq!(*r.denominator(), Integer::from(2));

        let r = rat(0, 5);
        assert_eq!(*r.numerator(), Integer::from(0));
        assert_eq!(*r.denominator(), Integer::from(1));
    }

    #[test]
    fn zero_denominator() {
        assert_eq!(
            Rational::new(Integer::from(1), Integer::from(0)),
            Err(ZeroDivision),
        );
    }

    #[test]
    fn arithmetic() {
        assert_eq!(rat(1, 2) + rat(1, 3), rat(5, 6));
        assert_eq!(rat(1, 2) - rat(1, 2), rat(0, 1));
        assert_eq!(rat(2, 3) * rat(9, 4), rat(3, 2));
        assert_eq!(-rat(1, 2), rat(-1, 2));
        assert_eq!(rat(5, 6) + rat(1, 6), rat(1, 1));
    }

    #[test]
    fn commutativity_and_associativity() {
        let values = [rat(1, 2), rat(-2, 3), rat(5, 1), rat(0, 1)];
        for a in &values {
            for b in &values {
                assert_eq!(a.clone() + b.clone(), b.clone() + a.clone());
                assert_eq!(a.clone() * b.clone(), b.clone() * a.clone());
                for c in &values {
                    assert_eq!(
                        (a.clone() + b.clone()) + c.clone(),
                        a.clone() + (b.clone() + c.clone()),
                    );
                    assert_eq!(
                        (a.clone() * b.clone()) * c.clone(),
                        a.clone() * (b.clone() * c.clone()),
                    );
                }
            }
        }
    }

    #[test]
    fn division() {
        assert_eq!(rat(1, 2).checked_div(&rat(-3, 4)), Ok(rat(-2, 3)));
        assert_eq!(rat(1, 2).checked_div(&rat(0, 1)), Err(ZeroDivision));
    }

    #[test]
    fn ordering() {
        assert!(rat(1, 3) < rat(1, 2));
        assert!(rat(-1, 2) < rat(-1, 3));
        assert!(rat(7, 7) == rat(1, 1));
    }

    #[test]
    fn display() {
        assert_eq!(rat(3, 1).to_string(), "3");
        assert_eq!(rat(1, -2).to_string(), "-1/2");
    }
}
