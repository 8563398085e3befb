//! Algebraic traits implemented by every layer of the number tower.
//!
//! The tower is generic from the ground up: [`Rational`](crate::Rational) works over any
//! [`EuclideanRing`], [`Polynomial`](crate::Polynomial) and
//! [`RationalFunction`](crate::RationalFunction) over any [`Field`], and
//! [`matrix::invert`](crate::matrix::invert) over any [`Field`] again. [`rug::Integer`] is the
//! ring everything is instantiated with in practice.

use rug::Integer;
use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter};
use std::ops::{Add, Mul, Neg, Sub};

/// Error produced when an operation attempts to divide by the additive identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZeroDivision;

impl Display for ZeroDivision {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "attempted to divide by zero")
    }
}

impl std::error::Error for ZeroDivision {}

/// A commutative ring: a set closed under addition, subtraction, and multiplication, with the
/// usual identities.
pub trait Ring:
    Clone
    + Debug
    + Display
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    /// The additive identity.
    fn zero() -> Self;

    /// The multiplicative identity.
    fn one() -> Self;

    /// Returns `true` if this value is the additive identity.
    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

/// An ordered [`Ring`] with Euclidean division, supporting gcd computation and factorization.
pub trait EuclideanRing: Ring + PartialOrd {
    /// The Euclidean remainder of `self / rhs`.
    fn rem(&self, rhs: &Self) -> Self;

    /// Divides `self` by `rhs`. The caller guarantees that `rhs` divides `self` exactly.
    fn div_exact(&self, rhs: &Self) -> Self;

    /// The absolute value.
    fn abs(&self) -> Self {
        if *self < Self::zero() {
            -self.clone()
        } else {
            self.clone()
        }
    }

    /// The greatest common divisor, computed with the Euclidean algorithm. The result is never
    /// negative.
    fn gcd(&self, other: &Self) -> Self {
        let mut a = self.clone();
        let mut b = other.clone();
        while !b.is_zero() {
            let r = EuclideanRing::rem(&a, &b);
            a = b;
            b = r;
        }
        EuclideanRing::abs(&a)
    }

    /// The prime factorization of `|self|` by trial division, as `(prime, multiplicity)` pairs in
    /// increasing prime order.
    ///
    /// Zero and units have no prime factors and produce an empty list.
    fn prime_factors(&self) -> Vec<(Self, u32)> {
        let mut a = EuclideanRing::abs(self);
        let mut factors = Vec::new();
        if a.is_zero() {
            return factors;
        }

        let mut candidate = Self::one() + Self::one();
        while a != Self::one() {
            if EuclideanRing::rem(&a, &candidate).is_zero() {
                let mut multiplicity = 0;
                while EuclideanRing::rem(&a, &candidate).is_zero() {
                    a = a.div_exact(&candidate);
                    multiplicity += 1;
                }
                factors.push((candidate.clone(), multiplicity));
            }
            candidate = candidate + Self::one();
        }

        factors
    }
}

/// A [`Ring`] where division by any non-zero element is defined.
pub trait Field: Ring {
    /// Divides `self` by `rhs`, unless `rhs` is zero.
    fn checked_div(&self, rhs: &Self) -> Result<Self, ZeroDivision>;
}

impl Ring for Integer {
    fn zero() -> Self {
        Integer::new()
    }

    fn one() -> Self {
        Integer::from(1)
    }

    fn is_zero(&self) -> bool {
        self.cmp0() == Ordering::Equal
    }
}

impl EuclideanRing for Integer {
    fn rem(&self, rhs: &Self) -> Self {
        Integer::from(self % rhs)
    }

    fn div_exact(&self, rhs: &Self) -> Self {
        self.clone().div_exact(rhs)
    }

    fn abs(&self) -> Self {
        self.clone().abs()
    }

    fn gcd(&self, other: &Self) -> Self {
        self.clone().gcd(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn int(n: i64) -> Integer {
        Integer::from(n)
    }

    #[test]
    fn integer_gcd() {
        assert_eq!(EuclideanRing::gcd(&int(12), &int(18)), int(6));
        assert_eq!(EuclideanRing::gcd(&int(-12), &int(18)), int(6));
        assert_eq!(EuclideanRing::gcd(&int(0), &int(-7)), int(7));
        assert_eq!(EuclideanRing::gcd(&int(0), &int(0)), int(0));
    }

    #[test]
    fn prime_factors() {
        assert_eq!(
            int(360).prime_factors(),
            vec![(int(2), 3), (int(3), 2), (int(5), 1)],
        );
        assert_eq!(int(-15).prime_factors(), vec![(int(3), 1), (int(5), 1)]);
        assert_eq!(int(97).prime_factors(), vec![(int(97), 1)]);
        assert_eq!(int(1).prime_factors(), vec![]);
        assert_eq!(int(0).prime_factors(), vec![]);
    }
}
