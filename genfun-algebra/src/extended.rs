//! Partial-fraction view of a rational function.

use crate::polynomial::Polynomial;
use crate::rational::Rational;
use crate::rational_function::RationalFunction;
use crate::ring::{EuclideanRing, Field, Ring, ZeroDivision};
use std::fmt::{self, Display, Formatter};

/// A rational function split into a polynomial part and a proper fraction with a factored
/// denominator, for display as `rest + numerator / (factor_1^e_1 ... factor_k^e_k)`.
///
/// The denominator is factored over the positive rationals: every positive rational root `c` of
/// the denominator contributes a factor `(1 - x/c)` with its multiplicity, and whatever does not
/// factor that way is kept as a single trailing factor. Roots are found by trying every candidate
/// `d0 / dn` built from the prime factorizations of the (integer-cleared) trailing and leading
/// coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedRationalFunction<T: EuclideanRing> {
    rest: Polynomial<Rational<T>>,
    numerator: Polynomial<Rational<T>>,
    denominator: Vec<(Polynomial<Rational<T>>, u32)>,
}

impl<T: EuclideanRing> ExtendedRationalFunction<T> {
    /// Decomposes a rational function into its partial-fraction view.
    pub fn new(function: RationalFunction<Rational<T>>) -> Self {
        // a rational function's denominator is never zero
        let (rest, mut numerator) = match function.numerator().div_rem(function.denominator()) {
            Ok(pair) => pair,
            Err(ZeroDivision) => unreachable!(),
        };
        let denominator = Self::decompose(function.denominator().clone(), &mut numerator);
        Self { rest, numerator, denominator }
    }

    /// The polynomial part.
    pub fn rest(&self) -> &Polynomial<Rational<T>> {
        &self.rest
    }

    /// The numerator of the proper fraction.
    pub fn numerator(&self) -> &Polynomial<Rational<T>> {
        &self.numerator
    }

    /// The denominator factors of the proper fraction, with their multiplicities.
    pub fn factors(&self) -> &[(Polynomial<Rational<T>>, u32)] {
        &self.denominator
    }

    /// Factors `a` into `(1 - x/c)` terms for each positive rational root `c`. A leftover with no
    /// such roots stays as a final factor; a constant leftover is divided into the numerator
    /// instead.
    fn decompose(
        mut a: Polynomial<Rational<T>>,
        numerator: &mut Polynomial<Rational<T>>,
    ) -> Vec<(Polynomial<Rational<T>>, u32)> {
        // clear the coefficient denominators so the rational root theorem applies
        let degree = a.degree().unwrap_or(0);
        let mut common = a.coefficient(0).denominator().clone();
        for i in 1..=degree {
            common = common.gcd(a.coefficient(i).denominator());
        }
        a = a * Polynomial::constant(Rational::from(common));

        let trailing = a.coefficient(0).numerator().clone();
        let leading = a.coefficient(degree).numerator().clone();

        // every positive rational root is a positive divisor of the trailing coefficient over a
        // positive divisor of the leading one
        let mut candidates = vec![Rational::<T>::one()];
        for (prime, multiplicity) in trailing.prime_factors() {
            let prime = Rational::from(prime);
            let mut expanded = Vec::new();
            for candidate in &candidates {
                let mut value = candidate.clone();
                expanded.push(value.clone());
                for _ in 0..multiplicity {
                    value = value * prime.clone();
                    expanded.push(value.clone());
                }
            }
            candidates = expanded;
        }
        for (prime, multiplicity) in leading.prime_factors() {
            let prime = Rational::from(prime);
            let mut expanded = Vec::new();
            for candidate in &candidates {
                let mut value = candidate.clone();
                expanded.push(value.clone());
                for _ in 0..multiplicity {
                    // primes are non-zero
                    value = match value.checked_div(&prime) {
                        Ok(value) => value,
                        Err(ZeroDivision) => unreachable!(),
                    };
                    expanded.push(value.clone());
                }
            }
            candidates = expanded;
        }

        let mut factors = Vec::new();
        for candidate in &candidates {
            if !a.eval(candidate).is_zero() {
                continue;
            }

            // the root c becomes the factor 1 - x/c
            let inverse = match Rational::one().checked_div(candidate) {
                Ok(inverse) => inverse,
                Err(ZeroDivision) => unreachable!(),
            };
            let factor = Polynomial::new(vec![Rational::one(), -inverse]);

            let mut multiplicity = 0;
            loop {
                a = match a.div_rem(&factor) {
                    Ok((quotient, _)) => quotient,
                    Err(ZeroDivision) => unreachable!(),
                };
                multiplicity += 1;
                if !a.eval(candidate).is_zero() {
                    break;
                }
            }
            factors.push((factor, multiplicity));
        }

        if a.degree().is_some_and(|d| d > 0) {
            factors.push((a, 1));
        } else if !a.is_zero() {
            // a constant leftover scales the numerator instead of standing as a factor
            *numerator = match numerator.div_rem(&a) {
                Ok((quotient, _)) => quotient,
                Err(ZeroDivision) => unreachable!(),
            };
        }

        factors
    }

    /// Multiplies the factored form back out into a plain rational function.
    pub fn to_rational_function(&self) -> RationalFunction<Rational<T>>
    where
        Rational<T>: PartialOrd,
    {
        let mut denominator = Polynomial::constant(Rational::one());
        for (factor, multiplicity) in &self.denominator {
            for _ in 0..*multiplicity {
                denominator = denominator * factor.clone();
            }
        }
        // the factors came from a denominator with a non-zero constant term, so the product has
        // one too
        let fraction = match RationalFunction::new(self.numerator.clone(), denominator) {
            Ok(fraction) => fraction,
            Err(ZeroDivision) => unreachable!(),
        };
        RationalFunction::from_numerator(self.rest.clone()) + fraction
    }
}

impl<T: EuclideanRing> Display for ExtendedRationalFunction<T>
where
    Rational<T>: PartialOrd,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if !self.rest.is_zero() {
            write!(f, "{}+", self.rest)?;
        }
        write!(f, "({})/(", self.numerator)?;
        if self.denominator.is_empty() {
            write!(f, "1")?;
        }
        for (factor, multiplicity) in &self.denominator {
            write!(f, "({})", factor)?;
            if *multiplicity > 1 {
                write!(f, "^{}", multiplicity)?;
            }
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn geometric_series() {
        // 1/(1-x) factors as itself
        let extended = ExtendedRationalFunction::new(func(&[1], &[1, -1]));
        assert_eq!(*extended.rest(), Poly::zero());
        assert_eq!(*extended.numerator(), poly(&[1]));
        assert_eq!(extended.factors(), &[(poly(&[1, -1]), 1)]);
    }

    #[test]
    fn fractional_root() {
        // 1/(1-2x) has the root 1/2
        let extended = ExtendedRationalFunction::new(func(&[1], &[1, -2]));
        assert_eq!(extended.factors(), &[(poly(&[1, -2]), 1)]);
        assert_eq!(extended.to_string(), "(1)/((1-2*x))");
    }

    #[test]
    fn repeated_root() {
        // (1+x)/(1-x)^2
        let extended = ExtendedRationalFunction::new(func(&[1, 1], &[1, -2, 1]));
        assert_eq!(*extended.rest(), Poly::zero());
        assert_eq!(extended.factors(), &[(poly(&[1, -1]), 2)]);
        assert_eq!(extended.to_string(), "(1+x)/((1-x)^2)");
    }

    #[test]
    fn improper_fraction_has_a_polynomial_part() {
        // x^2/(1-x) = (-1 - x) + 1/(1-x)
        let extended = ExtendedRationalFunction::new(func(&[0, 0, 1], &[1, -1]));
        assert_eq!(*extended.rest(), poly(&[-1, -1]));
        assert_eq!(*extended.numerator(), poly(&[1]));
        assert_eq!(extended.factors(), &[(poly(&[1, -1]), 1)]);
        assert_eq!(extended.to_string(), "-1-x+(1)/((1-x))");
    }

    #[test]
    fn irreducible_denominator_is_kept_whole() {
        // 1 - x - x^2 has no rational roots
        let extended = ExtendedRationalFunction::new(func(&[1], &[1, -1, -1]));
        assert_eq!(extended.factors(), &[(poly(&[1, -1, -1]), 1)]);
        assert_eq!(extended.to_string(), "(1)/((1-x-x^2))");
    }

    #[test]
    fn mixed_factors() {
        // 1/((1-x)(1-2x))
        let extended = ExtendedRationalFunction::new(func(&[1], &[1, -3, 2]));
        assert_eq!(
            extended.factors(),
            &[(poly(&[1, -1]), 1), (poly(&[1, -2]), 1)],
        );
    }

    #[test]
    fn polynomial_input_has_no_factors() {
        let extended = ExtendedRationalFunction::new(func(&[2, 3], &[1]));
        assert_eq!(*extended.rest(), poly(&[2, 3]));
        assert_eq!(*extended.numerator(), Poly::zero());
        assert!(extended.factors().is_empty());
        assert_eq!(extended.to_string(), "2+3*x+(0)/(1)");
    }

    #[test]
    fn round_trip() {
        for function in [
            func(&[1], &[1, -1]),
            func(&[1], &[1, -2]),
            func(&[1, 1], &[1, -2, 1]),
            func(&[1], &[1, -1, -1]),
            func(&[0, 0, 1], &[1, -1]),
            func(&[3, 0, 2], &[1, -3, 2]),
        ] {
            let extended = ExtendedRationalFunction::new(function.clone());
            assert_eq!(extended.to_rational_function(), function);
        }
    }
}
