//! Dense univariate polynomials over a field.

use crate::ring::{Field, ZeroDivision};
use std::fmt::{self, Display, Formatter};
use std::ops::{Add, Mul, Neg, Sub};

/// A polynomial stored as its coefficients in ascending powers of `x`.
///
/// The coefficient list never ends in a zero, so the zero polynomial is the empty list and the
/// leading coefficient of any non-zero polynomial is non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial<F: Field> {
    coefficients: Vec<F>,
}

impl<F: Field> Polynomial<F> {
    /// Creates a polynomial from coefficients in ascending powers of `x`, trimming any trailing
    /// zeros.
    pub fn new(mut coefficients: Vec<F>) -> Self {
        while coefficients.last().is_some_and(|c| c.is_zero()) {
            coefficients.pop();
        }
        Self { coefficients }
    }

    /// The zero polynomial.
    pub fn zero() -> Self {
        Self { coefficients: Vec::new() }
    }

    /// A constant polynomial.
    pub fn constant(value: F) -> Self {
        Self::new(vec![value])
    }

    /// Returns `true` if this is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// The degree, or `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coefficients.len().checked_sub(1)
    }

    /// The coefficient of `x^n`, which is zero for any `n` past the degree.
    pub fn coefficient(&self, n: usize) -> F {
        self.coefficients.get(n).cloned().unwrap_or_else(F::zero)
    }

    /// The coefficients in ascending powers of `x`, with no trailing zeros.
    pub fn coefficients(&self) -> &[F] {
        &self.coefficients
    }

    /// Evaluates the polynomial at `x` with Horner's scheme.
    pub fn eval(&self, x: &F) -> F {
        let mut result = F::zero();
        for c in self.coefficients.iter().rev() {
            result = result * x.clone() + c.clone();
        }
        result
    }

    /// Computes the quotient and remainder of `self / rhs` by long division.
    ///
    /// Returns [`ZeroDivision`] if `rhs` is the zero polynomial.
    pub fn div_rem(&self, rhs: &Self) -> Result<(Self, Self), ZeroDivision> {
        if rhs.is_zero() {
            return Err(ZeroDivision);
        }
        if self.coefficients.len() < rhs.coefficients.len() {
            return Ok((Self::zero(), self.clone()));
        }

        let divisor_len = rhs.coefficients.len();
        // the leading coefficient of a trimmed non-zero polynomial is non-zero, so the inner
        // divisions cannot fail
        let leading = &rhs.coefficients[divisor_len - 1];
        let mut remainder = self.coefficients.clone();
        let mut quotient = vec![F::zero(); remainder.len() - divisor_len + 1];

        for i in (divisor_len - 1..remainder.len()).rev() {
            let factor = remainder[i].checked_div(leading)?;
            let offset = i + 1 - divisor_len;
            for (j, c) in rhs.coefficients.iter().enumerate() {
                remainder[offset + j] =
                    remainder[offset + j].clone() - factor.clone() * c.clone();
            }
            quotient[offset] = factor;
        }

        Ok((Self::new(quotient), Self::new(remainder)))
    }

    /// The greatest common divisor of two polynomials, computed with the Euclidean algorithm.
    ///
    /// The result is monic unless both inputs are zero, in which case it is zero.
    pub fn gcd(mut a: Self, mut b: Self) -> Self {
        if !a.is_zero() {
            a = a.monic();
        }
        while !b.is_zero() {
            b = b.monic();
            // b is non-zero here, so the division cannot fail
            let r = match a.div_rem(&b) {
                Ok((_, r)) => r,
                Err(ZeroDivision) => unreachable!(),
            };
            a = b;
            b = r;
        }
        a
    }

    /// Divides every coefficient by the non-zero scalar `c`.
    pub(crate) fn scaled_down(self, c: &F) -> Self {
        Self::new(
            self.coefficients
                .into_iter()
                .map(|a| match a.checked_div(c) {
                    Ok(a) => a,
                    Err(ZeroDivision) => unreachable!(),
                })
                .collect(),
        )
    }

    /// Scales a non-zero polynomial so its leading coefficient is one.
    fn monic(self) -> Self {
        match self.coefficients.last().cloned() {
            Some(leading) => self.scaled_down(&leading),
            None => self,
        }
    }
}

impl<F: Field> Add for Polynomial<F> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let (mut longer, shorter) = if self.coefficients.len() >= rhs.coefficients.len() {
            (self.coefficients, rhs.coefficients)
        } else {
            (rhs.coefficients, self.coefficients)
        };
        for (i, c) in shorter.into_iter().enumerate() {
            longer[i] = longer[i].clone() + c;
        }
        Self::new(longer)
    }
}

impl<F: Field> Sub for Polynomial<F> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl<F: Field> Mul for Polynomial<F> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        if self.is_zero() || rhs.is_zero() {
            return Self::zero();
        }
        let mut coefficients =
            vec![F::zero(); self.coefficients.len() + rhs.coefficients.len() - 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            for (j, b) in rhs.coefficients.iter().enumerate() {
                coefficients[i + j] = coefficients[i + j].clone() + a.clone() * b.clone();
            }
        }
        Self::new(coefficients)
    }
}

impl<F: Field> Neg for Polynomial<F> {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            coefficients: self.coefficients.into_iter().map(|c| -c).collect(),
        }
    }
}

impl<F: Field + PartialOrd> Display for Polynomial<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let mut printed = false;
        let constant = &self.coefficients[0];
        if !constant.is_zero() {
            write!(f, "{}", constant)?;
            printed = true;
        }

        for (power, c) in self.coefficients.iter().enumerate().skip(1) {
            if c.is_zero() {
                continue;
            }
            if printed && *c > F::zero() {
                write!(f, "+")?;
            }
            if *c == -F::one() {
                write!(f, "-")?;
            } else if *c != F::one() {
                write!(f, "{}*", c)?;
            }
            write!(f, "x")?;
            if power > 1 {
                write!(f, "^{}", power)?;
            }
            printed = true;
        }

        Ok(())
    }
}
