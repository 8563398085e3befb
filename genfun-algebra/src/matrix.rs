//! Matrix inversion over an arbitrary field.

use crate::ring::{Field, ZeroDivision};

/// Inverts a square matrix by Gaussian elimination with row pivoting, applying the same row
/// operations to an identity matrix.
///
/// Returns [`ZeroDivision`] if the matrix is singular.
pub fn invert<F: Field>(mut a: Vec<Vec<F>>) -> Result<Vec<Vec<F>>, ZeroDivision> {
    let n = a.len();
    let mut b: Vec<Vec<F>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| if i == j { F::one() } else { F::zero() })
                .collect()
        })
        .collect();

    // forward elimination
    for i in 0..n {
        if a[i][i].is_zero() {
            let Some(pivot) = (i + 1..n).find(|&l| !a[l][i].is_zero()) else {
                return Err(ZeroDivision);
            };
            a.swap(i, pivot);
            b.swap(i, pivot);
        }

        for j in i + 1..n {
            if a[j][i].is_zero() {
                continue;
            }
            let factor = a[j][i].checked_div(&a[i][i])?;
            for k in 0..n {
                b[j][k] = b[j][k].clone() - factor.clone() * b[i][k].clone();
            }
            for k in i..n {
                a[j][k] = a[j][k].clone() - factor.clone() * a[i][k].clone();
            }
        }
    }

    // back substitution; rows below i are already scaled by the time they are used
    for i in (0..n).rev() {
        for j in i + 1..n {
            for k in 0..n {
                b[i][k] = b[i][k].clone() - b[j][k].clone() * a[i][j].clone();
            }
        }
        for k in 0..n {
            b[i][k] = b[i][k].checked_div(&a[i][i])?;
        }
    }

    Ok(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Polynomial, Rational, RationalFunction, Ring};
    use pretty_assertions::assert_eq;
    use rug::Integer;

    type Func = RationalFunction<Rational<Integer>>;

    fn rat(n: i64, d: i64) -> Rational<Integer> {
        Rational::new(Integer::from(n), Integer::from(d)).unwrap()
    }

    fn func(numerator: &[i64], denominator: &[i64]) -> Func {
        let make = |coefficients: &[i64]| {
            Polynomial::new(coefficients.iter().map(|&c| rat(c, 1)).collect())
        };
        RationalFunction::new(make(numerator), make(denominator)).unwrap()
    }

    fn matmul(a: &[Vec<Func>], b: &[Vec<Func>]) -> Vec<Vec<Func>> {
        let n = a.len();
        (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        (0..n).fold(Func::default(), |sum, k| {
                            sum + a[i][k].clone() * b[k][j].clone()
                        })
                    })
                    .collect()
            })
            .collect()
    }

    fn identity(n: usize) -> Vec<Vec<Func>> {
        (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| if i == j { Func::one() } else { Func::default() })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn unit_upper_triangular() {
        // [[1, -x], [0, 1]] inverts to [[1, x], [0, 1]]
        let x = func(&[0, 1], &[1]);
        let a = vec![
            vec![Func::one(), -x.clone()],
            vec![Func::default(), Func::one()],
        ];
        let inverse = invert(a).unwrap();
        assert_eq!(inverse[0][1], x);
        assert_eq!(inverse[0][0], Func::one());
        assert_eq!(inverse[1][0], Func::default());
        assert_eq!(inverse[1][1], Func::one());
    }

    #[test]
    fn product_with_inverse_is_identity() {
        let x = func(&[0, 1], &[1]);
        let a = vec![
            vec![Func::one() - x.clone(), -x.clone(), Func::default()],
            vec![Func::default(), Func::one(), -x.clone()],
            vec![-x.clone(), Func::default(), Func::one() - x.clone()],
        ];
        let inverse = invert(a.clone()).unwrap();
        assert_eq!(matmul(&a, &inverse), identity(3));
        assert_eq!(matmul(&inverse, &a), identity(3));
    }

    #[test]
    fn pivoting() {
        // a zero pivot forces a row swap
        let a = vec![
            vec![Func::default(), Func::one()],
            vec![Func::one(), Func::default()],
        ];
        let inverse = invert(a.clone()).unwrap();
        assert_eq!(matmul(&a, &inverse), identity(2));
    }

    #[test]
    fn singular_matrix() {
        let a = vec![
            vec![Func::one(), Func::one()],
            vec![Func::one(), Func::one()],
        ];
        assert_eq!(invert(a), Err(ZeroDivision));
    }
}
