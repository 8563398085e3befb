//! Exact arithmetic tower used to extract generating functions from automata.
//!
//! The tower is built in layers, each generic over the one below:
//!
//! - [`ring`]: the [`Ring`] / [`EuclideanRing`] / [`Field`] traits, implemented for
//!   [`rug::Integer`] at the bottom.
//! - [`Rational`]: exact fractions over a Euclidean ring, always in lowest terms.
//! - [`Polynomial`]: dense univariate polynomials over a field.
//! - [`RationalFunction`]: reduced ratios of polynomials, normalized so every value has a power
//!   series expansion around zero.
//! - [`ExtendedRationalFunction`]: a rational function split into a polynomial part and a proper
//!   fraction with a factored denominator, for human-readable output.
//! - [`matrix`]: Gaussian-elimination inversion over any field, used on matrices of rational
//!   functions.
//!
//! All arithmetic is exact; there are no floating-point types anywhere in the tower.

pub mod extended;
pub mod matrix;
pub mod polynomial;
pub mod rational;
pub mod rational_function;
pub mod ring;

pub use extended::ExtendedRationalFunction;
pub use polynomial::Polynomial;
pub use rational::Rational;
pub use rational_function::RationalFunction;
pub use ring::{EuclideanRing, Field, Ring, ZeroDivision};
