//! Compiles regular expressions into finite automata and, from those, the generating function
//! that counts the accepted words by length.
//!
//! The pipeline runs in four stages, each a standard construction:
//!
//! 1. [`Nfa::compile`] parses the expression (symbols, `+`, postfix `*`, parentheses) straight
//!    into an NFA with epsilon moves.
//! 2. [`Nfa::remove_epsilon_transitions`] contracts epsilon cycles and expands epsilon closures,
//!    leaving an equivalent epsilon-free NFA.
//! 3. [`Nfa::to_dfa`] determinizes it by the subset construction, and [`Dfa::minimize`] collapses
//!    it to the unique minimal automaton.
//! 4. [`Dfa::generating_function`] inverts `I - xA` over the field of rational functions, where
//!    `A` counts edges between states, and sums the start-to-accepting entries.
//!
//! The result is exact: with [`genfun_algebra`]'s number tower underneath, the coefficient of
//! `x^n` in the returned function is precisely the number of accepted words of length `n`.

pub mod dfa;
pub mod error;
pub mod nfa;
pub mod token;

pub use dfa::{Dfa, GeneratingFunction};
pub use nfa::{Label, Nfa};
