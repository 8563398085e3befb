//! Deterministic finite automata and their generating functions.

use genfun_algebra::{matrix, Polynomial, Rational, RationalFunction, Ring, ZeroDivision};
use rug::Integer;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Identifies a state within its automaton's arena.
pub type StateId = usize;

/// The generating function of a regular language: the coefficient of `x^n` in its power series
/// expansion counts the words of length `n`.
pub type GeneratingFunction = RationalFunction<Rational<Integer>>;

/// A single automaton state. At most one outgoing edge per symbol; a missing edge rejects.
#[derive(Debug, Clone, Default)]
struct State {
    acceptable: bool,
    transitions: BTreeMap<char, StateId>,
}

/// A deterministic finite automaton, produced by [`Nfa::to_dfa`](crate::Nfa::to_dfa).
///
/// States live in an arena indexed by [`StateId`]; states discarded by minimization leave `None`
/// tombstones behind.
#[derive(Debug, Clone, Default)]
pub struct Dfa {
    states: Vec<Option<State>>,
    start: StateId,
}

impl Dfa {
    /// Runs the automaton over a word.
    pub fn matches(&self, word: &str) -> bool {
        let mut current = self.start;
        for c in word.chars() {
            match self.state(current).transitions.get(&c) {
                Some(&next) => current = next,
                None => return false,
            }
        }
        self.state(current).acceptable
    }

    /// The number of states reachable from the start state.
    pub fn state_count(&self) -> usize {
        self.dense_order().len()
    }

    /// Collapses the automaton to the unique minimal equivalent one, in place.
    ///
    /// Runs the pair-marking form of Myhill–Nerode: a synthetic dead state stands in for every
    /// missing transition, pairs of states are marked distinguishable (by acceptance, then
    /// transitively through their successor pairs), and each class of unmarked pairs merges onto
    /// its lowest-index member. The dead state only materializes if a real state merges into it;
    /// if the automaton accepts nothing at all, it becomes the whole automaton.
    pub fn minimize(mut self) -> Self {
        // dense indices for the pair tables; slot 0 is the synthetic dead state, the start state
        // lands at slot 1
        let dead = self.alloc(false);
        let mut dense = vec![dead];
        dense.extend(self.dense_order());
        let index_of: HashMap<StateId, usize> = dense
            .iter()
            .enumerate()
            .map(|(index, &state)| (state, index))
            .collect();

        let n = dense.len();
        let acceptable: Vec<bool> = dense
            .iter()
            .map(|&state| self.state(state).acceptable)
            .collect();

        // marked[i][j - i] records that dense states i <= j are distinguishable
        let mut marked: Vec<Vec<bool>> = (0..n).map(|i| vec![false; n - i]).collect();
        for i in 0..n {
            for j in i..n {
                marked[i][j - i] = acceptable[i] != acceptable[j];
            }
        }

        // pairs whose fate hangs on (i, j): they get marked the moment (i, j) does
        let mut dependents: Vec<Vec<Vec<(usize, usize)>>> =
            (0..n).map(|i| vec![Vec::new(); n - i]).collect();

        for i in 0..n {
            for j in i + 1..n {
                if marked[i][j - i] {
                    continue;
                }
                let pairs = self.successor_pairs(&dense, &index_of, i, j);
                if pairs.iter().any(|&(a, b)| marked[a][b - a]) {
                    // mark (i, j) and everything transitively waiting on it
                    let mut worklist = vec![(i, j)];
                    while let Some((a, b)) = worklist.pop() {
                        if marked[a][b - a] {
                            continue;
                        }
                        marked[a][b - a] = true;
                        worklist.extend(dependents[a][b - a].iter().copied());
                    }
                } else {
                    for (a, b) in pairs {
                        if a != b {
                            dependents[a][b - a].push((i, j));
                        }
                    }
                }
            }
        }

        // each state joins the lowest-index state it is indistinguishable from
        let mut connected: Vec<usize> = (0..n).collect();
        for i in 0..n {
            if connected[i] != i {
                continue;
            }
            for j in i + 1..n {
                if !marked[i][j - i] {
                    connected[j] = i;
                }
            }
        }
        let dead_used = (1..n).any(|i| connected[i] == 0);

        // rewrite the survivors' transitions onto the representatives
        for i in 1..n {
            if connected[i] != i {
                continue;
            }
            let id = dense[i];
            let rewritten: BTreeMap<char, StateId> = self
                .state(id)
                .transitions
                .iter()
                .map(|(&symbol, &to)| (symbol, dense[connected[index_of[&to]]]))
                .collect();
            self.state_mut(id).transitions = rewritten;
        }

        // the language is empty exactly when the start state is indistinguishable from the dead
        // state
        let has_words = marked[0][1];
        for i in 1..n {
            if connected[i] != i {
                self.free(dense[i]);
            }
        }
        if dead_used {
            if !has_words {
                self.start = dead;
            }
        } else {
            self.free(dead);
        }

        self
    }

    /// Computes the generating function whose `x^n` coefficient is the number of accepted words
    /// of length `n`.
    ///
    /// With `A` the matrix counting edges between reachable states, entry `(start, i)` of
    /// `(I - xA)^-1` is the generating function for walks from the start state to state `i`; the
    /// result is the sum of those entries over the accepting states.
    pub fn generating_function(&self) -> GeneratingFunction {
        let order = self.dense_order();
        let index_of: HashMap<StateId, usize> = order
            .iter()
            .enumerate()
            .map(|(index, &state)| (state, index))
            .collect();

        let n = order.len();
        let x = GeneratingFunction::from_numerator(Polynomial::new(vec![
            Rational::zero(),
            Rational::one(),
        ]));
        let mut entries: Vec<Vec<GeneratingFunction>> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        if i == j {
                            GeneratingFunction::one()
                        } else {
                            GeneratingFunction::default()
                        }
                    })
                    .collect()
            })
            .collect();
        for (i, &state) in order.iter().enumerate() {
            for &to in self.state(state).transitions.values() {
                let j = index_of[&to];
                // one subtraction per edge, so parallel edges accumulate
                entries[i][j] = entries[i][j].clone() - x.clone();
            }
        }

        // I - xA is always invertible here: it evaluates to the identity at x = 0
        let inverse = match matrix::invert(entries) {
            Ok(inverse) => inverse,
            Err(ZeroDivision) => unreachable!(),
        };

        let mut result = GeneratingFunction::default();
        for (i, &state) in order.iter().enumerate() {
            if self.state(state).acceptable {
                result = result + inverse[0][i].clone();
            }
        }
        result
    }

    pub(crate) fn alloc(&mut self, acceptable: bool) -> StateId {
        let id = self.states.len();
        self.states.push(Some(State {
            acceptable,
            ..State::default()
        }));
        id
    }

    pub(crate) fn set_start(&mut self, id: StateId) {
        self.start = id;
    }

    pub(crate) fn set_acceptable(&mut self, id: StateId, acceptable: bool) {
        self.state_mut(id).acceptable = acceptable;
    }

    pub(crate) fn add_transition(&mut self, from: StateId, symbol: char, to: StateId) {
        self.state_mut(from).transitions.insert(symbol, to);
    }

    fn state(&self, id: StateId) -> &State {
        // ids are only handed out by `alloc`, and freed states are never referenced again
        self.states[id].as_ref().expect("state is alive")
    }

    fn state_mut(&mut self, id: StateId) -> &mut State {
        self.states[id].as_mut().expect("state is alive")
    }

    fn free(&mut self, id: StateId) {
        self.states[id] = None;
    }

    /// The states reachable from the start state, in a stable discovery order starting with the
    /// start state itself.
    fn dense_order(&self) -> Vec<StateId> {
        let mut order = Vec::new();
        let mut visited = BTreeSet::new();
        let mut stack = vec![self.start];
        while let Some(state) = stack.pop() {
            if !visited.insert(state) {
                continue;
            }
            order.push(state);
            for &to in self.state(state).transitions.values() {
                stack.push(to);
            }
        }
        order
    }

    /// For each symbol either dense state moves on, the (sorted) pair of dense successor indices.
    /// A missing transition leads to the dead state at index 0, which has no transitions at all.
    fn successor_pairs(
        &self,
        dense: &[StateId],
        index_of: &HashMap<StateId, usize>,
        i: usize,
        j: usize,
    ) -> Vec<(usize, usize)> {
        let mut symbols = BTreeSet::new();
        for &index in [i, j].iter() {
            if index != 0 {
                symbols.extend(self.state(dense[index]).transitions.keys().copied());
            }
        }

        let successor = |index: usize, symbol: char| -> usize {
            if index == 0 {
                return 0;
            }
            self.state(dense[index])
                .transitions
                .get(&symbol)
                .map_or(0, |to| index_of[to])
        };

        symbols
            .into_iter()
            .map(|symbol| {
                let a = successor(i, symbol);
                let b = successor(j, symbol);
                (a.min(b), a.max(b))
            })
            .collect()
    }
}
