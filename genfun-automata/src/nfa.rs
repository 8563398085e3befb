//! Nondeterministic finite automata compiled from regular expressions.
//!
//! [`Nfa::compile`] builds a Thompson-style automaton directly from the token stream, with an
//! explicit stack of pending fragments instead of a parse tree. The automaton then goes through
//! [`Nfa::remove_epsilon_transitions`] and [`Nfa::to_dfa`] on its way to a generating function.

use crate::dfa::Dfa;
use crate::error::{MisplacedStar, MisplacedUnion, UnmatchedParen};
use crate::token::{tokenize_complete, Token, TokenKind};
use genfun_error::Error;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::ops::Range;

/// Identifies a state within its automaton's arena.
pub type StateId = usize;

/// An edge label: either an epsilon move or a consumed character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Label {
    Epsilon,
    Symbol(char),
}

/// A single automaton state.
#[derive(Debug, Clone, Default)]
struct State {
    acceptable: bool,

    /// Outgoing edges, grouped by label. Ordered maps keep every traversal deterministic.
    transitions: BTreeMap<Label, BTreeSet<StateId>>,

    /// Every `(source, label)` edge pointing at this state, kept in sync with the sources'
    /// `transitions` so inbound edges can be redirected without scanning the arena.
    parents: BTreeSet<(StateId, Label)>,
}

/// A fragment pushed onto the compiler's stack, waiting for the fragment to its right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingOp {
    /// The saved fragment will be concatenated with the finished group.
    Sequence,
    /// The saved fragment is the left operand of a union.
    Choice,
}

/// A nondeterministic finite automaton with epsilon moves.
///
/// States live in an arena indexed by [`StateId`]. Merged states leave `None` tombstones behind,
/// so ids stay stable for the automaton's whole life.
#[derive(Debug, Clone, Default)]
pub struct Nfa {
    states: Vec<Option<State>>,
    start: StateId,
}

impl Nfa {
    /// Compiles a regular expression into an automaton with epsilon moves.
    ///
    /// The expression is validated up front; on failure no automaton is built and the returned
    /// error points at the offending character.
    pub fn compile(input: &str) -> Result<Self, Error> {
        let tokens: Vec<Token> = tokenize_complete(input)
            .into_vec()
            .into_iter()
            .filter(|token| !token.is_whitespace())
            .collect();
        Self::check(&tokens)?;

        let mut kinds: Vec<(TokenKind, char)> = tokens
            .iter()
            .map(|token| (token.kind, token.lexeme.chars().next().unwrap_or_default()))
            .collect();
        // sentinel that closes the implicit outermost group and drains the stack
        kinds.push((TokenKind::CloseParen, ')'));

        let mut nfa = Nfa::default();
        let mut stack = vec![(nfa.alloc(true), PendingOp::Sequence)];
        let mut fragment = nfa.alloc(true);

        let mut i = 0;
        while !stack.is_empty() {
            let kind_at = |i: usize| kinds.get(i).map(|&(kind, _)| kind);

            // a run of plain characters becomes a chain of concatenations
            while kind_at(i) == Some(TokenKind::Symbol) && kind_at(i + 1) != Some(TokenKind::Star)
            {
                let symbol = nfa.symbol(kinds[i].1);
                fragment = nfa.concatenate(fragment, symbol);
                i += 1;
            }

            if kind_at(i) == Some(TokenKind::Symbol) {
                // a starred character
                let mut symbol = nfa.symbol(kinds[i].1);
                symbol = nfa.cycle(symbol);
                fragment = nfa.concatenate(fragment, symbol);
                i += 1;
                while kind_at(i) == Some(TokenKind::Star) {
                    i += 1;
                }
                continue;
            }

            match kind_at(i) {
                Some(TokenKind::OpenParen) => {
                    stack.push((fragment, PendingOp::Sequence));
                    fragment = nfa.alloc(true);
                }
                Some(TokenKind::Union) => {
                    // fold a pending union before starting the next operand, so `a+b+c`
                    // associates left
                    if let Some(&(left, PendingOp::Choice)) = stack.last() {
                        stack.pop();
                        fragment = nfa.choice(left, fragment);
                    }
                    stack.push((fragment, PendingOp::Choice));
                    fragment = nfa.alloc(true);
                }
                Some(TokenKind::CloseParen) => {
                    let (mut left, op) = match stack.pop() {
                        Some(entry) => entry,
                        None => unreachable!(),
                    };
                    if op == PendingOp::Choice {
                        fragment = nfa.choice(left, fragment);
                        // a choice entry always has the group's opening fragment beneath it
                        (left, _) = match stack.pop() {
                            Some(entry) => entry,
                            None => unreachable!(),
                        };
                    }
                    if kind_at(i + 1) == Some(TokenKind::Star) {
                        fragment = nfa.cycle(fragment);
                        while kind_at(i + 1) == Some(TokenKind::Star) {
                            i += 1;
                        }
                    }
                    fragment = nfa.concatenate(left, fragment);
                }
                _ => unreachable!(),
            }
            i += 1;
        }

        nfa.start = fragment;
        Ok(nfa)
    }

    /// Checks that the token stream forms a valid expression: every operator has its operands and
    /// every parenthesis has a counterpart.
    fn check(tokens: &[Token]) -> Result<(), Error> {
        let mut open_parens: Vec<Range<usize>> = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            let prev = i.checked_sub(1).map(|i| tokens[i].kind);
            let next = tokens.get(i + 1).map(|token| token.kind);

            match token.kind {
                TokenKind::Union => {
                    let has_left = matches!(
                        prev,
                        Some(TokenKind::Symbol | TokenKind::CloseParen | TokenKind::Star),
                    );
                    let has_right =
                        matches!(next, Some(TokenKind::Symbol | TokenKind::OpenParen));
                    if !has_left || !has_right {
                        return Err(Error::new(vec![token.span.clone()], MisplacedUnion));
                    }
                }
                TokenKind::Star => {
                    // a star repeats the character or group directly before it; doubled stars
                    // are rejected
                    let repeatable =
                        matches!(prev, Some(TokenKind::Symbol | TokenKind::CloseParen));
                    if !repeatable {
                        return Err(Error::new(vec![token.span.clone()], MisplacedStar));
                    }
                }
                TokenKind::OpenParen => open_parens.push(token.span.clone()),
                TokenKind::CloseParen => {
                    if open_parens.pop().is_none() {
                        return Err(Error::new(
                            vec![token.span.clone()],
                            UnmatchedParen { opening: false },
                        ));
                    }
                }
                TokenKind::Symbol | TokenKind::Whitespace => {}
            }
        }

        if let Some(span) = open_parens.pop() {
            return Err(Error::new(vec![span], UnmatchedParen { opening: true }));
        }
        Ok(())
    }

    /// The number of states reachable from the start state.
    pub fn state_count(&self) -> usize {
        self.reachable().len()
    }

    /// Returns true if any reachable state still has an epsilon edge.
    pub fn has_epsilon_transitions(&self) -> bool {
        self.reachable()
            .iter()
            .any(|&state| self.state(state).transitions.contains_key(&Label::Epsilon))
    }

    /// Runs the automaton over a word, tracking the set of possible states through epsilon
    /// closures. Works both before and after epsilon elimination.
    pub fn accepts(&self, word: &str) -> bool {
        let mut current = self.closure([self.start].into());
        for c in word.chars() {
            let mut next = BTreeSet::new();
            for &state in &current {
                if let Some(targets) = self.state(state).transitions.get(&Label::Symbol(c)) {
                    next.extend(targets.iter().copied());
                }
            }
            current = self.closure(next);
            if current.is_empty() {
                return false;
            }
        }
        current.iter().any(|&state| self.state(state).acceptable)
    }

    /// Eliminates every epsilon transition in place, preserving the accepted language.
    ///
    /// Epsilon cycles are first contracted to a single state (Kosaraju's algorithm over the
    /// epsilon subgraph), leaving that subgraph acyclic up to self-loops. Each state's epsilon
    /// closure is then memoized bottom-up into its own epsilon edge set, acceptance and labeled
    /// edges are pulled across the closures, and finally the epsilon edges are dropped.
    pub fn remove_epsilon_transitions(&mut self) {
        let reachable = self.reachable();

        // epsilon-only DFS from every reachable state: records each epsilon edge reversed, and
        // stacks the finished roots' preorders so the SCC pass below pops states in the right
        // order
        let mut epsilon_parents: HashMap<StateId, Vec<StateId>> = HashMap::new();
        let mut ordered = Vec::new();
        let mut explored = HashSet::new();
        for &root in &reachable {
            if explored.contains(&root) {
                continue;
            }
            let mut preorder = Vec::new();
            let mut stack = vec![root];
            while let Some(state) = stack.pop() {
                if !explored.insert(state) {
                    continue;
                }
                preorder.push(state);
                if let Some(targets) = self.state(state).transitions.get(&Label::Epsilon) {
                    for &to in targets {
                        epsilon_parents.entry(to).or_default().push(state);
                        stack.push(to);
                    }
                }
            }
            while let Some(state) = preorder.pop() {
                ordered.push(state);
            }
        }

        // strongly connected components of the epsilon subgraph, walked over the reversed edges
        let mut components: Vec<Vec<StateId>> = Vec::new();
        let mut assigned = HashSet::new();
        while let Some(root) = ordered.pop() {
            if assigned.contains(&root) {
                continue;
            }
            let mut component = Vec::new();
            let mut stack = vec![root];
            while let Some(state) = stack.pop() {
                if !assigned.insert(state) {
                    continue;
                }
                component.push(state);
                if let Some(parents) = epsilon_parents.get(&state) {
                    stack.extend(parents.iter().copied());
                }
            }
            components.push(component);
        }

        // collapse each component onto its first member
        let mut survivors = Vec::new();
        for component in components {
            let representative = component[0];
            for &member in &component[1..] {
                self.merge_into(member, representative);
            }
            survivors.push(representative);
        }

        // memoize each state's epsilon closure into its own epsilon edge set, children first;
        // after contraction the only cycles left are self-loops, which the `started` set cuts
        let mut closed = HashSet::new();
        let mut started = HashSet::new();
        for &root in &survivors {
            if closed.contains(&root) {
                continue;
            }
            started.insert(root);
            let mut stack = vec![(root, self.epsilon_targets(root), 0)];
            while !stack.is_empty() {
                let top = stack.len() - 1;
                let next_child = {
                    let (_, children, progress) = &mut stack[top];
                    if *progress < children.len() {
                        let child = children[*progress];
                        *progress += 1;
                        Some(child)
                    } else {
                        None
                    }
                };
                match next_child {
                    Some(child) => {
                        if started.insert(child) {
                            let grandchildren = self.epsilon_targets(child);
                            stack.push((child, grandchildren, 0));
                        }
                    }
                    None => {
                        let (state, children, _) = match stack.pop() {
                            Some(frame) => frame,
                            None => unreachable!(),
                        };
                        let mut closure = self.epsilon_target_set(state);
                        for &child in &children {
                            closure.extend(self.epsilon_target_set(child));
                        }
                        closure.insert(state);
                        for &member in &closure {
                            self.state_mut(member).parents.insert((state, Label::Epsilon));
                        }
                        self.state_mut(state)
                            .transitions
                            .insert(Label::Epsilon, closure);
                        closed.insert(state);
                    }
                }
            }
        }

        // pull acceptance and labeled edges across the closures: an edge `p --c--> r` reachable
        // from `q` by epsilon moves becomes `q --c--> t` for every `t` in the closure of `r`
        for &state in &survivors {
            for member in self.epsilon_target_set(state) {
                if self.state(member).acceptable {
                    self.state_mut(state).acceptable = true;
                }
                let labeled: Vec<(Label, Vec<StateId>)> = self
                    .state(member)
                    .transitions
                    .iter()
                    .filter(|&(&label, _)| label != Label::Epsilon)
                    .map(|(&label, targets)| (label, targets.iter().copied().collect()))
                    .collect();
                for (label, targets) in labeled {
                    for to in targets {
                        for successor in self.epsilon_target_set(to) {
                            self.add_edge(state, label, successor);
                        }
                    }
                }
            }
        }

        // strip the epsilon edges; only the labeled closure edges remain
        for &state in &survivors {
            if let Some(targets) = self.state_mut(state).transitions.remove(&Label::Epsilon) {
                for to in targets {
                    self.state_mut(to).parents.remove(&(state, Label::Epsilon));
                }
            }
        }
    }

    /// Converts an epsilon-free automaton into an equivalent deterministic one by the subset
    /// construction. Only subsets reachable from the start state are materialized.
    pub fn to_dfa(&self) -> Dfa {
        let mut dfa = Dfa::default();
        let mut canonical: HashMap<BTreeSet<StateId>, crate::dfa::StateId> = HashMap::new();
        let mut expanded = HashSet::new();

        let start: BTreeSet<StateId> = [self.start].into();
        let id = dfa.alloc(false);
        canonical.insert(start.clone(), id);
        dfa.set_start(id);

        let mut worklist = vec![start];
        while let Some(subset) = worklist.pop() {
            // safe to index: every subset on the worklist has been interned
            let id = canonical[&subset];
            if !expanded.insert(id) {
                continue;
            }

            let mut acceptable = false;
            let mut by_symbol: BTreeMap<char, BTreeSet<StateId>> = BTreeMap::new();
            for &state in &subset {
                if self.state(state).acceptable {
                    acceptable = true;
                }
                for (&label, targets) in &self.state(state).transitions {
                    if let Label::Symbol(c) = label {
                        by_symbol
                            .entry(c)
                            .or_default()
                            .extend(targets.iter().copied());
                    }
                }
            }

            dfa.set_acceptable(id, acceptable);
            for (symbol, targets) in by_symbol {
                let target_id = match canonical.get(&targets) {
                    Some(&target_id) => target_id,
                    None => {
                        let target_id = dfa.alloc(false);
                        canonical.insert(targets.clone(), target_id);
                        target_id
                    }
                };
                dfa.add_transition(id, symbol, target_id);
                worklist.push(targets);
            }
        }

        dfa
    }

    /// Allocates a fresh state.
    fn alloc(&mut self, acceptable: bool) -> StateId {
        let id = self.states.len();
        self.states.push(Some(State {
            acceptable,
            ..State::default()
        }));
        id
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

    /// Adds an edge, keeping the target's parent set in sync.
    fn add_edge(&mut self, from: StateId, label: Label, to: StateId) {
        self.state_mut(from)
            .transitions
            .entry(label)
            .or_default()
            .insert(to);
        self.state_mut(to).parents.insert((from, label));
    }

    /// A fragment accepting exactly the one-character word `c`.
    fn symbol(&mut self, c: char) -> StateId {
        let root = self.alloc(false);
        let end = self.alloc(true);
        self.add_edge(root, Label::Symbol(c), end);
        root
    }

    /// Appends the `tree` fragment after every accepting state of the `root` fragment, returning
    /// the combined fragment's root.
    ///
    /// An accepting state with no outgoing edges is the fragment's plain exit: its inbound edges
    /// are spliced directly onto `tree` and the state disappears. An accepting state with
    /// outgoing edges instead loses its acceptance and gains an epsilon edge to `tree`.
    fn concatenate(&mut self, root: StateId, tree: StateId) -> StateId {
        let mut new_root = root;
        let mut visited = HashSet::new();
        if root != tree {
            // the appended fragment itself must not be rewired
            visited.insert(tree);
        }

        let mut stack = vec![root];
        while let Some(state) = stack.pop() {
            if !visited.insert(state) {
                continue;
            }
            for targets in self.state(state).transitions.values() {
                stack.extend(targets.iter().copied());
            }

            if !self.state(state).acceptable {
                continue;
            }
            if self.state(state).transitions.is_empty() {
                let parents = std::mem::take(&mut self.state_mut(state).parents);
                for (source, label) in parents {
                    if let Some(targets) = self.state_mut(source).transitions.get_mut(&label) {
                        targets.remove(&state);
                    }
                    self.add_edge(source, label, tree);
                }
                if state == root {
                    new_root = tree;
                }
                self.free(state);
            } else {
                self.state_mut(state).acceptable = false;
                self.add_edge(state, Label::Epsilon, tree);
            }
        }

        new_root
    }

    /// A fragment accepting the union of the `left` and `right` fragments' languages.
    fn choice(&mut self, left: StateId, right: StateId) -> StateId {
        let root = self.alloc(false);
        self.add_edge(root, Label::Epsilon, left);
        self.add_edge(root, Label::Epsilon, right);
        root
    }

    /// Turns a fragment into its Kleene closure by concatenating it onto itself, in place.
    fn cycle(&mut self, root: StateId) -> StateId {
        // the root must not be treated as an exit while the fragment loops back onto it
        self.state_mut(root).acceptable = false;
        self.concatenate(root, root);
        self.state_mut(root).acceptable = true;
        root
    }

    /// Redirects every edge of `state` onto `target` and frees `state`. A self-edge becomes a
    /// self-edge of `target`; acceptance carries over.
    fn merge_into(&mut self, state: StateId, target: StateId) {
        // inbound edges first: a self-edge of `state` is rewritten here so the outbound pass
        // below migrates it as an edge onto `target`
        let parents = std::mem::take(&mut self.state_mut(state).parents);
        for (source, label) in parents {
            if let Some(targets) = self.state_mut(source).transitions.get_mut(&label) {
                targets.remove(&state);
            }
            self.add_edge(source, label, target);
        }

        let transitions = std::mem::take(&mut self.state_mut(state).transitions);
        for (label, targets) in transitions {
            for to in targets {
                self.state_mut(to).parents.remove(&(state, label));
                self.add_edge(target, label, to);
            }
        }

        if self.state(state).acceptable {
            self.state_mut(target).acceptable = true;
        }
        if self.start == state {
            self.start = target;
        }
        self.free(state);
    }

    /// All states reachable from the start state, in discovery order.
    fn reachable(&self) -> Vec<StateId> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![self.start];
        while let Some(state) = stack.pop() {
            if !visited.insert(state) {
                continue;
            }
            order.push(state);
            for targets in self.state(state).transitions.values() {
                stack.extend(targets.iter().copied());
            }
        }
        order
    }

    fn epsilon_targets(&self, state: StateId) -> Vec<StateId> {
        self.state(state)
            .transitions
            .get(&Label::Epsilon)
            .map(|targets| targets.iter().copied().collect())
            .unwrap_or_default()
    }

    fn epsilon_target_set(&self, state: StateId) -> BTreeSet<StateId> {
        self.state(state)
            .transitions
            .get(&Label::Epsilon)
            .cloned()
            .unwrap_or_default()
    }

    /// The epsilon closure of a set of states.
    fn closure(&self, seed: BTreeSet<StateId>) -> BTreeSet<StateId> {
        let mut closure = seed.clone();
        let mut stack: Vec<StateId> = seed.into_iter().collect();
        while let Some(state) = stack.pop() {
            if let Some(targets) = self.state(state).transitions.get(&Label::Epsilon) {
                for &to in targets {
                    if closure.insert(to) {
                        stack.push(to);
                    }
                }
            }
        }
        closure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn validity() {
        for valid in ["", "a", "ab", "a+b", "a*", "(a+b)*c", "a(b+c)*d", "()", "((a))"] {
            assert!(Nfa::compile(valid).is_ok(), "{valid:?} should be accepted");
        }
        for invalid in ["+a", "a+", "a++b", "*", "a**", "(*a)", "(a", "a)", "a(b))", "(+a)"] {
            assert!(Nfa::compile(invalid).is_err(), "{invalid:?} should be rejected");
        }
    }

    #[test]
    fn error_kinds() {
        let err = Nfa::compile("a+*b").unwrap_err();
        assert_eq!(format!("{:?}", err.kind), "MisplacedUnion");
        assert_eq!(err.spans, vec![1..2]);

        let err = Nfa::compile("*a").unwrap_err();
        assert_eq!(format!("{:?}", err.kind), "MisplacedStar");

        let err = Nfa::compile("(a(b)").unwrap_err();
        assert_eq!(format!("{:?}", err.kind), "UnmatchedParen { opening: true }");
        assert_eq!(err.spans, vec![0..1]);
    }

    #[test]
    fn whitespace_is_ignored() {
        let nfa = Nfa::compile(" a ( b + c ) ").unwrap();
        assert!(nfa.accepts("ab"));
        assert!(nfa.accepts("ac"));
        assert!(!nfa.accepts("a"));
    }

    #[test]
    fn empty_expression_accepts_the_empty_word() {
        let nfa = Nfa::compile("").unwrap();
        assert!(nfa.accepts(""));
        assert!(!nfa.accepts("a"));
        assert_eq!(nfa.state_count(), 1);
    }

    #[test]
    fn concatenation_and_union() {
        let nfa = Nfa::compile("a+bc").unwrap();
        assert!(nfa.accepts("a"));
        assert!(nfa.accepts("bc"));
        assert!(!nfa.accepts(""));
        assert!(!nfa.accepts("b"));
        assert!(!nfa.accepts("abc"));
    }

    #[test]
    fn repetition() {
        let nfa = Nfa::compile("a*").unwrap();
        for word in ["", "a", "aa", "aaaa"] {
            assert!(nfa.accepts(word));
        }
        assert!(!nfa.accepts("b"));

        let nfa = Nfa::compile("(ab)*").unwrap();
        assert!(nfa.accepts(""));
        assert!(nfa.accepts("abab"));
        assert!(!nfa.accepts("aba"));
    }

    #[test]
    fn nested_groups() {
        let nfa = Nfa::compile("a(b+c)*d").unwrap();
        assert!(nfa.accepts("ad"));
        assert!(nfa.accepts("abd"));
        assert!(nfa.accepts("acbcd"));
        assert!(!nfa.accepts("a"));
        assert!(!nfa.accepts("abc"));
    }

    #[test]
    fn epsilon_elimination_preserves_the_language() {
        for expr in ["", "a", "a+b", "a*", "(a+b)*", "(a*+b)*", "a(b+c)*d", "(ab)*+c"] {
            let reference = Nfa::compile(expr).unwrap();
            let mut nfa = reference.clone();
            nfa.remove_epsilon_transitions();
            assert!(!nfa.has_epsilon_transitions(), "{expr:?} kept an epsilon edge");
            for word in words(&['a', 'b', 'c', 'd'], 4) {
                assert_eq!(
                    nfa.accepts(&word),
                    reference.accepts(&word),
                    "{expr:?} disagrees on {word:?}",
                );
            }
        }
    }

    #[test]
    fn epsilon_cycles_are_contracted() {
        // `(a*+b)*` loops epsilon edges between the choice state and the starred fragment
        let mut nfa = Nfa::compile("(a*+b)*").unwrap();
        nfa.remove_epsilon_transitions();
        assert!(nfa.accepts(""));
        assert!(nfa.accepts("aab"));
        assert!(nfa.accepts("baa"));
        assert!(!nfa.accepts("c"));
    }

    #[test]
    fn subset_construction_is_deterministic_and_equivalent() {
        for expr in ["a", "a+b", "(a+b)*", "a(b+c)*d", "(ab)*+a*"] {
            let mut nfa = Nfa::compile(expr).unwrap();
            nfa.remove_epsilon_transitions();
            let dfa = nfa.to_dfa();
            for word in words(&['a', 'b', 'c', 'd'], 4) {
                assert_eq!(
                    dfa.matches(&word),
                    nfa.accepts(&word),
                    "{expr:?} disagrees on {word:?}",
                );
            }
        }
    }

    /// Every word over `alphabet` of length at most `max_len`.
    fn words(alphabet: &[char], max_len: usize) -> Vec<String> {
        let mut all = vec![String::new()];
        let mut last = vec![String::new()];
        for _ in 0..max_len {
            let mut next = Vec::new();
            for word in &last {
                for &c in alphabet {
                    let mut word = word.clone();
                    word.push(c);
                    next.push(word);
                }
            }
            all.extend(next.iter().cloned());
            last = next;
        }
        all
    }
}
