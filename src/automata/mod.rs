mod compile;
pub mod det;
pub mod dfa;
mod dot;
pub mod min;

use std::error::Error;
use std::{
    collections::HashSet,
    fmt::Display,
};

use itertools::Itertools;

use crate::{alphabet::Alphabet, Symbol};

pub use compile::{compile, StructuralError};
pub use dfa::DFA;
pub use dot::render;

/// The type of a transition in a finite automaton.
/// A transition either consumes a single symbol of the alphabet or is an
/// epsilon transition that is taken without consuming any input.
/// Epsilon transitions only ever occur in nondeterministic automata.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum TransitionType {
    /// A transition that is taken if the input is exactly the given symbol.
    Symbol(Symbol),
    /// An epsilon transition that is taken without consuming any input.
    Epsilon,
}

impl TransitionType {
    /// Returns true if the transition is an epsilon transition.
    pub fn is_epsilon(&self) -> bool {
        matches!(self, TransitionType::Epsilon)
    }
}

impl Display for TransitionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionType::Symbol(s) => write!(f, "{}", s),
            TransitionType::Epsilon => write!(f, "ε"),
        }
    }
}

/// A transition from one state to another.
/// The destination state is stored as an index that is unique within the
/// automaton that owns the transition.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub struct Transition {
    /// The type of the transition.
    label: TransitionType,
    /// The index of the destination state.
    destination: StateId,
}

impl Transition {
    pub fn new(label: TransitionType, destination: StateId) -> Self {
        Self { label, destination }
    }

    /// A transition consuming the given symbol.
    pub fn symbol(symbol: Symbol, destination: StateId) -> Self {
        Self::new(TransitionType::Symbol(symbol), destination)
    }

    /// An epsilon transition.
    pub fn epsilon(destination: StateId) -> Self {
        Self::new(TransitionType::Epsilon, destination)
    }

    /// Returns the destination state of the transition.
    pub fn get_dest(&self) -> StateId {
        self.destination
    }

    /// Returns the type of the transition.
    pub fn get_type(&self) -> &TransitionType {
        &self.label
    }

    /// Returns if the transition is an epsilon transition.
    pub fn is_epsilon(&self) -> bool {
        self.label.is_epsilon()
    }
}

/// A state in a nondeterministic finite automaton.
/// A state is merely a collection of transitions to other states.
/// A state can have multiple transitions with the same input leading to
/// different states, and epsilon transitions that consume no input.
#[derive(Debug, Clone, Default, Eq, Hash, PartialEq)]
pub struct NState {
    transitions: Vec<Transition>,
}

impl NState {
    /// Returns an iterator over the transitions of the state.
    fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }

    /// Adds a transition to the state.
    fn add_transition(&mut self, label: TransitionType, destination: StateId) {
        self.transitions.push(Transition { label, destination });
    }

    /// Consumes the input symbol and returns the set of states that can be
    /// reached from this state with it. Epsilon transitions are not taken.
    fn consume(&self, input: Symbol) -> HashSet<StateId> {
        let mut res = HashSet::new();
        for t in self.transitions() {
            if t.label == TransitionType::Symbol(input) {
                res.insert(t.destination);
            }
        }
        res
    }
}

/// Every state in an automaton is identified by a unique index.
pub type StateId = usize;

/// Errors raised by the state/transition mutation API of [`NFA`] and
/// [`DFA`].
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub enum AutomatonError {
    /// The given state id does not refer to a state of the automaton.
    StateNotFound(StateId),
    /// A second target was registered for the same state and symbol of a
    /// deterministic automaton.
    Nondeterministic { state: StateId, symbol: Symbol },
}

impl Display for AutomatonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AutomatonError::StateNotFound(s) => write!(f, "State not found: {}", s),
            AutomatonError::Nondeterministic { state, symbol } => write!(
                f,
                "State {} already has a transition for '{}'",
                state, symbol
            ),
        }
    }
}

impl Error for AutomatonError {}

/// A nondeterministic finite automaton with epsilon transitions.
/// The automaton consists of a collection of states, an initial state, a
/// set of final states, and the alphabet its consuming transitions range
/// over.
///
/// States live in an arena indexed by [`StateId`]; a transition can only
/// be added between states that already exist, so every destination id is
/// always a valid index. The alphabet is collected incrementally: adding a
/// symbol transition registers its symbol.
#[derive(Debug, Clone, Default)]
pub struct NFA {
    states: Vec<NState>,
    initial: Option<StateId>,
    finals: HashSet<StateId>,
    alphabet: Alphabet,
}

impl NFA {
    /// Create a new, empty nondeterministic finite automaton.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            initial: None,
            finals: HashSet::new(),
            alphabet: Alphabet::empty(),
        }
    }

    /// Add a new state to the automaton and return its index.
    /// Indices are handed out monotonically and never reused.
    pub fn new_state(&mut self) -> StateId {
        let id = self.states.len();
        self.states.push(NState::default());
        id
    }

    /// Set the initial state of the automaton.
    /// The index must be a valid state index, otherwise an error is returned.
    pub fn set_initial(&mut self, state: StateId) -> Result<(), AutomatonError> {
        if state < self.states.len() {
            self.initial = Some(state);
            Ok(())
        } else {
            Err(AutomatonError::StateNotFound(state))
        }
    }

    /// Returns the initial state of the automaton, if it exists.
    pub fn initial(&self) -> Option<StateId> {
        self.initial
    }

    /// Add a state to the set of final states.
    /// The index must be a valid state index, otherwise an error is returned.
    pub fn add_final(&mut self, state: StateId) -> Result<(), AutomatonError> {
        if state < self.states.len() {
            self.finals.insert(state);
            Ok(())
        } else {
            Err(AutomatonError::StateNotFound(state))
        }
    }

    /// Returns an iterator over the final states of the automaton.
    pub fn finals(&self) -> impl Iterator<Item = StateId> + '_ {
        self.finals.iter().copied()
    }

    /// Returns if a state is a final state.
    /// Invalid indices are not considered final states.
    pub fn is_final(&self, state: StateId) -> bool {
        self.finals.contains(&state)
    }

    /// Returns the alphabet the automaton's symbol transitions range over.
    /// Epsilon is never part of it.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Add a transition from one state to another.
    /// The indices must be valid state indices, otherwise an error is
    /// returned. If the transition consumes a symbol, the symbol is added
    /// to the alphabet.
    pub fn add_transition(
        &mut self,
        from: StateId,
        to: StateId,
        label: TransitionType,
    ) -> Result<(), AutomatonError> {
        if to >= self.states.len() {
            return Err(AutomatonError::StateNotFound(to));
        }
        if let TransitionType::Symbol(s) = label {
            self.alphabet.insert(s);
        }
        if let Some(state) = self.states.get_mut(from) {
            state.add_transition(label, to);
            Ok(())
        } else {
            Err(AutomatonError::StateNotFound(from))
        }
    }

    /// Returns the number of states in the automaton.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Returns the number of transitions in the automaton.
    /// This is the sum of the number of transitions of each state.
    pub fn num_transitions(&self) -> usize {
        self.states.iter().map(|s| s.transitions.len()).sum()
    }

    /// Returns an iterator over the states of the automaton.
    pub fn states(&self) -> impl Iterator<Item = StateId> {
        0..self.states.len()
    }

    /// Returns an iterator over the transitions from a state.
    /// If the state is not a valid state index, an error is returned.
    pub fn transitions_from(
        &self,
        state: StateId,
    ) -> Result<impl Iterator<Item = &Transition>, AutomatonError> {
        if state < self.states.len() {
            Ok(self.states[state].transitions())
        } else {
            Err(AutomatonError::StateNotFound(state))
        }
    }

    /// Returns the epsilon closure of a state: the smallest set containing
    /// the state that is closed under epsilon transitions.
    /// Computed by stack traversal; the result is a set, so the traversal
    /// order does not matter.
    /// If the state is not a valid state index, an error is returned.
    pub fn epsilon_closure(&self, state: StateId) -> Result<HashSet<StateId>, AutomatonError> {
        if state >= self.states.len() {
            return Err(AutomatonError::StateNotFound(state));
        }
        let mut closure = HashSet::new();
        let mut stack = vec![state];
        while let Some(s) = stack.pop() {
            closure.insert(s);
            for t in self.states[s].transitions() {
                if t.is_epsilon() && !closure.contains(&t.destination) {
                    stack.push(t.destination);
                }
            }
        }
        Ok(closure)
    }

    /// Returns the set of states that can be reached from the initial
    /// state by consuming the given word.
    pub fn run(&self, word: &str) -> HashSet<StateId> {
        let mut current = HashSet::new();

        if let Some(initial) = self.initial {
            current = self.epsilon_closure(initial).unwrap();
        }

        for c in word.chars() {
            let mut next = HashSet::new();
            for s in current {
                for reached in self.states[s].consume(Symbol::new(c)) {
                    next.extend(self.epsilon_closure(reached).unwrap());
                }
            }
            current = next;
        }

        current
    }

    /// Returns if the automaton accepts the given word.
    /// A word is accepted if there is a path from the initial state to a
    /// final state by consuming the word.
    pub fn accepts(&self, word: &str) -> bool {
        let reached = self.run(word);
        !reached.is_disjoint(&self.finals)
    }
}

impl Display for NFA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "NFA {{")?;
        writeln!(f, "\tStates:")?;
        for (i, state) in self.states.iter().enumerate() {
            write!(f, "\t\t{}: ", i)?;
            for t in state.transitions() {
                write!(f, "{} -> {}, ", t.label, t.destination)?;
            }
            writeln!(f)?;
        }
        if let Some(q0) = self.initial {
            writeln!(f, "\tInitial: {q0}")?;
        } else {
            writeln!(f, "\tInitial: None")?;
        }
        writeln!(f, "\tFinals: {{{}}}", self.finals.iter().sorted().join(", "))?;
        writeln!(f, "}}")
    }
}

/// Read-only capability of a finite automaton.
///
/// This is the entire surface that external collaborators (renderers,
/// acceptance harnesses) see: the start state, the accept states, the
/// alphabet, and a transition lookup. Consumers program against this
/// trait instead of asking whether they hold an NFA or a DFA.
pub trait AutomatonView {
    /// The start state, if the automaton has one.
    fn start(&self) -> Option<StateId>;

    /// The number of states.
    fn num_states(&self) -> usize;

    /// Returns if the given state is an accept state.
    fn is_accepting(&self, state: StateId) -> bool;

    /// The accept states, in ascending order.
    fn accepting(&self) -> Vec<StateId>;

    /// The alphabet of the automaton. Never contains epsilon.
    fn alphabet(&self) -> &Alphabet;

    /// All states reachable from `state` with one transition of the given
    /// type. For a deterministic automaton this has at most one element,
    /// and epsilon lookups are always empty.
    fn targets(&self, state: StateId, label: TransitionType) -> Vec<StateId>;
}

impl AutomatonView for NFA {
    fn start(&self) -> Option<StateId> {
        self.initial
    }

    fn num_states(&self) -> usize {
        self.num_states()
    }

    fn is_accepting(&self, state: StateId) -> bool {
        self.is_final(state)
    }

    fn accepting(&self) -> Vec<StateId> {
        self.finals.iter().copied().sorted().collect()
    }

    fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    fn targets(&self, state: StateId, label: TransitionType) -> Vec<StateId> {
        match self.transitions_from(state) {
            Ok(transitions) => transitions
                .filter(|t| *t.get_type() == label)
                .map(|t| t.get_dest())
                .sorted()
                .dedup()
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// A finite automaton of either kind, tagged.
///
/// Collaborators that work on both NFAs and DFAs hold this instead of
/// dispatching on concrete types; all access goes through
/// [`AutomatonView`].
#[derive(Debug, Clone)]
pub enum FiniteAutomaton {
    Nfa(NFA),
    Dfa(DFA),
}

impl AutomatonView for FiniteAutomaton {
    fn start(&self) -> Option<StateId> {
        match self {
            FiniteAutomaton::Nfa(nfa) => nfa.start(),
            FiniteAutomaton::Dfa(dfa) => dfa.start(),
        }
    }

    fn num_states(&self) -> usize {
        match self {
            FiniteAutomaton::Nfa(nfa) => AutomatonView::num_states(nfa),
            FiniteAutomaton::Dfa(dfa) => AutomatonView::num_states(dfa),
        }
    }

    fn is_accepting(&self, state: StateId) -> bool {
        match self {
            FiniteAutomaton::Nfa(nfa) => nfa.is_accepting(state),
            FiniteAutomaton::Dfa(dfa) => dfa.is_accepting(state),
        }
    }

    fn accepting(&self) -> Vec<StateId> {
        match self {
            FiniteAutomaton::Nfa(nfa) => AutomatonView::accepting(nfa),
            FiniteAutomaton::Dfa(dfa) => AutomatonView::accepting(dfa),
        }
    }

    fn alphabet(&self) -> &Alphabet {
        match self {
            FiniteAutomaton::Nfa(nfa) => AutomatonView::alphabet(nfa),
            FiniteAutomaton::Dfa(dfa) => AutomatonView::alphabet(dfa),
        }
    }

    fn targets(&self, state: StateId, label: TransitionType) -> Vec<StateId> {
        match self {
            FiniteAutomaton::Nfa(nfa) => nfa.targets(state, label),
            FiniteAutomaton::Dfa(dfa) => dfa.targets(state, label),
        }
    }
}

impl From<NFA> for FiniteAutomaton {
    fn from(nfa: NFA) -> Self {
        FiniteAutomaton::Nfa(nfa)
    }
}

impl From<DFA> for FiniteAutomaton {
    fn from(dfa: DFA) -> Self {
        FiniteAutomaton::Dfa(dfa)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(c: char) -> TransitionType {
        TransitionType::Symbol(Symbol::new(c))
    }

    #[test]
    fn test_invalid_initial_state() {
        let mut a = NFA::new();
        let result = a.set_initial(0);
        assert_eq!(result, Err(AutomatonError::StateNotFound(0)));
    }

    #[test]
    fn test_valid_initial_state() {
        let mut a = NFA::new();
        let state = a.new_state();
        let result = a.set_initial(state);
        assert!(result.is_ok());
        assert_eq!(a.initial(), Some(state));
    }

    #[test]
    fn test_invalid_final_state() {
        let mut a = NFA::new();
        let result = a.add_final(0);
        assert_eq!(result, Err(AutomatonError::StateNotFound(0)));
    }

    #[test]
    fn test_invalid_transition_from() {
        let mut a = NFA::new();
        let s = a.new_state();
        let unknown = a.num_states() + 1;
        let result = a.add_transition(unknown, s, TransitionType::Epsilon);
        assert_eq!(result, Err(AutomatonError::StateNotFound(unknown)));
    }

    #[test]
    fn test_invalid_transition_to() {
        let mut a = NFA::new();
        let state = a.new_state();
        let result = a.add_transition(state, 1, TransitionType::Epsilon);
        assert_eq!(result, Err(AutomatonError::StateNotFound(1)));
    }

    #[test]
    fn test_alphabet_collects_symbols_not_epsilon() {
        let mut a = NFA::new();
        let s0 = a.new_state();
        let s1 = a.new_state();
        a.add_transition(s0, s1, sym('a')).unwrap();
        a.add_transition(s1, s0, TransitionType::Epsilon).unwrap();
        assert_eq!(a.alphabet().len(), 1);
        assert!(a.alphabet().contains(Symbol::new('a')));
    }

    #[test]
    fn test_epsilon_closure() {
        let mut a = NFA::new();
        let s0 = a.new_state();
        let s1 = a.new_state();
        let s2 = a.new_state();
        let s3 = a.new_state();
        a.add_transition(s0, s1, TransitionType::Epsilon).unwrap();
        a.add_transition(s1, s2, TransitionType::Epsilon).unwrap();
        a.add_transition(s2, s3, TransitionType::Epsilon).unwrap();
        let result = a.epsilon_closure(s0).unwrap();
        assert_eq!(result.len(), 4);
        assert!(result.contains(&s0));
        assert!(result.contains(&s3));
    }

    #[test]
    fn test_epsilon_closure_cyclic() {
        let mut a = NFA::new();
        let s0 = a.new_state();
        let s1 = a.new_state();
        a.add_transition(s0, s1, TransitionType::Epsilon).unwrap();
        a.add_transition(s1, s0, TransitionType::Epsilon).unwrap();
        let result = a.epsilon_closure(s0).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_run_follows_epsilon() {
        // s0 --a--> s1 --ε--> *s2*
        let mut a = NFA::new();
        let s0 = a.new_state();
        let s1 = a.new_state();
        let s2 = a.new_state();
        a.set_initial(s0).unwrap();
        a.add_final(s2).unwrap();
        a.add_transition(s0, s1, sym('a')).unwrap();
        a.add_transition(s1, s2, TransitionType::Epsilon).unwrap();

        assert!(a.accepts("a"));
        assert!(!a.accepts(""));
        assert!(!a.accepts("aa"));
    }

    #[test]
    fn test_accepts_without_initial() {
        let mut a = NFA::new();
        let s0 = a.new_state();
        a.add_final(s0).unwrap();
        assert!(!a.accepts(""));
    }

    #[test]
    fn test_view_agrees_with_nfa() {
        let mut a = NFA::new();
        let s0 = a.new_state();
        let s1 = a.new_state();
        a.set_initial(s0).unwrap();
        a.add_final(s1).unwrap();
        a.add_transition(s0, s1, sym('a')).unwrap();
        a.add_transition(s0, s1, TransitionType::Epsilon).unwrap();

        let view: FiniteAutomaton = a.into();
        assert_eq!(view.start(), Some(s0));
        assert_eq!(view.accepting(), vec![s1]);
        assert_eq!(view.targets(s0, sym('a')), vec![s1]);
        assert_eq!(view.targets(s0, TransitionType::Epsilon), vec![s1]);
        assert_eq!(view.targets(s1, sym('a')), Vec::<StateId>::new());
        assert!(view.is_accepting(s1));
        assert!(!view.is_accepting(s0));
    }
}
