//! Deterministic finite automata.
//!
//! The transition function is partial: a state need not have a transition
//! for every symbol of the alphabet. A missing entry stands for the
//! implicit dead state, which is never materialized; reaching it just
//! means the word is rejected from that point on.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;

use itertools::Itertools;

use crate::{alphabet::Alphabet, Symbol};

use super::{AutomatonError, AutomatonView, StateId, TransitionType};

/// A state in a deterministic finite automaton.
/// Each symbol maps to at most one successor state. The map is ordered so
/// that iteration over a state's transitions is deterministic.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct DState {
    trans: BTreeMap<Symbol, StateId>,
}

/// A deterministic finite automaton.
///
/// Like [`super::NFA`], states live in an arena indexed by [`StateId`].
/// The alphabet is fixed at construction time (it is inherited from the
/// automaton this DFA was built from) and may contain symbols no
/// transition consumes.
#[derive(Debug, Clone, Default)]
pub struct DFA {
    states: Vec<DState>,
    initial: Option<StateId>,
    finals: HashSet<StateId>,
    alphabet: Alphabet,
}

impl DFA {
    /// Create a new, empty automaton over the given alphabet.
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            states: Vec::new(),
            initial: None,
            finals: HashSet::new(),
            alphabet,
        }
    }

    /// Add a new state to the automaton and return its index.
    pub fn new_state(&mut self) -> StateId {
        let id = self.states.len();
        self.states.push(DState::default());
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
    pub fn is_final(&self, state: StateId) -> bool {
        self.finals.contains(&state)
    }

    /// Returns the alphabet of the automaton. Epsilon is never part of it.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Add a transition. Both indices must be valid state indices, and the
    /// source state must not yet have a transition for the symbol;
    /// otherwise the automaton would stop being deterministic and an error
    /// is returned. The symbol is added to the alphabet if it is new.
    pub fn add_transition(
        &mut self,
        from: StateId,
        symbol: Symbol,
        to: StateId,
    ) -> Result<(), AutomatonError> {
        if to >= self.states.len() {
            return Err(AutomatonError::StateNotFound(to));
        }
        if from >= self.states.len() {
            return Err(AutomatonError::StateNotFound(from));
        }
        let state = &mut self.states[from];
        if state.trans.contains_key(&symbol) {
            return Err(AutomatonError::Nondeterministic {
                state: from,
                symbol,
            });
        }
        self.alphabet.insert(symbol);
        state.trans.insert(symbol, to);
        Ok(())
    }

    /// Returns the number of states in the automaton.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Returns the number of transitions in the automaton.
    pub fn num_transitions(&self) -> usize {
        self.states.iter().map(|s| s.trans.len()).sum()
    }

    /// Returns an iterator over the states of the automaton.
    pub fn states(&self) -> impl Iterator<Item = StateId> {
        0..self.states.len()
    }

    /// Returns the successor of `state` under `symbol`, if the transition
    /// is defined. `None` means the word is rejected past this point; it
    /// is never an error.
    pub fn target(&self, state: StateId, symbol: Symbol) -> Option<StateId> {
        self.states.get(state)?.trans.get(&symbol).copied()
    }

    /// Returns an iterator over the transitions from a state, ordered by
    /// symbol. If the state is not a valid state index, an error is
    /// returned.
    pub fn transitions_from(
        &self,
        state: StateId,
    ) -> Result<impl Iterator<Item = (Symbol, StateId)> + '_, AutomatonError> {
        if state < self.states.len() {
            Ok(self.states[state].trans.iter().map(|(s, t)| (*s, *t)))
        } else {
            Err(AutomatonError::StateNotFound(state))
        }
    }

    /// Runs the automaton on the given word and returns the state it ends
    /// in, or `None` if a transition is missing along the way (the
    /// implicit dead state).
    pub fn run(&self, word: &str) -> Option<StateId> {
        let mut current = self.initial?;
        for c in word.chars() {
            current = self.target(current, Symbol::new(c))?;
        }
        Some(current)
    }

    /// Returns if the automaton accepts the given word.
    /// A missing transition means the word is rejected, never a fault.
    pub fn accepts(&self, word: &str) -> bool {
        match self.run(word) {
            Some(state) => self.is_final(state),
            None => false,
        }
    }
}

impl Display for DFA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "DFA {{")?;
        writeln!(f, "\tStates:")?;
        for (i, state) in self.states.iter().enumerate() {
            write!(f, "\t\t{}: ", i)?;
            for (symbol, target) in state.trans.iter() {
                write!(f, "{} -> {}, ", symbol, target)?;
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

impl AutomatonView for DFA {
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
        match label {
            TransitionType::Symbol(s) => self.target(state, s).into_iter().collect(),
            // A deterministic automaton has no epsilon transitions.
            TransitionType::Epsilon => Vec::new(),
        }
    }
}
