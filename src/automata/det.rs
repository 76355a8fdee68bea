//! Determinization of nondeterministic finite automata via the subset
//! construction.
//!
//! Each state of the resulting DFA corresponds to one distinct set of NFA
//! states. Sets are identified by value: two subsets with identical
//! membership are the same DFA state, no matter how they were reached.
//! Only subsets reachable from the closure of the initial state are ever
//! materialized, and the empty subset (the dead state) never is.

use std::collections::{HashMap, VecDeque};
use std::fmt::Display;

use bit_set::BitSet;
use indexmap::IndexMap;

use crate::Symbol;

use super::{StateId, TransitionType, DFA, NFA};

/// A set of NFA states. Each distinct set corresponds to a single state in
/// the determinized automaton.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct StateSet(BitSet);

impl StateSet {
    /// Creates a new empty state set.
    fn new() -> Self {
        Self(BitSet::default())
    }

    /// Inserts a state into the set.
    fn insert(&mut self, state: StateId) {
        self.0.insert(state);
    }

    /// Returns an iterator over the state ids in the set.
    fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.0.iter()
    }

    /// Returns true if the set is empty.
    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extends the set with the elements of another set.
    fn extend(&mut self, other: &StateSet) {
        self.0.union_with(&other.0);
    }
}

impl Display for StateSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        write!(f, "{{")?;
        for state in self.iter() {
            if first {
                first = false;
            } else {
                write!(f, ", ")?;
            }
            write!(f, "{}", state)?;
        }
        write!(f, "}}")
    }
}

/// Determinizes an NFA.
/// The result is a DFA recognizing the same language as the input NFA.
///
/// The number of states in the resulting automaton can be exponential in
/// the number of states of the input NFA; no artificial limit is imposed.
pub fn determinize(nfa: &NFA) -> DFA {
    let mut det = DFA::new(nfa.alphabet().clone());
    // Maps a set of NFA states to the DFA state it became
    let mut state_map: IndexMap<StateSet, StateId> = IndexMap::new();
    // FIFO worklist of discovered but unprocessed subsets
    let mut queue: VecDeque<StateSet> = VecDeque::new();

    // Precompute the epsilon closure of every NFA state
    let mut epsilon_cache: HashMap<StateId, StateSet> = HashMap::new();
    for q in nfa.states() {
        let mut closure = StateSet::new();
        // Safe to unwrap because q is guaranteed to be a valid state id
        for p in nfa.epsilon_closure(q).unwrap() {
            closure.insert(p);
        }
        epsilon_cache.insert(q, closure);
    }

    // The DFA start state is the closure of the initial NFA state
    if let Some(q0) = nfa.initial() {
        let initial_set = epsilon_cache.get(&q0).unwrap().clone();
        let q0_det = det.new_state();
        det.set_initial(q0_det).unwrap();
        if initial_set.iter().any(|q| nfa.is_final(q)) {
            det.add_final(q0_det).unwrap();
        }
        state_map.insert(initial_set.clone(), q0_det);
        queue.push_back(initial_set);
    }

    while let Some(nfa_states) = queue.pop_front() {
        let det_state = *state_map.get(&nfa_states).unwrap();

        for symbol in nfa.alphabet().iter() {
            // Take every symbol transition out of the subset, then close
            // the result under epsilon transitions.
            let mut next = StateSet::new();
            for q in move_set(nfa, &nfa_states, symbol).iter() {
                next.extend(epsilon_cache.get(&q).unwrap());
            }
            // The empty subset is the implicit dead state: it is neither
            // recorded nor enqueued.
            if next.is_empty() {
                continue;
            }
            let dest = *state_map.entry(next.clone()).or_insert_with(|| {
                let new_state = det.new_state();
                if next.iter().any(|q| nfa.is_final(q)) {
                    det.add_final(new_state).unwrap();
                }
                queue.push_back(next.clone());
                new_state
            });
            det.add_transition(det_state, symbol, dest).unwrap();
        }
    }
    det
}

/// The union, over all states in the subset, of their `symbol`-successors.
/// Epsilon transitions are not taken.
fn move_set(nfa: &NFA, states: &StateSet, symbol: Symbol) -> StateSet {
    let mut result = StateSet::new();
    for q in states.iter() {
        for t in nfa.transitions_from(q).unwrap() {
            if *t.get_type() == TransitionType::Symbol(symbol) {
                result.insert(t.get_dest());
            }
        }
    }
    result
}
