//! DFA minimization by fixpoint partition refinement.
//!
//! The partition starts with the accept/non-accept split and is refined
//! until no block can be split any further: two states stay in the same
//! block only as long as, for every symbol, their successors lie in the
//! same block (or both have none). Splitting only ever separates states
//! that are provably distinguishable, so the fixpoint is the coarsest
//! correct partition and each terminal block becomes one state of the
//! minimal automaton.
//!
//! Unreachable states are pruned up front. Skipping that step would leave
//! spurious blocks in the result, so it is part of the contract here, not
//! a performance tweak.

use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;

use crate::Symbol;

use super::{StateId, DFA};

/// Minimizes a DFA.
/// The result is a language-equivalent DFA with the fewest states among
/// automata recognizing the same language over the input's reachable
/// states. The input is left untouched; unreachable states are dropped.
pub fn minimize(dfa: &DFA) -> DFA {
    let initial = match dfa.initial() {
        Some(q0) => q0,
        None => return DFA::new(dfa.alphabet().clone()),
    };
    let reachable = reachable_from(dfa, initial);

    // Initial partition: accept and non-accept states, dropping an empty
    // side.
    let accept: Vec<StateId> = reachable
        .iter()
        .copied()
        .filter(|s| dfa.is_final(*s))
        .collect();
    let reject: Vec<StateId> = reachable
        .iter()
        .copied()
        .filter(|s| !dfa.is_final(*s))
        .collect();
    let mut blocks: Vec<Vec<StateId>> = [accept, reject]
        .into_iter()
        .filter(|b| !b.is_empty())
        .collect();

    // Per-state block index, kept current on every split so membership
    // lookups are O(1). Unreachable states keep the sentinel and are
    // never consulted.
    let mut block_of: Vec<usize> = vec![usize::MAX; dfa.num_states()];
    for (i, block) in blocks.iter().enumerate() {
        for &state in block {
            block_of[state] = i;
        }
    }

    let symbols: Vec<Symbol> = dfa.alphabet().iter().collect();

    let mut queue: VecDeque<usize> = (0..blocks.len()).collect();
    while let Some(b) = queue.pop_front() {
        for &symbol in &symbols {
            // Group the block's members by the block their successor
            // currently lies in. States with no transition for the symbol
            // go to the implicit dead state and form their own group.
            let mut groups: IndexMap<Option<usize>, Vec<StateId>> = IndexMap::new();
            for &state in &blocks[b] {
                let key = dfa.target(state, symbol).map(|t| block_of[t]);
                groups.entry(key).or_default().push(state);
            }
            if groups.len() > 1 {
                let mut parts = groups.into_values();
                blocks[b] = parts.next().unwrap();
                for part in parts {
                    let idx = blocks.len();
                    for &state in &part {
                        block_of[state] = idx;
                    }
                    blocks.push(part);
                }
                // A split can make any block splittable in turn, including
                // blocks that merely transition into the one that split.
                // Re-examining every block is a superset of the affected
                // ones and keeps the loop a plain fixpoint: it ends once a
                // full round of examinations causes no split.
                queue.clear();
                queue.extend(0..blocks.len());
                break;
            }
        }
    }

    // Each terminal block becomes one state. Transitions are lifted from
    // an arbitrary representative; the terminal-block invariant makes the
    // choice irrelevant.
    let mut min = DFA::new(dfa.alphabet().clone());
    for _ in 0..blocks.len() {
        min.new_state();
    }
    for (i, block) in blocks.iter().enumerate() {
        let repr = block[0];
        for (symbol, target) in dfa.transitions_from(repr).unwrap() {
            min.add_transition(i, symbol, block_of[target]).unwrap();
        }
        if dfa.is_final(repr) {
            min.add_final(i).unwrap();
        }
    }
    min.set_initial(block_of[initial]).unwrap();
    min
}

/// The states reachable from `start`, in breadth-first discovery order.
fn reachable_from(dfa: &DFA, start: StateId) -> Vec<StateId> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    let mut order = Vec::new();
    queue.push_back(start);
    seen.insert(start);
    while let Some(state) = queue.pop_front() {
        order.push(state);
        for (_, target) in dfa.transitions_from(state).unwrap() {
            if seen.insert(target) {
                queue.push_back(target);
            }
        }
    }
    order
}
