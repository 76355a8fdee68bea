//! Facilities to generate a DOT representation of an automaton.
//!
//! Rendering consumes only the read-only [`AutomatonView`] capability, so
//! one implementation serves NFAs, DFAs and the tagged
//! [`super::FiniteAutomaton`] alike. The output is DOT text; turning it
//! into an image is someone else's job.

use crate::Symbol;

use super::{AutomatonView, StateId, TransitionType};

/// An edge of the rendered graph: source, consumed symbol (`None` for
/// epsilon), destination.
type Edge = (StateId, Option<Symbol>, StateId);

struct DotGraph<'a, A>(&'a A);

impl<'a, A: AutomatonView> dot::Labeller<'a, StateId, Edge> for DotGraph<'_, A> {
    fn graph_id(&'a self) -> dot::Id<'a> {
        dot::Id::new("automaton").unwrap()
    }

    fn node_id(&'a self, n: &StateId) -> dot::Id<'a> {
        dot::Id::new(format!("q{}", n)).unwrap()
    }

    fn node_shape(&'a self, node: &StateId) -> Option<dot::LabelText<'a>> {
        if self.0.is_accepting(*node) {
            return Some(dot::LabelText::LabelStr("doublecircle".into()));
        }

        None
    }

    fn node_label(&'a self, n: &StateId) -> dot::LabelText<'a> {
        if self.0.start() == Some(*n) {
            return dot::LabelText::LabelStr(format!("{} (init)", self.node_id(n).name()).into());
        }
        dot::LabelText::LabelStr(self.node_id(n).name())
    }

    fn edge_label(&'a self, e: &Edge) -> dot::LabelText<'a> {
        match e.1 {
            Some(symbol) => dot::LabelText::LabelStr(format!("{}", symbol).into()),
            None => dot::LabelText::LabelStr("ε".into()),
        }
    }

    fn kind(&self) -> dot::Kind {
        dot::Kind::Digraph
    }
}

impl<'a, A: AutomatonView> dot::GraphWalk<'a, StateId, Edge> for DotGraph<'_, A> {
    fn nodes(&'a self) -> dot::Nodes<'a, StateId> {
        (0..self.0.num_states()).collect::<Vec<_>>().into()
    }

    fn edges(&'a self) -> dot::Edges<'a, Edge> {
        let symbols: Vec<Symbol> = self.0.alphabet().iter().collect();
        let mut edges: Vec<Edge> = vec![];
        for state in 0..self.0.num_states() {
            for dest in self.0.targets(state, TransitionType::Epsilon) {
                edges.push((state, None, dest));
            }
            for &symbol in &symbols {
                for dest in self.0.targets(state, TransitionType::Symbol(symbol)) {
                    edges.push((state, Some(symbol), dest));
                }
            }
        }
        edges.into()
    }

    fn source(&'a self, edge: &Edge) -> StateId {
        edge.0
    }

    fn target(&'a self, edge: &Edge) -> StateId {
        edge.2
    }
}

/// Returns the DOT representation of the automaton.
/// The text can be fed to Graphviz to visualize the automaton.
pub fn render<A: AutomatonView>(automaton: &A) -> String {
    let mut buf = Vec::new();
    dot::render(&DotGraph(automaton), &mut buf).unwrap();
    String::from_utf8(buf).expect("Failed to convert DOT to string")
}

#[cfg(test)]
mod tests {
    use super::super::FiniteAutomaton;
    use super::*;
    use crate::{regex_to_min_dfa, regex_to_nfa};

    #[test]
    fn renders_nfa_with_epsilon_edges() {
        let nfa = regex_to_nfa("a*").unwrap();
        let out = render(&nfa);
        assert!(out.contains("digraph automaton"));
        assert!(out.contains("doublecircle"));
        assert!(out.contains("ε"));
        assert!(out.contains("init"));
    }

    #[test]
    fn renders_dfa_without_epsilon_edges() {
        let dfa = regex_to_min_dfa("ab").unwrap();
        let out = render(&dfa);
        assert!(out.contains("digraph automaton"));
        assert!(!out.contains("ε"));
    }

    #[test]
    fn renders_through_the_tagged_view() {
        let view: FiniteAutomaton = regex_to_min_dfa("a|b").unwrap().into();
        let out = render(&view);
        assert!(out.contains("doublecircle"));
    }
}
