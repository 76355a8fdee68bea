pub mod alphabet;
pub mod automata;
pub mod re;

use std::fmt::Display;

use quickcheck::{Arbitrary, Gen};

use crate::automata::{StructuralError, DFA, NFA};

/// A single input symbol of an automaton's alphabet.
///
/// A symbol is a plain character. The reserved epsilon marker used for
/// transitions that consume no input is *not* a symbol; it exists only as
/// [`automata::TransitionType::Epsilon`]. Consequently no alphabet can ever
/// contain epsilon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(char);

impl Symbol {
    /// Create a new `Symbol` from a `char`.
    ///
    /// # Examples
    /// ```
    /// use mindfa::Symbol;
    /// let s = Symbol::new('a');
    /// assert_eq!(s.as_char(), 'a');
    /// ```
    pub fn new(c: char) -> Self {
        Symbol(c)
    }

    /// Get the `char` representation of this symbol.
    pub fn as_char(self) -> char {
        self.0
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Symbol(c)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Arbitrary for Symbol {
    fn arbitrary(g: &mut Gen) -> Self {
        const POOL: &[char] = &[
            'a', 'b', 'c', 'd', 'e', 'x', 'y', 'z', '0', '1', '2', '9',
        ];
        Symbol(*g.choose(POOL).unwrap())
    }
}

/// Compiles the pattern into an epsilon-NFA using the Thompson construction.
///
/// The pattern is first rewritten into postfix token order (with implicit
/// concatenation made explicit), then assembled fragment by fragment.
///
/// # Examples
/// ```
/// use mindfa::regex_to_nfa;
/// let nfa = regex_to_nfa("a|b").unwrap();
/// assert!(nfa.accepts("a"));
/// assert!(nfa.accepts("b"));
/// assert!(!nfa.accepts("ab"));
/// ```
pub fn regex_to_nfa(pattern: &str) -> Result<NFA, StructuralError> {
    let postfix = re::to_postfix(pattern);
    automata::compile(&postfix)
}

/// Compiles the pattern into an equivalent DFA via the subset construction.
///
/// The resulting automaton is deterministic but not necessarily minimal.
pub fn regex_to_dfa(pattern: &str) -> Result<DFA, StructuralError> {
    let nfa = regex_to_nfa(pattern)?;
    Ok(automata::det::determinize(&nfa))
}

/// Compiles the pattern into the minimal DFA recognizing its language.
///
/// # Examples
/// ```
/// use mindfa::regex_to_min_dfa;
/// let dfa = regex_to_min_dfa("(a|b)*abb").unwrap();
/// assert!(dfa.accepts("abb"));
/// assert!(dfa.accepts("aababb"));
/// assert!(!dfa.accepts("abab"));
/// ```
pub fn regex_to_min_dfa(pattern: &str) -> Result<DFA, StructuralError> {
    let dfa = regex_to_dfa(pattern)?;
    Ok(automata::min::minimize(&dfa))
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;
    use crate::automata::min::minimize;

    #[test]
    fn concat_literals() {
        let dfa = regex_to_min_dfa("a.b").unwrap();
        assert!(dfa.accepts("ab"));
        assert!(!dfa.accepts("a"));
        assert!(!dfa.accepts("b"));
        assert!(!dfa.accepts("ba"));
    }

    #[test]
    fn union_literals() {
        let dfa = regex_to_min_dfa("a|b").unwrap();
        assert!(dfa.accepts("a"));
        assert!(dfa.accepts("b"));
        assert!(!dfa.accepts("ab"));
        assert!(!dfa.accepts(""));
    }

    #[test]
    fn star_literal() {
        let dfa = regex_to_min_dfa("a*").unwrap();
        assert!(dfa.accepts(""));
        assert!(dfa.accepts("a"));
        assert!(dfa.accepts("aaaa"));
        assert!(!dfa.accepts("b"));
    }

    #[test]
    fn star_union_suffix() {
        let dfa = regex_to_min_dfa("(a|b)*abb").unwrap();
        assert!(dfa.accepts("abb"));
        assert!(dfa.accepts("aababb"));
        assert!(!dfa.accepts("ab"));
        assert!(!dfa.accepts("abab"));
    }

    #[test]
    fn implicit_concatenation() {
        let dfa = regex_to_min_dfa("ab").unwrap();
        assert!(dfa.accepts("ab"));
        assert!(!dfa.accepts("a"));
        assert!(!dfa.accepts("abb"));
    }

    #[test]
    fn empty_pattern_is_structural_error() {
        assert!(regex_to_min_dfa("").is_err());
    }

    /// A random pattern over the alphabet {a, b}, rendered fully
    /// parenthesized so that implicit concatenation kicks in between
    /// adjacent groups.
    #[derive(Debug, Clone)]
    enum Pattern {
        Lit(char),
        Star(Box<Pattern>),
        Concat(Box<Pattern>, Box<Pattern>),
        Union(Box<Pattern>, Box<Pattern>),
    }

    impl Pattern {
        fn gen(g: &mut Gen, depth: usize) -> Self {
            if depth == 0 || u8::arbitrary(g) % 4 == 0 {
                return Pattern::Lit(if bool::arbitrary(g) { 'a' } else { 'b' });
            }
            match u8::arbitrary(g) % 3 {
                0 => Pattern::Star(Box::new(Pattern::gen(g, depth - 1))),
                1 => Pattern::Concat(
                    Box::new(Pattern::gen(g, depth - 1)),
                    Box::new(Pattern::gen(g, depth - 1)),
                ),
                _ => Pattern::Union(
                    Box::new(Pattern::gen(g, depth - 1)),
                    Box::new(Pattern::gen(g, depth - 1)),
                ),
            }
        }

        fn render(&self, out: &mut String) {
            match self {
                Pattern::Lit(c) => out.push(*c),
                Pattern::Star(inner) => {
                    out.push('(');
                    inner.render(out);
                    out.push_str(")*");
                }
                Pattern::Concat(l, r) => {
                    out.push('(');
                    l.render(out);
                    out.push_str(")(");
                    r.render(out);
                    out.push(')');
                }
                Pattern::Union(l, r) => {
                    out.push('(');
                    l.render(out);
                    out.push('|');
                    r.render(out);
                    out.push(')');
                }
            }
        }

        fn to_regex(&self) -> String {
            let mut s = String::new();
            self.render(&mut s);
            s
        }
    }

    impl Arbitrary for Pattern {
        fn arbitrary(g: &mut Gen) -> Self {
            Pattern::gen(g, 4)
        }
    }

    fn word(bits: &[bool]) -> String {
        bits.iter().map(|b| if *b { 'a' } else { 'b' }).collect()
    }

    #[quickcheck]
    fn min_dfa_agrees_with_nfa_simulation(p: Pattern, bits: Vec<bool>) -> bool {
        let pattern = p.to_regex();
        let w = word(&bits[..bits.len().min(8)]);
        let nfa = regex_to_nfa(&pattern).unwrap();
        let min = regex_to_min_dfa(&pattern).unwrap();
        nfa.accepts(&w) == min.accepts(&w)
    }

    #[quickcheck]
    fn minimization_is_monotone(p: Pattern) -> bool {
        let pattern = p.to_regex();
        let dfa = regex_to_dfa(&pattern).unwrap();
        minimize(&dfa).num_states() <= dfa.num_states()
    }

    #[quickcheck]
    fn minimization_is_idempotent(p: Pattern) -> bool {
        let pattern = p.to_regex();
        let min = regex_to_min_dfa(&pattern).unwrap();
        minimize(&min).num_states() == min.num_states()
    }
}
