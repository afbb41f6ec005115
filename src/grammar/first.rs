use super::{Production, Symbol};
use crate::lexer::TokenKind;
use std::collections::BTreeSet;

/// FIRST sets and nullability for every non-terminal of a grammar
pub struct First {
    firsts: Vec<BTreeSet<TokenKind>>,
    nullable: Vec<bool>,
}

impl First {
    /// Calculates FIRST for all non-terminals
    pub fn new<V>(num_non_terminals: usize, productions: &[Production<V>]) -> First {
        // This algorithm is adapted from Aho et al (2007) p.221

        let mut first = First {
            firsts: vec![BTreeSet::new(); num_non_terminals],
            nullable: vec![false; num_non_terminals],
        };

        // Non-terminal productions can refer to other non-terminals and to
        // themselves, so keep iterating until no FIRST set grows and no
        // non-terminal becomes nullable
        loop {
            let mut changed = false;

            for production in productions {
                let (set, nullable) = first.first_string(&production.body);
                let head = production.head;

                let before = first.firsts[head].len();
                first.firsts[head].extend(set);
                changed |= first.firsts[head].len() != before;

                if nullable && !first.nullable[head] {
                    first.nullable[head] = true;
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }

        first
    }

    /// Returns FIRST(symbols) excluding ϵ. The second return value is true
    /// if every symbol in the string can derive ϵ, including when the
    /// string is empty.
    pub fn first_string(&self, symbols: &[Symbol]) -> (BTreeSet<TokenKind>, bool) {
        let mut set = BTreeSet::new();

        for symbol in symbols {
            match symbol {
                Symbol::Terminal(t) => {
                    set.insert(*t);
                    return (set, false);
                }
                Symbol::NonTerminal(n) => {
                    set.extend(self.firsts[*n].iter().copied());

                    // If FIRST(symbol) does not include ϵ then no later
                    // symbol in the string can influence FIRST(symbols)
                    if !self.nullable[*n] {
                        return (set, false);
                    }
                }
            }
        }

        (set, true)
    }

    /// Returns true if the non-terminal can derive ϵ
    pub fn is_nullable(&self, non_terminal: usize) -> bool {
        self.nullable[non_terminal]
    }
}
