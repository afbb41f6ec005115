use super::items::Item;
use crate::grammar::{Grammar, Symbol};
use crate::lexer::TokenKind;
use std::collections::BTreeSet;
use std::fmt;

pub type LRItemSet = BTreeSet<LRItem>;

#[derive(Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Clone, Copy)]
/// The lookahead of an LR(1) item. Propagated is a marker lookahead which
/// is not a grammar symbol, used to discover where lookaheads propagate.
pub enum Lookahead {
    Terminal(TokenKind),
    Propagated,
}

impl fmt::Display for Lookahead {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Lookahead::Terminal(t) => write!(f, "{}", t),
            Lookahead::Propagated => write!(f, "#"),
        }
    }
}

#[derive(Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Clone, Copy)]
/// An LR(1) item
pub struct LRItem {
    pub production: usize,
    pub dot: usize,
    pub lookahead: Lookahead,
}

impl LRItem {
    /// Returns a new item for a given production with the dot at the left
    pub fn new_production(production: usize, lookahead: Lookahead) -> LRItem {
        LRItem {
            production,
            dot: 0,
            lookahead,
        }
    }

    /// Returns an LR(1) item with the core of an LR(0) item
    pub fn with_lookahead(item: &Item, lookahead: Lookahead) -> LRItem {
        LRItem {
            production: item.production,
            dot: item.dot,
            lookahead,
        }
    }

    /// Returns the LR(0) core of the item
    pub fn core(&self) -> Item {
        Item {
            production: self.production,
            dot: self.dot,
        }
    }

    /// Returns true if the dot is at the right
    pub fn is_end<V>(&self, g: &Grammar<V>) -> bool {
        self.core().is_end(g)
    }

    /// Returns true if the item is the start item and the dot is at the right
    pub fn is_start<V>(&self, g: &Grammar<V>) -> bool {
        self.is_end(g) && g.production(self.production).head == g.start()
    }

    /// Returns the symbol after the dot, or None if the dot is at the right
    pub fn next_symbol<V>(&self, g: &Grammar<V>) -> Option<Symbol> {
        self.core().next_symbol(g)
    }
}

/// A collection of sets of LR(1) items for an augmented grammar, along
/// with the GOTO transition table between them
pub struct Collection {
    pub sets: Vec<LRItemSet>,
    pub goto: Vec<Vec<Option<usize>>>,
}

/// Returns CLOSURE(items)
pub fn closure<V>(g: &Grammar<V>, items: &LRItemSet) -> LRItemSet {
    // Algorithm adapted from Aho et al (2007) p.261

    let mut closure = items.clone();
    let mut pending: Vec<LRItem> = items.iter().copied().collect();

    // If [A → 𝛼·B𝛽,a] is in CLOSURE(items) and B → 𝛾 is a production, then add
    // the item [B → ·𝛾,b] for every terminal b in FIRST(𝛽a) to CLOSURE(items)
    // if it is not already there. Apply this rule until no more new items can
    // be added to CLOSURE(items).
    while let Some(item) = pending.pop() {
        let Some(Symbol::NonTerminal(nt)) = item.next_symbol(g) else {
            continue;
        };

        // FIRST(𝛽a) is FIRST(𝛽), plus a if 𝛽 can derive ϵ
        let beta = &g.production(item.production).body[item.dot + 1..];
        let (firsts, nullable) = g.first_string(beta);
        let mut lookaheads: Vec<Lookahead> = firsts.into_iter().map(Lookahead::Terminal).collect();
        if nullable {
            lookaheads.push(item.lookahead);
        }

        for production in g.productions_for_non_terminal(nt) {
            for lookahead in &lookaheads {
                let new = LRItem::new_production(*production, *lookahead);
                if closure.insert(new) {
                    pending.push(new);
                }
            }
        }
    }

    closure
}
