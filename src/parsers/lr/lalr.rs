use super::items::{self, Item};
use super::lritems::{self, Collection, LRItem, LRItemSet, Lookahead};
use super::TableEntry;
use crate::errors::{Error, Result};
use crate::grammar::{Assoc, Grammar, Symbol};
use crate::lexer::TokenKind;
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
/// How a shift/reduce conflict was resolved
pub enum Resolution {
    /// The lookahead binds tighter, or is right-associative at the same level
    Shift,
    /// The production binds tighter, or is left-associative at the same level
    Reduce,
    /// One side has no declared precedence
    DefaultShift,
}

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
/// A shift/reduce conflict resolved while building a parse table
pub struct Conflict {
    pub state: usize,
    pub lookahead: TokenKind,
    pub production: usize,
    pub resolution: Resolution,
}

/// A parse table for an LALR parser
pub struct ParseTable<V> {
    grammar: Grammar<V>,
    actions: Vec<Vec<TableEntry>>,
    conflicts: Vec<Conflict>,
}

impl<V> ParseTable<V> {
    /// Creates a new parse table
    pub fn new(grammar: Grammar<V>) -> Result<ParseTable<V>> {
        // Algorithm adapted from Aho et al (2007) pp.265

        let collection = lalr_collection(&grammar);

        // SHIFT and GOTO entries come straight from the GOTO transitions
        let actions = collection
            .goto
            .iter()
            .map(|row| {
                grammar
                    .symbols()
                    .iter()
                    .map(|symbol| match (symbol, row[symbol.id()]) {
                        (Symbol::Terminal(_), Some(next)) => TableEntry::Shift(next),
                        (Symbol::NonTerminal(_), Some(next)) => TableEntry::Goto(next),
                        (_, None) => TableEntry::Error,
                    })
                    .collect()
            })
            .collect();

        let mut table = ParseTable {
            grammar,
            actions,
            conflicts: Vec::new(),
        };

        // Add REDUCE actions
        for (state, items) in collection.sets.iter().enumerate() {
            for item in items {
                if item.is_end(&table.grammar) {
                    table.add_reduction(state, item)?;
                }
            }
        }

        debug!(
            states = table.actions.len(),
            conflicts = table.conflicts.len(),
            "built LALR(1) parse table"
        );

        Ok(table)
    }

    /// Returns the action for a state and a symbol column
    pub fn action(&self, state: usize, symbol: usize) -> TableEntry {
        self.actions[state][symbol]
    }

    /// Returns the grammar from which the table was built
    pub fn grammar(&self) -> &Grammar<V> {
        &self.grammar
    }

    /// Returns the number of states in the table
    pub fn num_states(&self) -> usize {
        self.actions.len()
    }

    /// Returns every shift/reduce conflict resolved while building the
    /// table
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Adds a REDUCE item.production entry for the given state to the table
    /// for item. If item.production is for the augmented start symbol, add
    /// an ACCEPT entry instead.
    fn add_reduction(&mut self, from: usize, item: &LRItem) -> Result<()> {
        // If [A → 𝛼·, a] is in Ii where i is not the start state, then set
        // ACTION[i, a] to "reduce A → 𝛼". If [S' → S·, $] is in Ii where S'
        // is the start symbol, then set ACTION[i, $] to "accept".

        let Lookahead::Terminal(lookahead) = item.lookahead else {
            return Ok(());
        };
        let i = lookahead.index();

        match self.actions[from][i] {
            TableEntry::Error => {
                self.actions[from][i] = if item.is_start(&self.grammar) {
                    TableEntry::Accept
                } else {
                    TableEntry::Reduce(item.production)
                };
            }
            TableEntry::Reduce(r) if r == item.production => (),
            TableEntry::Reduce(r) => {
                return Err(Error::GrammarNotLALR1(format!(
                    concat!(
                        "conflict between REDUCE({}) and REDUCE({}) ",
                        "for state {} on input {}"
                    ),
                    self.grammar.format_production(item.production),
                    self.grammar.format_production(r),
                    from,
                    lookahead,
                )));
            }
            TableEntry::Accept => {
                return Err(Error::GrammarNotLALR1(format!(
                    "conflict between REDUCE({}) and ACCEPT for state {} on input {}",
                    self.grammar.format_production(item.production),
                    from,
                    lookahead,
                )));
            }
            // GOTO is for non-terminals, and reductions are for terminals
            TableEntry::Goto(s) => {
                return Err(Error::GrammarNotLALR1(format!(
                    "conflict between REDUCE({}) and GOTO({}) for state {} on input {}",
                    self.grammar.format_production(item.production),
                    s,
                    from,
                    lookahead,
                )));
            }
            TableEntry::Shift(_) => {
                let resolution = self.resolve(lookahead, item.production);
                if resolution == Resolution::Reduce {
                    self.actions[from][i] = TableEntry::Reduce(item.production);
                }

                debug!(
                    state = from,
                    lookahead = %lookahead,
                    production = %self.grammar.format_production(item.production),
                    ?resolution,
                    "resolved shift/reduce conflict"
                );

                self.conflicts.push(Conflict {
                    state: from,
                    lookahead,
                    production: item.production,
                    resolution,
                });
            }
        }

        Ok(())
    }

    /// Chooses between shifting a lookahead and reducing by a production
    fn resolve(&self, lookahead: TokenKind, production: usize) -> Resolution {
        let (Some(shift), Some(reduce)) = (
            self.grammar.terminal_precedence(lookahead),
            self.grammar.production_precedence(production),
        ) else {
            return Resolution::DefaultShift;
        };

        if reduce.level > shift.level {
            Resolution::Reduce
        } else if reduce.level < shift.level {
            Resolution::Shift
        } else {
            match shift.assoc {
                Assoc::Left => Resolution::Reduce,
                Assoc::Right => Resolution::Shift,
            }
        }
    }
}

/// A builder for the kernels of the LALR(1) collection of sets for an
/// augmented grammar, along with a GOTO transition table.
struct Builder {
    /// LR(0) kernel items
    items: Vec<Vec<Item>>,
    /// Lookahead entries
    lookaheads: Vec<Vec<Lookaheads>>,
    /// GOTO transition table
    goto: Vec<Vec<Option<usize>>>,
}

#[derive(Debug, Clone, Default)]
struct Lookaheads {
    /// Lookaheads for this item, including those spontaneously generated
    lookaheads: BTreeSet<TokenKind>,
    /// Other items from which lookaheads propagate to this item
    propagates: BTreeSet<(usize, usize)>,
}

impl Builder {
    /// Creates a new builder and populates it with initial spontaneously
    /// generated lookaheads
    fn new<V>(g: &Grammar<V>) -> Builder {
        // Algorithm adapted from Aho et al (2007) p.273

        // First, get the set of LR(0) items for the (augmented) grammar, and
        // extract the kernels. Kernel items are kept sorted so they can be
        // found by binary search.
        let collection = items::Collection::new(g);
        let items: Vec<Vec<Item>> = collection
            .kernels
            .iter()
            .map(|set| set.iter().copied().collect())
            .collect();

        // The end-of-input lookahead for the (augmented) start production is
        // always known before we begin
        let mut lookaheads: Vec<Vec<Lookaheads>> = items
            .iter()
            .map(|set| vec![Lookaheads::default(); set.len()])
            .collect();
        lookaheads[0][0].lookaheads.insert(TokenKind::EndOfInput);

        // Iterate through the kernels of the LR(0) sets of items
        for (state, set) in items.iter().enumerate() {
            for (n, item) in set.iter().enumerate() {
                // Iterate through the LR(1) closure of this item on the
                // marker lookahead, which is not a grammar symbol
                let start = LRItemSet::from([LRItem::with_lookahead(item, Lookahead::Propagated)]);
                for lritem in lritems::closure(g, &start) {
                    // We're looking for items in the closure [B → 𝛾·X𝛿,a] where
                    // X is a grammar symbol, so skip any other items
                    let Some(symbol) = lritem.next_symbol(g) else {
                        continue;
                    };
                    let Some(goto) = collection.goto[state][symbol.id()] else {
                        continue;
                    };

                    // Find [B → 𝛾X·𝛿,a] in GOTO(item, symbol)
                    let Ok(i) = items[goto].binary_search(&lritem.core().advance()) else {
                        continue;
                    };

                    match lritem.lookahead {
                        // Lookaheads propagate from the kernel with which we
                        // started to [B → 𝛾X·𝛿,a] in GOTO(item, symbol)
                        Lookahead::Propagated => {
                            lookaheads[goto][i].propagates.insert((state, n));
                        }
                        // Lookahead a is spontaneously generated for
                        // [B → 𝛾X·𝛿,a] in GOTO(item, symbol)
                        Lookahead::Terminal(t) => {
                            lookaheads[goto][i].lookaheads.insert(t);
                        }
                    }
                }
            }
        }

        Builder {
            items,
            lookaheads,
            goto: collection.goto,
        }
    }

    /// Returns the total number of lookaheads across all kernel items
    fn count(&self) -> usize {
        self.lookaheads
            .iter()
            .flat_map(|s| s.iter())
            .map(|e| e.lookaheads.len())
            .sum()
    }
}

/// Returns the LALR(1) collection of sets of items for (augmented) grammar g.
pub fn lalr_collection<V>(g: &Grammar<V>) -> Collection {
    // Algorithm adapted from Aho et al (2007) p.273

    let mut builder = Builder::new(g);

    let mut count = builder.count();
    loop {
        // Iterate through all the entries in the builder lookaheads and
        // propagate them
        for i in 0..builder.lookaheads.len() {
            for j in 0..builder.lookaheads[i].len() {
                for (k, l) in builder.lookaheads[i][j].propagates.clone() {
                    let from = builder.lookaheads[k][l].lookaheads.clone();
                    builder.lookaheads[i][j].lookaheads.extend(from);
                }
            }
        }

        // Continue until no more new lookaheads are propagated
        let new_count = builder.count();
        if new_count == count {
            break;
        }
        count = new_count;
    }

    // Add the LALR(1) kernel items and close them
    let sets = builder
        .lookaheads
        .iter()
        .zip(builder.items.iter())
        .map(|(entries, items)| {
            let kernel: LRItemSet = entries
                .iter()
                .zip(items.iter())
                .flat_map(|(entry, item)| {
                    entry
                        .lookaheads
                        .iter()
                        .map(|t| LRItem::with_lookahead(item, Lookahead::Terminal(*t)))
                })
                .collect();
            lritems::closure(g, &kernel)
        })
        .collect();

    Collection {
        sets,
        goto: builder.goto,
    }
}
