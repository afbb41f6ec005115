use crate::grammar::{Grammar, Symbol};
use std::collections::{BTreeSet, HashMap};

pub type ItemSet = BTreeSet<Item>;

#[derive(Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Clone, Copy)]
/// An LR(0) item
pub struct Item {
    pub production: usize,
    pub dot: usize,
}

impl Item {
    /// Returns a new item for a given production with the dot at the left
    pub fn new_production(production: usize) -> Item {
        Item { production, dot: 0 }
    }

    /// Returns a copy of the item with the dot advanced one position. The
    /// production is not checked to ensure the advanced position is valid.
    pub fn advance(&self) -> Item {
        Item {
            production: self.production,
            dot: self.dot + 1,
        }
    }

    /// Returns true if the dot is at the right. Items for ϵ-productions
    /// always have the dot at the right.
    pub fn is_end<V>(&self, g: &Grammar<V>) -> bool {
        self.dot == g.production(self.production).body.len()
    }

    /// Returns the symbol after the dot, or None if the dot is at the right
    pub fn next_symbol<V>(&self, g: &Grammar<V>) -> Option<Symbol> {
        g.production(self.production).body.get(self.dot).copied()
    }

    /// Returns true if the item is a kernel item. Kernel items include the
    /// initial item S' → ·S and all items whose dots are not at the left.
    pub fn is_kernel<V>(&self, g: &Grammar<V>) -> bool {
        self.dot != 0 || g.production(self.production).head == g.start()
    }
}

/// The canonical collection of sets of LR(0) items for an augmented
/// grammar, along with the GOTO transition table between them
pub struct Collection {
    pub sets: Vec<ItemSet>,
    pub kernels: Vec<ItemSet>,
    pub goto: Vec<Vec<Option<usize>>>,
}

impl Collection {
    /// Returns the canonical collection of sets of LR(0) items for the given
    /// augmented grammar
    pub fn new<V>(g: &Grammar<V>) -> Collection {
        // Algorithm adapted from Aho et al (2007) p.246

        // Initialize collection with CLOSURE(S' → ·S)
        let start = ItemSet::from([Item::new_production(
            g.productions_for_non_terminal(g.start())[0],
        )]);

        let mut collection = Collection {
            sets: vec![closure(g, &start)],
            kernels: vec![start.clone()],
            goto: vec![vec![None; g.num_symbols()]],
        };

        // Sets are identified by their kernels
        let mut seen: HashMap<ItemSet, usize> = HashMap::new();
        seen.insert(start, 0);

        // Every set is processed exactly once, in the order it was added
        let mut i = 0;
        while i < collection.sets.len() {
            let nexts: BTreeSet<Symbol> = collection.sets[i]
                .iter()
                .filter_map(|item| item.next_symbol(g))
                .collect();

            for symbol in nexts {
                // GOTO(I, X) is the closure of the set of all items
                // A → 𝛼X·𝛽 such that A → 𝛼·X𝛽 is in I
                let kernel: ItemSet = collection.sets[i]
                    .iter()
                    .filter(|item| item.next_symbol(g) == Some(symbol))
                    .map(Item::advance)
                    .collect();

                let j = match seen.get(&kernel) {
                    Some(j) => *j,
                    None => {
                        let j = collection.sets.len();
                        collection.sets.push(closure(g, &kernel));
                        collection.kernels.push(kernel.clone());
                        collection.goto.push(vec![None; g.num_symbols()]);
                        seen.insert(kernel, j);
                        j
                    }
                };

                collection.goto[i][symbol.id()] = Some(j);
            }

            i += 1;
        }

        collection
    }

    /// Returns the number of sets in the collection
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns true if the collection has no sets
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

/// Returns CLOSURE(items)
pub fn closure<V>(g: &Grammar<V>, items: &ItemSet) -> ItemSet {
    // Algorithm adapted from Aho et al (2007) p.243

    let mut closure = items.clone();
    let mut added = vec![false; g.num_non_terminals()];
    let mut pending: Vec<Item> = items.iter().copied().collect();

    // If A → 𝛼·B𝛽 is in CLOSURE(items) and B → 𝛾 is a production, then add
    // the item B → ·𝛾 to CLOSURE(items) if it is not already there. Apply
    // this rule until no more new items can be added to CLOSURE(items).
    while let Some(item) = pending.pop() {
        if let Some(Symbol::NonTerminal(nt)) = item.next_symbol(g) {
            if added[nt] {
                continue;
            }
            added[nt] = true;

            for production in g.productions_for_non_terminal(nt) {
                let new = Item::new_production(*production);
                if closure.insert(new) {
                    pending.push(new);
                }
            }
        }
    }

    closure
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::errors::Result;
    use crate::grammar::{BodySymbol::*, GrammarBuilder};
    use crate::lexer::TokenKind;
    use pretty_assertions::assert_eq;

    fn unit(_: Vec<()>) -> Result<()> {
        Ok(())
    }

    /// Returns the expression grammar from Aho et al (2007) p.244
    pub fn expression_grammar() -> Result<Grammar<()>> {
        GrammarBuilder::new()
            .rule("E", &[N("E"), T(TokenKind::Plus), N("T")], Some(unit))
            .rule("E", &[N("T")], None)
            .rule("T", &[N("T"), T(TokenKind::Star), N("F")], Some(unit))
            .rule("T", &[N("F")], None)
            .rule(
                "F",
                &[T(TokenKind::LParen), N("E"), T(TokenKind::RParen)],
                Some(unit),
            )
            .rule("F", &[T(TokenKind::Id)], None)
            .build()
    }

    #[test]
    fn test_advance() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let g = expression_grammar()?;
        let mut item = Item::new_production(1);
        assert_eq!(item.next_symbol(&g), Some(Symbol::NonTerminal(1)));

        for _ in 0..g.production(1).body.len() {
            assert!(!item.is_end(&g));
            item = item.advance();
        }
        assert!(item.is_end(&g));
        assert_eq!(item.next_symbol(&g), None);

        Ok(())
    }

    #[test]
    fn test_closure() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let g = expression_grammar()?;
        let c = closure(&g, &ItemSet::from([Item::new_production(0)]));

        assert_eq!(c, (0..7).map(Item::new_production).collect::<ItemSet>());

        Ok(())
    }

    #[test]
    fn test_canonical_collection() -> std::result::Result<(), Box<dyn std::error::Error>> {
        // Test cases taken from Aho et al (2007) p.244

        let g = expression_grammar()?;
        let c = Collection::new(&g);
        assert_eq!(c.len(), 12);

        // I0 on '(' gives I4, whose kernel is F → (·E)
        let i4 = c.goto[0][TokenKind::LParen.index()].unwrap();
        assert_eq!(c.kernels[i4], ItemSet::from([Item::new_production(5).advance()]));

        // I4 on '(' loops back to I4
        assert_eq!(c.goto[i4][TokenKind::LParen.index()], Some(i4));

        // I0 on E gives I1, with kernel S' → E· and E → E·+T
        let i1 = c.goto[0][Symbol::NonTerminal(1).id()].unwrap();
        assert_eq!(
            c.kernels[i1],
            ItemSet::from([
                Item::new_production(0).advance(),
                Item::new_production(1).advance()
            ])
        );
        assert_eq!(c.goto[0][TokenKind::Plus.index()], None);

        for (set, kernel) in c.sets.iter().zip(c.kernels.iter()) {
            assert!(kernel.iter().all(|item| item.is_kernel(&g)));
            assert!(kernel.is_subset(set));
        }

        Ok(())
    }
}
