mod first;
mod symbol;
mod symboltable;
use crate::errors::{Error, Result};
use crate::lexer::TokenKind;
use first::First;
use std::collections::{BTreeSet, HashMap};
use symboltable::SymbolTable;
pub use symbol::{BodySymbol, Symbol};

/// A reduction combinator. It receives the values of every body symbol in
/// order and returns the value for the production's head.
pub type Reduction<V> = fn(Vec<V>) -> Result<V>;

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
/// The associativity of a precedence level
pub enum Assoc {
    Left,
    Right,
}

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
/// The declared precedence of a terminal. Higher levels bind tighter.
pub struct Precedence {
    pub level: usize,
    pub assoc: Assoc,
}

/// A context-free grammar production
pub struct Production<V> {
    pub head: usize,
    pub body: Vec<Symbol>,
    pub reduction: Option<Reduction<V>>,
    pub precedence: Option<TokenKind>,
}

/// An augmented context-free grammar over token kinds, with a reduction
/// combinator per production and a precedence table for terminals
pub struct Grammar<V> {
    productions: Vec<Production<V>>,
    symbol_table: SymbolTable,
    nt_productions: Vec<Vec<usize>>,
    precedences: HashMap<TokenKind, Precedence>,
    symbols: Vec<Symbol>,
    first: First,
}

impl<V> Grammar<V> {
    /// Returns the production with the given ID. Panics if there is no
    /// such production.
    pub fn production(&self, id: usize) -> &Production<V> {
        &self.productions[id]
    }

    /// Returns the number of productions in the grammar, including the
    /// augmented start production
    pub fn num_productions(&self) -> usize {
        self.productions.len()
    }

    /// Returns a sorted slice of IDs for all productions for the given
    /// non-terminal
    pub fn productions_for_non_terminal(&self, i: usize) -> &[usize] {
        &self.nt_productions[i]
    }

    /// Returns the ID of the augmented start symbol
    pub fn start(&self) -> usize {
        0
    }

    /// Returns the name of a non-terminal
    pub fn non_terminal_name(&self, i: usize) -> &str {
        self.symbol_table.non_terminal_name(i)
    }

    /// Returns the number of non-terminals, including the augmented start
    /// symbol
    pub fn num_non_terminals(&self) -> usize {
        self.symbol_table.len()
    }

    /// Returns the number of parse table columns needed for the grammar
    pub fn num_symbols(&self) -> usize {
        self.symbols.len()
    }

    /// Returns every grammar symbol, terminals first, in column order
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Returns the declared precedence of a terminal, if any
    pub fn terminal_precedence(&self, t: TokenKind) -> Option<Precedence> {
        self.precedences.get(&t).copied()
    }

    /// Returns the precedence of a production: that of its explicit
    /// override if it has one, otherwise that of the last terminal in its
    /// body which has a declared precedence
    pub fn production_precedence(&self, id: usize) -> Option<Precedence> {
        let production = &self.productions[id];
        if let Some(t) = production.precedence {
            return self.terminal_precedence(t);
        }

        production.body.iter().rev().find_map(|s| match s {
            Symbol::Terminal(t) => self.terminal_precedence(*t),
            Symbol::NonTerminal(_) => None,
        })
    }

    /// Returns FIRST(symbols) and whether the whole string can derive ϵ
    pub fn first_string(&self, symbols: &[Symbol]) -> (BTreeSet<TokenKind>, bool) {
        self.first.first_string(symbols)
    }

    /// Returns true if the non-terminal can derive ϵ
    pub fn is_nullable(&self, non_terminal: usize) -> bool {
        self.first.is_nullable(non_terminal)
    }

    /// Returns a human-readable name for a symbol
    pub fn symbol_name(&self, symbol: Symbol) -> String {
        match symbol {
            Symbol::Terminal(t) => t.to_string(),
            Symbol::NonTerminal(n) => self.non_terminal_name(n).to_string(),
        }
    }

    /// Returns a string representation of a production
    pub fn format_production(&self, id: usize) -> String {
        let production = &self.productions[id];
        let body = if production.body.is_empty() {
            String::from("ϵ")
        } else {
            production
                .body
                .iter()
                .map(|s| self.symbol_name(*s))
                .collect::<Vec<_>>()
                .join(" ")
        };

        format!("{} → {}", self.non_terminal_name(production.head), body)
    }

    /// Applies the reduction combinator for a production to the values of
    /// its body symbols. A production without a combinator passes the
    /// value of its single body symbol through unchanged.
    pub fn reduce(&self, id: usize, mut values: Vec<V>) -> Result<V> {
        match self.productions[id].reduction {
            Some(f) => f(values),
            None => values
                .pop()
                .ok_or_else(|| Error::MissingReduction(self.format_production(id))),
        }
    }
}

/// A rule as declared, before non-terminal names are resolved
struct Rule<V> {
    head: &'static str,
    body: Vec<BodySymbol>,
    reduction: Option<Reduction<V>>,
    precedence: Option<TokenKind>,
}

/// Builds a grammar from rule declarations. The head of the first rule
/// declared is the start symbol.
pub struct GrammarBuilder<V> {
    rules: Vec<Rule<V>>,
    levels: Vec<(Assoc, Vec<TokenKind>)>,
}

impl<V> Default for GrammarBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> GrammarBuilder<V> {
    /// Returns a new, empty builder
    pub fn new() -> GrammarBuilder<V> {
        GrammarBuilder {
            rules: Vec::new(),
            levels: Vec::new(),
        }
    }

    /// Declares a production. An empty body is an ϵ-production.
    pub fn rule(
        &mut self,
        head: &'static str,
        body: &[BodySymbol],
        reduction: Option<Reduction<V>>,
    ) -> &mut Self {
        self.rules.push(Rule {
            head,
            body: body.to_vec(),
            reduction,
            precedence: None,
        });
        self
    }

    /// Declares a production which takes its precedence from the given
    /// terminal rather than from its body
    pub fn rule_with_precedence(
        &mut self,
        head: &'static str,
        body: &[BodySymbol],
        reduction: Option<Reduction<V>>,
        precedence: TokenKind,
    ) -> &mut Self {
        self.rules.push(Rule {
            head,
            body: body.to_vec(),
            reduction,
            precedence: Some(precedence),
        });
        self
    }

    /// Declares a precedence level for a group of terminals. Each call
    /// declares a level binding tighter than all previous ones.
    pub fn precedence(&mut self, assoc: Assoc, tokens: &[TokenKind]) -> &mut Self {
        self.levels.push((assoc, tokens.to_vec()));
        self
    }

    /// Builds and validates the augmented grammar
    pub fn build(&mut self) -> Result<Grammar<V>> {
        let Some(start) = self.rules.first().map(|r| r.head) else {
            return Err(Error::EmptyGrammar);
        };

        // The augmented start symbol is always non-terminal 0, and its
        // production is always production 0
        let mut symbol_table = SymbolTable::new();
        symbol_table.add_non_terminal(&format!("{}'", start));
        for rule in &self.rules {
            symbol_table.add_non_terminal(rule.head);
        }

        let mut productions = vec![Production {
            head: 0,
            body: vec![Symbol::NonTerminal(1)],
            reduction: None,
            precedence: None,
        }];

        for rule in self.rules.drain(..) {
            let mut body = Vec::with_capacity(rule.body.len());
            for symbol in rule.body {
                body.push(match symbol {
                    BodySymbol::T(t) => Symbol::Terminal(t),
                    BodySymbol::N(name) => match symbol_table.maybe_non_terminal_index(name) {
                        Some(n) => Symbol::NonTerminal(n),
                        None => return Err(Error::NonTerminalNoProductions(name.to_string())),
                    },
                });
            }

            productions.push(Production {
                // Every head was added to the symbol table above
                head: symbol_table.add_non_terminal(rule.head),
                body,
                reduction: rule.reduction,
                precedence: rule.precedence,
            });
        }

        let mut nt_productions = vec![Vec::new(); symbol_table.len()];
        for (i, production) in productions.iter().enumerate() {
            nt_productions[production.head].push(i);
        }

        let mut precedences = HashMap::new();
        for (i, (assoc, tokens)) in self.levels.drain(..).enumerate() {
            for t in tokens {
                precedences.insert(
                    t,
                    Precedence {
                        level: i + 1,
                        assoc,
                    },
                );
            }
        }

        let symbols = TokenKind::ALL
            .iter()
            .map(|t| Symbol::Terminal(*t))
            .chain((0..symbol_table.len()).map(Symbol::NonTerminal))
            .collect();

        let first = First::new(symbol_table.len(), &productions);

        let grammar = Grammar {
            productions,
            symbol_table,
            nt_productions,
            precedences,
            symbols,
            first,
        };

        for (i, production) in grammar.productions.iter().enumerate() {
            if production.reduction.is_none() && production.body.len() != 1 {
                return Err(Error::MissingReduction(grammar.format_production(i)));
            }
        }

        Ok(grammar)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::assert_error_text;
    use pretty_assertions::assert_eq;
    use BodySymbol::{N, T};

    fn sum(v: Vec<i64>) -> Result<i64> {
        Ok(v[0] + v[2])
    }

    fn product(v: Vec<i64>) -> Result<i64> {
        Ok(v[0] * v[2])
    }

    fn zero(_: Vec<i64>) -> Result<i64> {
        Ok(0)
    }

    fn expression_grammar() -> Result<Grammar<i64>> {
        GrammarBuilder::new()
            .rule("E", &[N("E"), T(TokenKind::Plus), N("E")], Some(sum))
            .rule("E", &[N("E"), T(TokenKind::Star), N("E")], Some(product))
            .rule("E", &[T(TokenKind::IntConst)], None)
            .precedence(Assoc::Left, &[TokenKind::Plus])
            .precedence(Assoc::Left, &[TokenKind::Star])
            .build()
    }

    #[test]
    fn test_augmentation() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let g = expression_grammar()?;

        assert_eq!(g.num_productions(), 4);
        assert_eq!(g.num_non_terminals(), 2);
        assert_eq!(g.non_terminal_name(g.start()), "E'");
        assert_eq!(g.format_production(0), "E' → E");
        assert_eq!(g.format_production(1), "E → E '+' E");
        assert_eq!(g.productions_for_non_terminal(1), &[1, 2, 3]);
        assert_eq!(g.num_symbols(), TokenKind::COUNT + 2);

        Ok(())
    }

    #[test]
    fn test_precedence() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let g = expression_grammar()?;

        assert_eq!(
            g.terminal_precedence(TokenKind::Plus),
            Some(Precedence {
                level: 1,
                assoc: Assoc::Left
            })
        );
        assert_eq!(g.terminal_precedence(TokenKind::IntConst), None);
        assert_eq!(g.production_precedence(2).map(|p| p.level), Some(2));
        assert_eq!(g.production_precedence(3), None);

        Ok(())
    }

    #[test]
    fn test_precedence_override() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let g: Grammar<i64> = GrammarBuilder::new()
            .rule("E", &[N("E"), T(TokenKind::Minus), N("E")], Some(sum))
            .rule_with_precedence(
                "E",
                &[T(TokenKind::Minus), N("E"), T(TokenKind::Minus)],
                Some(sum),
                TokenKind::Not,
            )
            .rule("E", &[T(TokenKind::IntConst)], None)
            .precedence(Assoc::Left, &[TokenKind::Minus])
            .precedence(Assoc::Right, &[TokenKind::Not])
            .build()?;

        assert_eq!(
            g.production_precedence(2),
            Some(Precedence {
                level: 2,
                assoc: Assoc::Right
            })
        );

        Ok(())
    }

    #[test]
    fn test_first() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let g: Grammar<i64> = GrammarBuilder::new()
            .rule("S", &[N("A"), N("B"), T(TokenKind::Semicolon)], Some(sum))
            .rule("A", &[T(TokenKind::Int)], None)
            .rule("A", &[], Some(zero))
            .rule("B", &[T(TokenKind::Car)], None)
            .rule("B", &[], Some(zero))
            .build()?;

        let s = g.production(1).body.clone();
        assert_eq!(
            g.first_string(&s),
            (
                BTreeSet::from([TokenKind::Int, TokenKind::Car, TokenKind::Semicolon]),
                false
            )
        );
        assert_eq!(
            g.first_string(&s[..2]),
            (BTreeSet::from([TokenKind::Int, TokenKind::Car]), true)
        );
        assert!(g.is_nullable(2));
        assert!(!g.is_nullable(1));
        assert_eq!(g.format_production(3), "A → ϵ");

        Ok(())
    }

    #[test]
    fn test_reduce() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let g = expression_grammar()?;

        assert_eq!(g.reduce(1, vec![2, 0, 3])?, 5);
        assert_eq!(g.reduce(2, vec![2, 0, 3])?, 6);
        assert_eq!(g.reduce(3, vec![7])?, 7);

        Ok(())
    }

    #[test]
    fn test_build_errors() {
        assert!(matches!(
            GrammarBuilder::<i64>::new().build(),
            Err(Error::EmptyGrammar)
        ));

        assert_error_text(
            GrammarBuilder::<i64>::new()
                .rule("E", &[N("F")], None)
                .build(),
            "no productions found for non-terminal 'F'",
        );

        assert_error_text(
            GrammarBuilder::<i64>::new()
                .rule("E", &[N("E"), T(TokenKind::Plus), N("E")], None)
                .rule("E", &[T(TokenKind::IntConst)], None)
                .build(),
            "production 'E → E '+' E' needs a reduction",
        );
    }
}
