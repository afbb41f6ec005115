pub mod items;
pub mod lalr;
pub mod lritems;
use super::stack::Stack;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::errors::{Error, Result};
use crate::grammar::{Grammar, Symbol};
use crate::lexer::{Scanner, Token};
use lalr::ParseTable;
use std::mem;
use tracing::{debug, trace};

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
/// An entry in an LR parse table
pub enum TableEntry {
    Goto(usize),
    Shift(usize),
    Reduce(usize),
    Accept,
    Error,
}

/// A value which can be synthesized by a parser. Shifted tokens become
/// values through from_token, and reduction combinators build the rest.
pub trait Semantic {
    fn from_token(token: Token) -> Self;
}

/// An LR parsing automaton
pub struct Parser<V> {
    table: ParseTable<V>,
}

/// Creates a new parser with an LALR parse table
pub fn new_lalr<V>(grammar: Grammar<V>) -> Result<Parser<V>> {
    Ok(Parser {
        table: ParseTable::new(grammar)?,
    })
}

impl<V> Parser<V> {
    /// Returns the parser's parse table
    pub fn table(&self) -> &ParseTable<V> {
        &self.table
    }

    /// Returns the parser's grammar
    pub fn grammar(&self) -> &Grammar<V> {
        self.table.grammar()
    }
}

impl<V: Semantic> Parser<V> {
    /// Parses the tokens from a scanner and returns the value synthesized
    /// for the start symbol. Lexical diagnostics are forwarded to the sink
    /// as they are raised. The first syntax error is reported and ends the
    /// parse, leaving the rest of the input unscanned.
    pub fn parse(&self, scanner: &mut Scanner, diagnostics: &mut Diagnostics) -> Result<V> {
        // Algorithm adapted from Aho et al (2007) p.251

        let mut stack = Stack::new();
        let mut lookahead = next_token(scanner, diagnostics);

        loop {
            let state = stack.peek_state();
            match self.table.action(state, lookahead.kind.index()) {
                TableEntry::Shift(next) => {
                    trace!(state, next, token = %lookahead, "shift");
                    let token = mem::replace(&mut lookahead, next_token(scanner, diagnostics));
                    stack.push(next, Symbol::Terminal(token.kind), V::from_token(token));
                }
                TableEntry::Reduce(p) => {
                    self.reduce(p, &mut stack)?;
                }
                TableEntry::Accept => {
                    debug!(line = lookahead.line, depth = stack.len(), "input accepted");
                    return stack
                        .pop()
                        .map(|frame| frame.value)
                        .ok_or_else(|| Error::Reduction(String::from("empty stack on accept")));
                }
                // GOTO is for non-terminals, so it never appears for a token
                TableEntry::Error | TableEntry::Goto(_) => {
                    debug!(state, token = %lookahead, line = lookahead.line, "input rejected");
                    diagnostics.report(Diagnostic::UnexpectedToken {
                        line: lookahead.line,
                        lexeme: lookahead.lexeme.clone(),
                    });
                    return Err(Error::Syntax {
                        lexeme: lookahead.lexeme,
                        line: lookahead.line,
                    });
                }
            }
        }
    }

    /// Reduces by the production with the given id
    fn reduce(&self, id: usize, stack: &mut Stack<V>) -> Result<()> {
        let grammar = self.table.grammar();
        let production = grammar.production(id);
        trace!(production = %grammar.format_production(id), "reduce");

        // Pop the production's body from the stack
        let values = stack.pop_matching(&production.body).ok_or_else(|| {
            Error::Reduction(format!(
                "stack does not match '{}'",
                grammar.format_production(id)
            ))
        })?;
        let value = grammar.reduce(id, values)?;

        // Push the new state and the synthesized value onto the stack
        let state = stack.peek_state();
        let head = Symbol::NonTerminal(production.head);
        match self.table.action(state, head.id()) {
            TableEntry::Goto(next) => {
                stack.push(next, head, value);
                Ok(())
            }
            _ => Err(Error::MissingGoto {
                state,
                non_terminal: grammar.non_terminal_name(production.head).to_string(),
            }),
        }
    }
}

/// Pulls the next token from the scanner, substituting the end-of-input
/// marker once it is exhausted, and forwards any lexical diagnostics
/// raised while scanning it
fn next_token(scanner: &mut Scanner, diagnostics: &mut Diagnostics) -> Token {
    let token = scanner
        .next_token()
        .unwrap_or_else(|| Token::end_of_input(scanner.line()));
    diagnostics.extend(scanner.take_diagnostics());
    token
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::grammar::{Assoc, BodySymbol::*, GrammarBuilder};
    use crate::lexer::{TokenKind, TokenValue};
    use crate::test::assert_error_text;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    enum Tree {
        Leaf(String),
        Node(Vec<Tree>),
    }

    impl Semantic for Tree {
        fn from_token(token: Token) -> Self {
            Tree::Leaf(match token.value {
                TokenValue::Integer(n) => n.to_string(),
                _ => token.lexeme,
            })
        }
    }

    impl std::fmt::Display for Tree {
        fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            match self {
                Tree::Leaf(s) => write!(f, "{}", s),
                Tree::Node(children) => {
                    let parts: Vec<String> = children.iter().map(|c| c.to_string()).collect();
                    write!(f, "[{}]", parts.join(" "))
                }
            }
        }
    }

    fn node(v: Vec<Tree>) -> Result<Tree> {
        Ok(Tree::Node(v))
    }

    fn tree_parser() -> Result<Parser<Tree>> {
        new_lalr(
            GrammarBuilder::new()
                .rule("E", &[N("E"), T(TokenKind::Plus), N("E")], Some(node))
                .rule("E", &[N("E"), T(TokenKind::Star), N("E")], Some(node))
                .rule("E", &[N("E"), T(TokenKind::Assign), N("E")], Some(node))
                .rule(
                    "E",
                    &[T(TokenKind::LParen), N("E"), T(TokenKind::RParen)],
                    Some(node),
                )
                .rule("E", &[T(TokenKind::Id)], None)
                .rule("E", &[T(TokenKind::IntConst)], None)
                .precedence(Assoc::Right, &[TokenKind::Assign])
                .precedence(Assoc::Left, &[TokenKind::Plus])
                .precedence(Assoc::Left, &[TokenKind::Star])
                .build()?,
        )
    }

    fn parse(parser: &Parser<Tree>, input: &str) -> (Result<Tree>, Vec<Diagnostic>) {
        let mut diagnostics = Diagnostics::new();
        let result = parser.parse(&mut Scanner::new(input), &mut diagnostics);
        (result, diagnostics.into_vec())
    }

    #[test]
    fn test_parse() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let parser = tree_parser()?;

        let (result, diagnostics) = parse(&parser, "a + b * c");
        assert_eq!(result?.to_string(), "[a + [b * c]]");
        assert!(diagnostics.is_empty());

        let (result, _) = parse(&parser, "a * b + c + 2");
        assert_eq!(result?.to_string(), "[[[a * b] + c] + 2]");

        let (result, _) = parse(&parser, "a = b = (c + 1) * 2");
        assert_eq!(result?.to_string(), "[a = [b = [[( [c + 1] )] * 2]]]");

        Ok(())
    }

    #[test]
    fn test_lexical_errors_are_forwarded() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let parser = tree_parser()?;

        let (result, diagnostics) = parse(&parser, "a $ +\n b");
        assert_eq!(result?.to_string(), "[a + b]");
        assert_eq!(
            diagnostics,
            vec![Diagnostic::InvalidCharacter {
                line: 1,
                character: '$'
            }]
        );

        Ok(())
    }

    #[test]
    fn test_parse_fail() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let parser = tree_parser()?;

        let (result, diagnostics) = parse(&parser, "a +\n * b");
        assert_error_text(result, "unexpected '*' at line 2");
        assert_eq!(
            diagnostics,
            vec![Diagnostic::UnexpectedToken {
                line: 2,
                lexeme: String::from("*")
            }]
        );

        let (result, diagnostics) = parse(&parser, "(a +\nb\n");
        assert!(matches!(result, Err(Error::Syntax { line: 3, .. })));
        assert_eq!(diagnostics[0].to_string(), "ERRO: 'EOF' (linha 3)");

        let (result, _) = parse(&parser, "");
        assert_error_text(result, "unexpected 'EOF' at line 1");

        Ok(())
    }
}
