use crate::diagnostics::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("division by zero")]
    DivideByZero,
    #[error("empty grammar")]
    EmptyGrammar,
    #[error("grammar is not LALR(1): {0}")]
    GrammarNotLALR1(String),
    #[error("{0}")]
    Lexical(Diagnostic),
    #[error("production '{0}' needs a reduction")]
    MissingReduction(String),
    #[error("no GOTO from state {state} on non-terminal '{non_terminal}'")]
    MissingGoto { state: usize, non_terminal: String },
    #[error("no productions found for non-terminal '{0}'")]
    NonTerminalNoProductions(String),
    #[error("arithmetic overflow")]
    Overflow,
    #[error("reduction failed: {0}")]
    Reduction(String),
    #[error("unexpected '{lexeme}' at line {line}")]
    Syntax { lexeme: String, line: usize },
}
