pub mod ast;
mod grammar;
use crate::diagnostics::Diagnostics;
use crate::errors::Result;
use crate::lexer::Scanner;
use crate::parsers::lr::{self, Parser};
use ast::{Node, Program};
use once_cell::sync::Lazy;
use tracing::debug;
pub use grammar::grammar;

/// The parser for the language, built on first use and shared thereafter
static PARSER: Lazy<Result<Parser<Node>>> = Lazy::new(|| grammar().and_then(lr::new_lalr));

/// Returns the parser for the language
pub fn parser() -> Result<&'static Parser<Node>> {
    Lazy::force(&PARSER).as_ref().map_err(Clone::clone)
}

/// Scans and parses a source text, reporting every lexical error and at
/// most one syntax error to the sink. The whole input is always scanned,
/// even when a syntax error ends the parse early.
pub fn analyze(source: &str, diagnostics: &mut Diagnostics) -> Result<Program> {
    let parser = parser()?;
    let mut scanner = Scanner::new(source);

    let result = parser.parse(&mut scanner, diagnostics);
    if result.is_err() {
        let skipped = scanner.by_ref().count();
        debug!(skipped, "scanned remaining input after syntax error");
        diagnostics.extend(scanner.take_diagnostics());
    }

    result?.into_program()
}
