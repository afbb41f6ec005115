use crate::diagnostics::Diagnostics;
use crate::lexer::Scanner;
use std::io::Write;

/// Writes one line per token of source, with lexical diagnostics reported
/// to the sink as they are raised
pub fn output(out: &mut impl Write, source: &str, diagnostics: &mut Diagnostics) -> std::io::Result<()> {
    let mut scanner = Scanner::new(source);

    while let Some(token) = scanner.next_token() {
        diagnostics.extend(scanner.take_diagnostics());
        writeln!(out, "{:>4}  {:<16} {}", token.line, token.kind.to_string(), token.lexeme)?;
    }
    diagnostics.extend(scanner.take_diagnostics());

    Ok(())
}
