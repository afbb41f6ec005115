//! Lexical and syntax diagnostics, and the sink that collects and echoes
//! them.
//!
//! Lexical diagnostics are always recovered by the scanner. A syntax
//! diagnostic ends the parse that raised it.

use std::fmt;
use std::io::Write;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A diagnosed error with the line on which it was raised
pub enum Diagnostic {
    InvalidCharacter { line: usize, character: char },
    UnterminatedComment { line: usize },
    MultilineString { line: usize },
    UnexpectedToken { line: usize, lexeme: String },
}

impl Diagnostic {
    /// Returns the line on which the diagnostic was raised
    pub fn line(&self) -> usize {
        match self {
            Diagnostic::InvalidCharacter { line, .. }
            | Diagnostic::UnterminatedComment { line }
            | Diagnostic::MultilineString { line }
            | Diagnostic::UnexpectedToken { line, .. } => *line,
        }
    }

    /// Returns true if the diagnostic ends the current parse
    pub fn is_fatal(&self) -> bool {
        matches!(self, Diagnostic::UnexpectedToken { .. })
    }

    /// Returns true for diagnostics raised by the scanner
    pub fn is_lexical(&self) -> bool {
        !self.is_fatal()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Diagnostic::InvalidCharacter { line, character } => {
                write!(f, "ERRO: CARACTER INVALIDO (linha {}: '{}')", line, character)
            }
            Diagnostic::UnterminatedComment { line } => {
                write!(f, "ERRO: COMENTARIO NAO TERMINA (linha {})", line)
            }
            Diagnostic::MultilineString { line } => write!(
                f,
                "ERRO: CADEIA DE CARACTERES POSSUI QUEBRA DE LINHA (linha {})",
                line
            ),
            Diagnostic::UnexpectedToken { line, lexeme } => {
                write!(f, "ERRO: '{}' (linha {})", lexeme, line)
            }
        }
    }
}

/// Accumulates diagnostics in the order they are reported, optionally
/// echoing each one as a line to a writer
#[derive(Default)]
pub struct Diagnostics {
    reported: Vec<Diagnostic>,
    echo: Option<Box<dyn Write>>,
}

impl Diagnostics {
    /// Returns a sink which only collects diagnostics
    pub fn new() -> Diagnostics {
        Diagnostics {
            reported: Vec::new(),
            echo: None,
        }
    }

    /// Returns a sink which also writes each diagnostic to the given writer
    pub fn with_writer(writer: Box<dyn Write>) -> Diagnostics {
        Diagnostics {
            reported: Vec::new(),
            echo: Some(writer),
        }
    }

    /// Returns a sink which also writes each diagnostic to standard output
    pub fn stdout() -> Diagnostics {
        Diagnostics::with_writer(Box::new(std::io::stdout()))
    }

    /// Records a diagnostic
    pub fn report(&mut self, diagnostic: Diagnostic) {
        debug!(line = diagnostic.line(), fatal = diagnostic.is_fatal(), "{}", diagnostic);

        if let Some(writer) = self.echo.as_mut() {
            if let Err(e) = writeln!(writer, "{}", diagnostic) {
                warn!("failed to write diagnostic: {}", e);
            }
        }

        self.reported.push(diagnostic);
    }

    /// Records every diagnostic from an iterator, in order
    pub fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, diagnostics: I) {
        for diagnostic in diagnostics {
            self.report(diagnostic);
        }
    }

    /// Returns true if any diagnostic has been reported
    pub fn has_errors(&self) -> bool {
        !self.reported.is_empty()
    }

    /// Returns the number of diagnostics reported
    pub fn len(&self) -> usize {
        self.reported.len()
    }

    /// Returns true if no diagnostic has been reported
    pub fn is_empty(&self) -> bool {
        self.reported.is_empty()
    }

    /// Returns the diagnostics reported so far
    pub fn reported(&self) -> &[Diagnostic] {
        &self.reported
    }

    /// Consumes the sink and returns its diagnostics
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.reported
    }
}
