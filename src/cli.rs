mod args;
mod tokens;
use crate::diagnostics::Diagnostics;
use crate::errors::Error;
use crate::syntax::analyze;
pub use args::Options;
use std::process::ExitCode;
use tracing::debug;

/// Runs the analyzer as configured by the command line options. Every
/// diagnostic is printed to standard output, and the exit code is
/// successful only if there were none.
pub fn run(options: &Options) -> std::result::Result<ExitCode, Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(&options.path)?;
    let mut diagnostics = Diagnostics::stdout();

    if options.tokens {
        tokens::output(&mut std::io::stdout(), &source, &mut diagnostics)?;
    } else {
        match analyze(&source, &mut diagnostics) {
            Ok(program) => {
                debug!(
                    path = %options.path.display(),
                    declarations = program.declarations.len(),
                    "program accepted"
                );
                if !options.quiet && diagnostics.is_empty() {
                    eprintln!("programa aceito");
                }
            }
            // Already reported as a diagnostic
            Err(Error::Syntax { .. }) => (),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(if diagnostics.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
