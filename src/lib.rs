pub mod calculator;
pub mod cli;
pub mod diagnostics;
pub mod errors;
pub mod grammar;
pub mod lexer;
pub mod parsers;
pub mod syntax;
use std::sync::Once;
pub use syntax::analyze;

static TRACING_INIT: Once = Once::new();

/// Initializes tracing for debug output. Only has an effect the first
/// time it is called, and only when RUST_LOG is set, e.g.
/// `RUST_LOG=cafezinho=trace`. Logs are written to standard error so that
/// diagnostics on standard output are left untouched.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
